//! Study Bee - 学习规划智能体
//!
//! 读取今日日程，为每个学习活动检索并按 hands-on 程度排序 GitHub 仓库，由模型汇总后短信推送。
//!
//! 模块划分：
//! - **agent**: 从配置装配全部组件
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、运行状态机、编排器
//! - **integrations**: Google Calendar / GitHub / 推荐服务 / Twilio 客户端
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容端点 / Mock）
//! - **memory**: 规划会话的消息序列
//! - **observability**: 日志初始化与检索计数
//! - **ranking**: hands-on 评分与排序
//! - **react**: Planner 与有界工具调用主循环
//! - **server**: 推荐查询 HTTP 服务（feature = "server"）
//! - **tools**: 三个工具、注册表与执行器

pub mod agent;
pub mod config;
pub mod core;
pub mod integrations;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod ranking;
pub mod react;
#[cfg(feature = "server")]
pub mod server;
pub mod tools;

pub use agent::{create_agent_components, AgentComponents};
pub use core::{AgentError, AgentOrchestrator, RunOutcome, RunPhase};
