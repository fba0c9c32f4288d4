//! Agent 错误类型
//!
//! 只有配置错误、参数错误与模型调用失败会以 Err 离开规划运行；
//! 工具执行失败 / 超时 / 未知工具在循环内被改写为失败结果回填给模型。

use thiserror::Error;

use crate::llm::LlmError;

/// Agent 运行过程中可能出现的错误
#[derive(Error, Debug)]
pub enum AgentError {
    /// 缺少必需的凭据或标识，进程不应启动
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("LLM error: {0}")]
    LlmError(#[from] LlmError),

    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("Tool timeout: {0}")]
    ToolTimeout(String),

    /// 模型引用了注册表中不存在的工具
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    ArgumentDecode { tool: String, message: String },
}
