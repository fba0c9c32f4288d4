//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容端点 / Mock）实现 LlmClient：给定消息序列与工具目录，返回一轮模型回复。

use async_trait::async_trait;
use thiserror::Error;

use crate::llm::{ModelTurn, ToolDefinition};
use crate::memory::Message;

/// 模型调用错误
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("model API error: {0}")]
    Api(String),

    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// LLM 客户端 trait：带工具目录的单轮完成
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 发送完整消息序列（含 system）与工具目录，得到文本或工具调用
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ModelTurn, LlmError>;

    /// 模型名（日志用）
    fn model(&self) -> &str {
        "unknown"
    }

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}
