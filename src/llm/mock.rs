//! Mock LLM 客户端（用于测试与离线试跑，无需 API）
//!
//! 按脚本依次返回预设的模型回复，并记录每次收到的消息序列；脚本耗尽后使用 fallback，
//! 未设置 fallback 时回显最后一条 User 消息作为文本回复（即结束规划）。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, ModelTurn, ToolDefinition};
use crate::memory::{Message, Role};

/// Mock 客户端：脚本化回复 + 请求记录
#[derive(Debug, Default)]
pub struct MockLlmClient {
    script: Mutex<VecDeque<ModelTurn>>,
    fallback: Option<ModelTurn>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockLlmClient {
    pub fn new(script: impl IntoIterator<Item = ModelTurn>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Self::default()
        }
    }

    /// 每轮都返回同一回复（用于测试迭代上限）
    pub fn repeating(turn: ModelTurn) -> Self {
        Self {
            fallback: Some(turn),
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, turn: ModelTurn) -> Self {
        self.fallback = Some(turn);
        self
    }

    /// 已发生的模型调用次数
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// 所有请求的消息序列快照（按调用顺序）
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<ModelTurn, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        let scripted = self
            .script
            .lock()
            .map_err(|_| LlmError::InvalidResponse("mock script poisoned".to_string()))?
            .pop_front();
        if let Some(turn) = scripted.or_else(|| self.fallback.clone()) {
            return Ok(turn);
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, Role::User))
            .map(|m| m.content.as_str())
            .unwrap_or("(no input)");
        Ok(ModelTurn::text(format!("Echo from Mock: {}", last_user)))
    }

    fn model(&self) -> &str {
        "mock"
    }
}
