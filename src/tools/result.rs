//! 工具结果：每个被执行的工具调用恰好产生一个，失败也不例外

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::llm::ToolCall;

#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    Success(Value),
    /// 回填给模型时呈现为 `{"error": ..., "status": "failed"}`
    Failure(String),
}

impl ToolPayload {
    /// 模型看到的结构
    pub fn to_value(&self) -> Value {
        match self {
            ToolPayload::Success(v) => v.clone(),
            ToolPayload::Failure(m) => json!({"error": m, "status": "failed"}),
        }
    }
}

impl Serialize for ToolPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub call_id: String,
    pub tool_name: String,
    pub payload: ToolPayload,
}

impl ToolResult {
    pub fn success(call: &ToolCall, value: Value) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            payload: ToolPayload::Success(value),
        }
    }

    pub fn failure(call: &ToolCall, message: impl Into<String>) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            payload: ToolPayload::Failure(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.payload, ToolPayload::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.payload {
            ToolPayload::Failure(m) => Some(m),
            ToolPayload::Success(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        self.payload.to_value()
    }

    /// Tool 消息正文（JSON 文本）
    pub fn content(&self) -> String {
        self.to_value().to_string()
    }
}
