//! 规划会话状态：消息序列与 (ToolCall, ToolResult) 对
//!
//! 一次规划运行独占一个 ConversationState，运行结束即丢弃；工具结果按调用顺序追加，只增不改。

use serde::{Deserialize, Serialize};

use crate::llm::ToolCall;
use crate::tools::ToolResult;

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    System,
    /// 工具结果回填
    Tool,
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Assistant 消息携带的工具调用请求
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Tool 消息对应的调用 id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool 消息对应的工具名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    fn plain(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content.into())
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content.into())
    }

    /// Assistant 发起工具调用的消息（content 可为空）
    pub fn assistant_tool_calls(content: Option<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            ..Self::plain(Role::Assistant, content.unwrap_or_default())
        }
    }

    /// 工具结果消息：content 为结果 JSON 文本
    pub fn tool_result(result: &ToolResult) -> Self {
        Self {
            tool_call_id: Some(result.call_id.clone()),
            name: Some(result.tool_name.clone()),
            ..Self::plain(Role::Tool, result.content())
        }
    }
}

/// 一次已执行的工具调用及其结果
#[derive(Clone, Debug)]
pub struct ToolExchange {
    pub call: ToolCall,
    pub result: ToolResult,
}

/// 会话状态：发给模型的完整消息序列 + 有序的工具调用记录
#[derive(Clone, Debug, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
    exchanges: Vec<ToolExchange>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    /// 记录一次工具调用结果，并把结果作为 Tool 消息追加到对话
    pub fn record(&mut self, call: ToolCall, result: ToolResult) {
        self.messages.push(Message::tool_result(&result));
        self.exchanges.push(ToolExchange { call, result });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn exchanges(&self) -> &[ToolExchange] {
        &self.exchanges
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
