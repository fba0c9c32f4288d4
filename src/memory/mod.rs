//! 记忆层：单次规划运行的会话状态（消息序列与工具调用记录）

pub mod conversation;

pub use conversation::{ConversationState, Message, Role, ToolExchange};
