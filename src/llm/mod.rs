//! LLM 层：客户端抽象与实现（OpenAI 兼容端点 / Mock）、工具调用数据类型、后端预设

pub mod mock;
pub mod openai;
pub mod providers;
pub mod traits;
pub mod types;

pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use providers::{preset, ProviderPreset, DEEPSEEK_CHAT, GEMINI_FLASH};
pub use traits::{LlmClient, LlmError};
pub use types::{ModelTurn, ToolCall, ToolDefinition};
