//! 核心编排层：错误类型、运行状态机、编排器

pub mod error;
pub mod orchestrator;
pub mod state;

pub use error::AgentError;
pub use orchestrator::{create_llm_from_config, AgentOrchestrator};
pub use state::{RunOutcome, RunPhase};
