//! 规划过程事件：供日志之外的观察者（测试、前端）跟踪运行进度

use serde::Serialize;

use crate::core::RunPhase;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// 第 turn 轮模型调用开始（从 1 计）
    TurnStarted { turn: usize, limit: usize },
    PhaseChanged { phase: RunPhase },
    ToolCall {
        tool: String,
        args: serde_json::Value,
    },
    /// 工具返回（预览）
    ToolResult { tool: String, preview: String },
    ToolFailure { tool: String, reason: String },
    UnknownTool { tool: String },
    Finished { status: String },
}
