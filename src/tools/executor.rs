//! 工具执行器
//!
//! 持有 ToolRegistry 与单次调用超时，execute(call) 总是返回一个 ToolResult：
//! 超时、参数错误、工具失败、未注册工具都改写为失败结果；每次调用输出结构化审计日志（JSON）。

use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::AgentError;
use crate::llm::{ToolCall, ToolDefinition};
use crate::tools::{ToolKind, ToolRegistry, ToolResult};

const RESULT_LOG_CHARS: usize = 100;

/// 工具执行器：对每次调用施加超时，并把所有失败收敛为 ToolResult
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self::with_timeout(registry, Duration::from_secs(timeout_secs))
    }

    pub fn with_timeout(registry: ToolRegistry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// 名称对应的工具是否已注册
    pub fn resolve(&self, name: &str) -> Option<ToolKind> {
        self.registry.resolve(name).map(|t| t.kind())
    }

    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        let preview = args_preview(&call.arguments);

        let Some(tool) = self.registry.resolve(&call.name) else {
            let err = AgentError::UnknownTool(call.name.clone());
            audit(&call.name, false, "unknown", start, &preview);
            return ToolResult::failure(call, format!("{err}: tool is not registered"));
        };

        let outcome = timeout(self.timeout, tool.invoke(call.arguments.clone())).await;
        let (ok, label) = match &outcome {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        audit(&call.name, ok, label, start, &preview);

        match outcome {
            Ok(Ok(value)) => {
                let text = value.to_string();
                tracing::info!(
                    "Executed {}. Result: {}...",
                    call.name,
                    text.chars().take(RESULT_LOG_CHARS).collect::<String>()
                );
                ToolResult::success(call, value)
            }
            Ok(Err(e)) => {
                tracing::error!("Error executing tool {}: {}", call.name, e);
                ToolResult::failure(call, e.to_string())
            }
            Err(_) => {
                let e = AgentError::ToolTimeout(call.name.clone());
                tracing::error!("Error executing tool {}: {}", call.name, e);
                ToolResult::failure(call, format!("{e} after {}s", self.timeout.as_secs_f32()))
            }
        }
    }
}

fn audit(tool: &str, ok: bool, outcome: &str, start: Instant, args_preview: &str) {
    let audit = serde_json::json!({
        "event": "tool_audit",
        "tool": tool,
        "ok": ok,
        "outcome": outcome,
        "duration_ms": start.elapsed().as_millis() as u64,
        "args_preview": args_preview,
    });
    tracing::info!(audit = %audit, "tool");
}

fn args_preview(args: &serde_json::Value) -> String {
    let s = args.to_string();
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}
