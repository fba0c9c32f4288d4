//! 规划运行状态机
//!
//! AwaitingModelTurn → DispatchingTools → (AwaitingModelTurn | TerminatedSuccess)；
//! 预算耗尽进入 TerminatedExhausted。文本回复同样以 TerminatedSuccess 结束。

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    AwaitingModelTurn,
    DispatchingTools,
    TerminatedSuccess,
    TerminatedExhausted,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunPhase::TerminatedSuccess | RunPhase::TerminatedExhausted)
    }
}

/// 一次规划运行的结局
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// 终止工具发送成功
    Delivered { recipient: String },
    /// 模型以文本结束
    Narrative { text: String },
    /// 未在预算内结束
    Exhausted { iterations: usize },
}

impl RunOutcome {
    pub fn phase(&self) -> RunPhase {
        match self {
            RunOutcome::Delivered { .. } | RunOutcome::Narrative { .. } => RunPhase::TerminatedSuccess,
            RunOutcome::Exhausted { .. } => RunPhase::TerminatedExhausted,
        }
    }

    /// 对外状态串
    pub fn status(&self) -> String {
        match self {
            RunOutcome::Delivered { recipient } => format!("Plan successfully sent to {}.", recipient),
            RunOutcome::Narrative { text } => text.clone(),
            RunOutcome::Exhausted { .. } => {
                "Agent planning failed: Loop iteration limit exceeded.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_are_distinct() {
        let sent = RunOutcome::Delivered {
            recipient: "+15550001111".to_string(),
        };
        let exhausted = RunOutcome::Exhausted { iterations: 15 };
        assert_eq!(sent.status(), "Plan successfully sent to +15550001111.");
        assert_eq!(
            exhausted.status(),
            "Agent planning failed: Loop iteration limit exceeded."
        );
        assert_eq!(sent.phase(), RunPhase::TerminatedSuccess);
        assert_eq!(exhausted.phase(), RunPhase::TerminatedExhausted);
        assert!(exhausted.phase().is_terminal());
        assert!(!RunPhase::DispatchingTools.is_terminal());
    }
}
