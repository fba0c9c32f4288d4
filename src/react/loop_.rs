//! 规划主循环
//!
//! 初始指令 → 模型回复 → 执行工具并回填结果 → 下一轮，直到：终止工具发送成功、模型以文本结束、或轮数耗尽。
//! 同一轮内的非终止调用可并发执行，结果按调用顺序回填；遇到终止调用先清空前面的批次再执行它。
//! 可选 event_tx：推送 TurnStarted / ToolCall / ToolResult / Finished 等进度事件。

use futures_util::future::join_all;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::UnknownToolPolicy;
use crate::core::{AgentError, RunOutcome, RunPhase};
use crate::llm::ToolCall;
use crate::memory::{ConversationState, Message};
use crate::react::planner::initial_instruction;
use crate::react::{Planner, RunEvent};
use crate::tools::{ToolExecutor, ToolResult};

/// ToolResult 事件预览最大字符数
const RESULT_PREVIEW_CHARS: usize = 200;

/// 规划会话：一次运行所需的全部协作者与调度选项
pub struct PlanningSession<'a> {
    pub planner: &'a Planner,
    pub executor: &'a ToolExecutor,
    pub parallel_dispatch: bool,
    pub unknown_tool: UnknownToolPolicy,
    pub event_tx: Option<&'a UnboundedSender<RunEvent>>,
}

impl<'a> PlanningSession<'a> {
    pub fn new(planner: &'a Planner, executor: &'a ToolExecutor) -> Self {
        Self {
            planner,
            executor,
            parallel_dispatch: true,
            unknown_tool: UnknownToolPolicy::default(),
            event_tx: None,
        }
    }

    pub fn with_parallel_dispatch(mut self, parallel: bool) -> Self {
        self.parallel_dispatch = parallel;
        self
    }

    pub fn with_unknown_tool(mut self, policy: UnknownToolPolicy) -> Self {
        self.unknown_tool = policy;
        self
    }

    pub fn with_event_tx(mut self, tx: &'a UnboundedSender<RunEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn emit(&self, ev: RunEvent) {
        if let Some(tx) = self.event_tx {
            let _ = tx.send(ev);
        }
    }
}

/// 一次规划运行的结果：结局、已用轮数、完整会话
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub turns: usize,
    pub state: ConversationState,
}

impl RunReport {
    pub fn status(&self) -> String {
        self.outcome.status()
    }
}

#[derive(Default)]
struct TurnDispatch {
    exchanges: Vec<(ToolCall, ToolResult)>,
    delivered: bool,
}

/// 运行一次规划；只有 limit 非法或模型调用失败会返回 Err
pub async fn run_planning_loop(
    session: &PlanningSession<'_>,
    recipient: &str,
    limit: usize,
) -> Result<RunReport, AgentError> {
    if limit == 0 {
        return Err(AgentError::InvalidArgument(
            "iteration limit must be a positive integer".to_string(),
        ));
    }

    let mut state = ConversationState::new();
    state.push(Message::user(initial_instruction(recipient)));
    let tools = session.executor.definitions();

    for turn in 1..=limit {
        session.emit(RunEvent::TurnStarted { turn, limit });
        session.emit(RunEvent::PhaseChanged {
            phase: RunPhase::AwaitingModelTurn,
        });

        let reply = session.planner.next_turn(&state, &tools).await?;

        if !reply.has_tool_calls() {
            let text = reply.text.unwrap_or_default();
            tracing::info!("Agent finished planning. Final response:\n{}", text);
            return Ok(finish(session, RunOutcome::Narrative { text }, turn, state));
        }

        session.emit(RunEvent::PhaseChanged {
            phase: RunPhase::DispatchingTools,
        });
        let dispatch = dispatch_turn(session, &reply.tool_calls).await;

        let accepted = dispatch.exchanges.iter().map(|(c, _)| c.clone()).collect();
        state.push(Message::assistant_tool_calls(reply.text, accepted));
        for (call, result) in dispatch.exchanges {
            state.record(call, result);
        }

        if dispatch.delivered {
            tracing::info!("Final SMS notification successfully triggered by the agent.");
            let outcome = RunOutcome::Delivered {
                recipient: recipient.to_string(),
            };
            return Ok(finish(session, outcome, turn, state));
        }
    }

    tracing::error!("Agent exceeded the maximum loop iterations.");
    Ok(finish(
        session,
        RunOutcome::Exhausted { iterations: limit },
        limit,
        state,
    ))
}

fn finish(
    session: &PlanningSession<'_>,
    outcome: RunOutcome,
    turns: usize,
    state: ConversationState,
) -> RunReport {
    session.emit(RunEvent::PhaseChanged {
        phase: outcome.phase(),
    });
    session.emit(RunEvent::Finished {
        status: outcome.status(),
    });
    RunReport {
        outcome,
        turns,
        state,
    }
}

/// 执行一轮中的全部工具调用
async fn dispatch_turn(session: &PlanningSession<'_>, calls: &[ToolCall]) -> TurnDispatch {
    let mut out = TurnDispatch::default();
    let mut pending: Vec<&ToolCall> = Vec::new();

    for call in calls {
        session.emit(RunEvent::ToolCall {
            tool: call.name.clone(),
            args: call.arguments.clone(),
        });

        let kind = session.executor.resolve(&call.name);
        if kind.is_none() {
            session.emit(RunEvent::UnknownTool {
                tool: call.name.clone(),
            });
            match session.unknown_tool {
                UnknownToolPolicy::Drop => {
                    tracing::warn!("Tool {} not found in registry.", call.name);
                    continue;
                }
                UnknownToolPolicy::Report => {
                    tracing::error!("Tool {} not found in registry, reporting failure.", call.name);
                }
            }
        }

        if kind.is_some_and(|k| k.is_terminal()) {
            flush(session, &mut pending, &mut out).await;
            let result = session.executor.execute(call).await;
            let delivered = result.is_success();
            push_result(session, &mut out, call, result);
            if delivered {
                out.delivered = true;
                return out;
            }
        } else {
            pending.push(call);
        }
    }

    flush(session, &mut pending, &mut out).await;
    out
}

/// 执行积压的非终止调用，结果按调用顺序追加
async fn flush<'c>(
    session: &PlanningSession<'_>,
    pending: &mut Vec<&'c ToolCall>,
    out: &mut TurnDispatch,
) {
    if pending.is_empty() {
        return;
    }
    let batch: Vec<&ToolCall> = std::mem::take(pending);
    let results = if session.parallel_dispatch && batch.len() > 1 {
        join_all(batch.iter().map(|c| session.executor.execute(c))).await
    } else {
        let mut results = Vec::with_capacity(batch.len());
        for c in &batch {
            results.push(session.executor.execute(c).await);
        }
        results
    };
    for (call, result) in batch.into_iter().zip(results) {
        push_result(session, out, call, result);
    }
}

fn push_result(
    session: &PlanningSession<'_>,
    out: &mut TurnDispatch,
    call: &ToolCall,
    result: ToolResult,
) {
    match result.error() {
        Some(reason) => session.emit(RunEvent::ToolFailure {
            tool: call.name.clone(),
            reason: reason.to_string(),
        }),
        None => session.emit(RunEvent::ToolResult {
            tool: call.name.clone(),
            preview: result
                .content()
                .chars()
                .take(RESULT_PREVIEW_CHARS)
                .collect(),
        }),
    }
    out.exchanges.push((call.clone(), result));
}
