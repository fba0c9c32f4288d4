//! Agent 编排器
//!
//! 持有 Planner 与 ToolExecutor，start(recipient, limit) 跑一次有界规划并返回状态串。
//! 每次运行独占自己的会话状态，多个收件人可用同一编排器并发运行。

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::{AppConfig, ToolsSection, UnknownToolPolicy};
use crate::core::AgentError;
use crate::llm::{preset, LlmClient, MockLlmClient, OpenAiClient};
use crate::react::{run_planning_loop, Planner, PlanningSession, RunEvent, RunReport};
use crate::tools::ToolExecutor;

/// 根据配置选择 LLM 后端（Gemini / OpenAI / DeepSeek 兼容端点，或 Mock）
pub fn create_llm_from_config(cfg: &AppConfig) -> Result<Arc<dyn LlmClient>, AgentError> {
    if cfg.llm.is_mock() {
        tracing::warn!("llm.provider = mock, planning runs against the Mock LLM");
        return Ok(Arc::new(MockLlmClient::default()));
    }

    let base_url = cfg
        .llm
        .base_url
        .clone()
        .or_else(|| preset(&cfg.llm.provider).map(|p| p.base_url.to_string()))
        .ok_or_else(|| {
            AgentError::ConfigError(format!("unknown llm provider '{}'", cfg.llm.provider))
        })?;
    let api_key = cfg
        .llm
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            AgentError::ConfigError(format!(
                "API key for provider '{}' is not set",
                cfg.llm.provider
            ))
        })?;

    let model = cfg.llm.effective_model();
    tracing::info!(provider = %cfg.llm.provider, model = %model, "Using LLM");
    let client = OpenAiClient::new(&base_url, &model, api_key, cfg.llm.timeouts.request);
    Ok(Arc::new(client))
}

pub struct AgentOrchestrator {
    planner: Planner,
    executor: ToolExecutor,
    parallel_dispatch: bool,
    unknown_tool: UnknownToolPolicy,
    event_tx: Option<UnboundedSender<RunEvent>>,
}

impl AgentOrchestrator {
    pub fn new(planner: Planner, executor: ToolExecutor) -> Self {
        Self {
            planner,
            executor,
            parallel_dispatch: true,
            unknown_tool: UnknownToolPolicy::default(),
            event_tx: None,
        }
    }

    /// 应用 [tools] 段的调度选项
    pub fn with_tool_options(mut self, tools: &ToolsSection) -> Self {
        self.parallel_dispatch = tools.parallel_dispatch;
        self.unknown_tool = tools.unknown_tool;
        self
    }

    pub fn with_parallel_dispatch(mut self, parallel: bool) -> Self {
        self.parallel_dispatch = parallel;
        self
    }

    pub fn with_unknown_tool(mut self, policy: UnknownToolPolicy) -> Self {
        self.unknown_tool = policy;
        self
    }

    pub fn with_event_tx(mut self, tx: UnboundedSender<RunEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// 跑一次规划，返回完整报告
    pub async fn run(&self, recipient: &str, iteration_limit: usize) -> Result<RunReport, AgentError> {
        let mut session = PlanningSession::new(&self.planner, &self.executor)
            .with_parallel_dispatch(self.parallel_dispatch)
            .with_unknown_tool(self.unknown_tool);
        if let Some(tx) = &self.event_tx {
            session = session.with_event_tx(tx);
        }

        tracing::info!(
            recipient,
            iteration_limit,
            model = %self.planner.model(),
            "Starting learning plan run"
        );
        let report = run_planning_loop(&session, recipient, iteration_limit).await?;

        let (prompt, completion, total) = self.planner.token_usage();
        tracing::info!(
            turns = report.turns,
            phase = ?report.outcome.phase(),
            prompt_tokens = prompt,
            completion_tokens = completion,
            total_tokens = total,
            "Planning run finished"
        );
        Ok(report)
    }

    /// 跑一次规划，返回最终状态串
    pub async fn start(&self, recipient: &str, iteration_limit: usize) -> Result<String, AgentError> {
        Ok(self.run(recipient, iteration_limit).await?.status())
    }
}
