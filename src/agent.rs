//! 组件装配
//!
//! create_agent_components 从 AppConfig 一次性构建 LLM、三个协作方与工具注册表；
//! 任何必需凭据缺失都在这里以 ConfigError 失败，进程不会进入规划运行。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::{create_llm_from_config, AgentError, AgentOrchestrator};
use crate::integrations::{
    CalendarSource, GitHubSearch, GoogleCalendar, IntegrationError, NotificationSender,
    RecommendationSource, RemoteRecommendations, TwilioSms,
};
use crate::observability::SearchMetrics;
use crate::ranking::RepositoryRanker;
use crate::react::{system_prompt, Planner};
use crate::tools::{
    RecommendationTool, SmsNotificationTool, TodayEventsTool, ToolExecutor, ToolRegistry,
};

/// 预构建的 Agent 组件
pub struct AgentComponents {
    pub planner: Planner,
    pub executor: ToolExecutor,
}

impl AgentComponents {
    pub fn into_orchestrator(self, cfg: &AppConfig) -> AgentOrchestrator {
        AgentOrchestrator::new(self.planner, self.executor).with_tool_options(&cfg.tools)
    }
}

fn startup(e: IntegrationError) -> AgentError {
    AgentError::ConfigError(e.to_string())
}

/// 按固定目录注册三个工具
pub fn build_registry(
    calendar: Arc<dyn CalendarSource>,
    recommendations: Arc<dyn RecommendationSource>,
    notifier: Arc<dyn NotificationSender>,
    default_max_results: usize,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(TodayEventsTool::new(calendar));
    registry.register(RecommendationTool::new(recommendations, default_max_results));
    registry.register(SmsNotificationTool::new(notifier));
    registry
}

/// 推荐来源：配置了 recommendation_url 时走远端服务，否则进程内检索 + 评分
pub fn create_recommendation_source(
    cfg: &AppConfig,
    metrics: Arc<SearchMetrics>,
) -> Result<Arc<dyn RecommendationSource>, AgentError> {
    match cfg.github.recommendation_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => {
            tracing::info!(url, "Using remote recommendation service");
            let remote = RemoteRecommendations::new(url, cfg.github.timeout_secs).map_err(startup)?;
            Ok(Arc::new(remote))
        }
        None => {
            let search = GitHubSearch::from_config(&cfg.github, metrics).map_err(startup)?;
            Ok(Arc::new(RepositoryRanker::new(search)))
        }
    }
}

pub fn create_agent_components(cfg: &AppConfig) -> Result<AgentComponents, AgentError> {
    cfg.validate().map_err(AgentError::ConfigError)?;

    let llm = create_llm_from_config(cfg)?;
    let metrics = Arc::new(SearchMetrics::new());

    let calendar = Arc::new(GoogleCalendar::from_config(&cfg.calendar).map_err(startup)?);
    let recommendations = create_recommendation_source(cfg, metrics)?;
    let notifier = Arc::new(TwilioSms::from_config(&cfg.twilio).map_err(startup)?);

    let registry = build_registry(
        calendar,
        recommendations,
        notifier,
        cfg.github.default_max_results,
    );
    let executor = ToolExecutor::new(registry, cfg.tools.tool_timeout_secs);
    let planner = Planner::new(llm, system_prompt(cfg.app.max_message_chars));

    Ok(AgentComponents { planner, executor })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.app.recipient = Some("+15550001111".to_string());
        cfg.llm.provider = "mock".to_string();
        cfg.calendar.calendar_id = Some("learning@example.com".to_string());
        cfg.calendar.access_token = Some("ya29.test".to_string());
        cfg.twilio.account_sid = Some("AC1".to_string());
        cfg.twilio.auth_token = Some("t".to_string());
        cfg.twilio.from_number = Some("+15559998888".to_string());
        cfg
    }

    #[test]
    fn builds_full_catalogue() {
        let components = create_agent_components(&configured()).unwrap();
        let names: Vec<_> = components
            .executor
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "get_today_events",
                "get_top_github_recommendations",
                "send_sms_notification"
            ]
        );
    }

    #[test]
    fn missing_twilio_credentials_stop_startup() {
        let mut cfg = configured();
        cfg.twilio.from_number = None;
        assert!(matches!(
            create_agent_components(&cfg),
            Err(AgentError::ConfigError(_))
        ));
    }

    #[test]
    fn missing_calendar_token_stops_startup() {
        let mut cfg = configured();
        cfg.calendar.access_token = None;
        cfg.calendar.credentials_file = "/nonexistent/credentials.json".into();
        assert!(matches!(
            create_agent_components(&cfg),
            Err(AgentError::ConfigError(_))
        ));
    }
}
