//! 外部协作方：日程源、仓库检索、推荐服务、短信通知
//!
//! 每个协作方以 trait 暴露窄契约，具体实现为对外部 HTTP API 的单次调用（无重试、无分页）。
//! 上游失败以 IntegrationError 返回，调用方可区分「确实为空」与「拉取失败」。

pub mod github;
pub mod google_calendar;
pub mod recommendation_client;
pub mod twilio;

use async_trait::async_trait;
use thiserror::Error;

use crate::ranking::Recommendation;

pub use github::{GitHubSearch, RepositoryRecord};
pub use google_calendar::{DayWindow, Event, EventStart, GoogleCalendar};
pub use recommendation_client::RemoteRecommendations;
pub use twilio::TwilioSms;

/// 外部调用错误
#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("request failed: {0}")]
    Transport(String),

    /// 上游返回非 2xx；status 原样保留供推荐服务透传
    #[error("{service} API error: {status} - {reason}")]
    Upstream {
        service: &'static str,
        status: u16,
        reason: String,
    },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("credentials: {0}")]
    Credentials(String),
}

impl From<reqwest::Error> for IntegrationError {
    fn from(e: reqwest::Error) -> Self {
        IntegrationError::Transport(e.to_string())
    }
}

impl IntegrationError {
    /// 由非成功响应构造 Upstream 错误
    pub(crate) fn upstream(service: &'static str, status: reqwest::StatusCode) -> Self {
        IntegrationError::Upstream {
            service,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

/// 今日日程来源
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// 返回 UTC 当日 [00:00:00.000000, 23:59:59.999999] 内开始的事件，按开始时间排序
    async fn today_events(&self) -> Result<Vec<Event>, IntegrationError>;
}

/// 仓库索引检索（上游按 star 降序，最多返回 10 个候选）
#[async_trait]
pub trait RepositorySearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        keywords: &[String],
    ) -> Result<Vec<RepositoryRecord>, IntegrationError>;
}

/// 学习资源推荐：本地 RepositoryRanker 或远端推荐服务
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn top_recommendations(
        &self,
        event_title: &str,
        max_results: usize,
    ) -> Result<Vec<Recommendation>, IntegrationError>;
}

/// 通知发送：返回是否发送成功；不校验内容长度与编码
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, recipient: &str, body: &str) -> bool;
}
