//! 远端推荐服务客户端（study-bee-recommend 部署为独立服务时使用）

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::integrations::{IntegrationError, RecommendationSource};
use crate::ranking::Recommendation;

pub struct RemoteRecommendations {
    client: Client,
    url: String,
}

impl RemoteRecommendations {
    /// url 为推荐服务根地址（`http://localhost:8000`）或完整端点（`.../recommendation`）
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, IntegrationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let base = url.trim_end_matches('/');
        let url = if base.ends_with("/recommendation") {
            base.to_string()
        } else {
            format!("{}/recommendation", base)
        };
        Ok(Self { client, url })
    }
}

#[async_trait]
impl RecommendationSource for RemoteRecommendations {
    async fn top_recommendations(
        &self,
        event_title: &str,
        max_results: usize,
    ) -> Result<Vec<Recommendation>, IntegrationError> {
        let max = max_results.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[("event_title", event_title), ("max_results", max.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IntegrationError::upstream(
                "Recommendation service",
                response.status(),
            ));
        }
        response
            .json()
            .await
            .map_err(|e| IntegrationError::Decode(e.to_string()))
    }
}
