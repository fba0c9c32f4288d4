//! GitHub 仓库检索
//!
//! 单次 search/repositories 调用：`"{title} in:name,description"`，按 star 降序，最多 10 条。
//! 未配置 token 时仅告警并以匿名身份调用（速率限制更严）。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GithubSection;
use crate::integrations::{IntegrationError, RepositorySearch};
use crate::observability::SearchMetrics;

const AGENT_NAME: &str = "study-bee";
const PER_PAGE: &str = "10";

/// 上游仓库条目（只取评分与展示所需字段）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    items: Vec<RepositoryRecord>,
}

/// 构造检索串
pub fn search_query(title: &str) -> String {
    format!("{} in:name,description", title)
}

pub struct GitHubSearch {
    client: Client,
    api_base: String,
    metrics: Arc<SearchMetrics>,
}

impl GitHubSearch {
    pub fn new(
        token: Option<&str>,
        api_base: &str,
        timeout_secs: u64,
        metrics: Arc<SearchMetrics>,
    ) -> Result<Self, IntegrationError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT_NAME));

        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => {
                let mut value = HeaderValue::from_str(&format!("token {}", t))
                    .map_err(|e| IntegrationError::Credentials(e.to_string()))?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
                tracing::info!("GitHubSearch initialized with token");
            }
            None => tracing::warn!("GITHUB_TOKEN not found, searching unauthenticated"),
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            metrics,
        })
    }

    pub fn from_config(
        section: &GithubSection,
        metrics: Arc<SearchMetrics>,
    ) -> Result<Self, IntegrationError> {
        Self::new(
            section.token.as_deref(),
            &section.api_base,
            section.timeout_secs,
            metrics,
        )
    }

    async fn fetch(&self, q: &str) -> Result<Vec<RepositoryRecord>, IntegrationError> {
        let response = self
            .client
            .get(format!("{}/search/repositories", self.api_base))
            .query(&[
                ("q", q),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", PER_PAGE),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IntegrationError::upstream("GitHub", response.status()));
        }

        let page: SearchPage = response
            .json()
            .await
            .map_err(|e| IntegrationError::Decode(e.to_string()))?;
        Ok(page.items)
    }
}

#[async_trait]
impl RepositorySearch for GitHubSearch {
    async fn search(
        &self,
        query: &str,
        keywords: &[String],
    ) -> Result<Vec<RepositoryRecord>, IntegrationError> {
        let q = search_query(query);
        tracing::info!(query = %q, keywords = ?keywords, "GitHub search");

        match self.fetch(&q).await {
            Ok(items) => {
                self.metrics.record_success();
                Ok(items)
            }
            Err(e) => {
                self.metrics.record_error();
                tracing::error!("GitHub search failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn query_targets_name_and_description() {
        assert_eq!(
            search_query("Intro to Kubernetes"),
            "Intro to Kubernetes in:name,description"
        );
    }

    #[test]
    fn record_tolerates_missing_fields() {
        let r: RepositoryRecord =
            serde_json::from_value(json!({"full_name": "a/b", "description": null})).unwrap();
        assert_eq!(r.full_name, "a/b");
        assert_eq!(r.stargazers_count, 0);
        assert!(!r.has_wiki);
        assert!(r.description.is_none());
    }

    #[tokio::test]
    async fn search_sends_expected_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/repositories")
            .match_header("authorization", "token secret")
            .match_header("accept", "application/vnd.github.v3+json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Rust async in:name,description".into()),
                Matcher::UrlEncoded("sort".into(), "stars".into()),
                Matcher::UrlEncoded("order".into(), "desc".into()),
                Matcher::UrlEncoded("per_page".into(), "10".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "total_count": 1,
                    "items": [{
                        "full_name": "tokio-rs/tokio",
                        "html_url": "https://github.com/tokio-rs/tokio",
                        "description": "A runtime for writing reliable asynchronous applications",
                        "stargazers_count": 25000,
                        "forks_count": 2300,
                        "language": "Rust",
                        "has_wiki": true
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let metrics = Arc::new(SearchMetrics::new());
        let search = GitHubSearch::new(Some("secret"), &server.url(), 5, metrics.clone()).unwrap();
        let items = search.search("Rust async", &[]).await.unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].full_name, "tokio-rs/tokio");
        assert_eq!(items[0].stargazers_count, 25000);
        assert_eq!(metrics.snapshot(), (1, 0));
    }

    #[tokio::test]
    async fn upstream_error_is_counted_and_returned() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search/repositories")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let metrics = Arc::new(SearchMetrics::new());
        let search = GitHubSearch::new(None, &server.url(), 5, metrics.clone()).unwrap();
        let err = search.search("anything", &[]).await.unwrap_err();

        assert!(matches!(
            err,
            IntegrationError::Upstream { status: 403, service: "GitHub", .. }
        ));
        assert_eq!(metrics.snapshot(), (0, 1));
    }
}
