//! RepositoryRanker：检索 → 评分 → 稳定降序 → 截断 top-k

use async_trait::async_trait;

use crate::integrations::{IntegrationError, RecommendationSource, RepositoryRecord, RepositorySearch};
use crate::ranking::score::{analyze, extract_keywords, Recommendation};

/// 对候选集评分排序；同分保持上游顺序
pub fn rank(repos: &[RepositoryRecord], max_results: usize) -> Vec<Recommendation> {
    let mut analyzed: Vec<Recommendation> = repos.iter().map(analyze).collect();
    analyzed.sort_by(|a, b| b.score.total_cmp(&a.score));
    analyzed.truncate(max_results);
    analyzed
}

pub struct RepositoryRanker<S> {
    search: S,
}

impl<S: RepositorySearch> RepositoryRanker<S> {
    pub fn new(search: S) -> Self {
        Self { search }
    }
}

#[async_trait]
impl<S: RepositorySearch> RecommendationSource for RepositoryRanker<S> {
    async fn top_recommendations(
        &self,
        event_title: &str,
        max_results: usize,
    ) -> Result<Vec<Recommendation>, IntegrationError> {
        let keywords = extract_keywords(event_title);
        let repos = self.search.search(event_title, &keywords).await?;
        let ranked = rank(&repos, max_results);
        tracing::debug!(
            event_title,
            candidates = repos.len(),
            returned = ranked.len(),
            "ranked recommendations"
        );
        Ok(ranked)
    }
}
