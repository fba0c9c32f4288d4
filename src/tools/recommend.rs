//! get_top_github_recommendations：按活动标题推荐实战仓库

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::integrations::RecommendationSource;
use crate::tools::{RecommendationArgs, Tool, ToolKind};

pub const MAX_RESULTS_LIMIT: usize = 10;

pub struct RecommendationTool {
    source: Arc<dyn RecommendationSource>,
    default_max_results: usize,
}

impl RecommendationTool {
    pub fn new(source: Arc<dyn RecommendationSource>, default_max_results: usize) -> Self {
        Self {
            source,
            default_max_results,
        }
    }
}

#[async_trait]
impl Tool for RecommendationTool {
    const KIND: ToolKind = ToolKind::Recommendations;
    type Args = RecommendationArgs;

    async fn call(&self, args: RecommendationArgs) -> Result<Value, String> {
        let max = args.max_results.unwrap_or(self.default_max_results);
        if !(1..=MAX_RESULTS_LIMIT).contains(&max) {
            return Err(format!(
                "max_results must be between 1 and {MAX_RESULTS_LIMIT}, got {max}"
            ));
        }
        tracing::info!(event_title = %args.event_title, max, "Fetching GitHub recommendations");
        let recs = self
            .source
            .top_recommendations(&args.event_title, max)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::to_value(recs).map_err(|e| e.to_string())
    }
}
