//! 学习资源推荐服务
//!
//! 启动: cargo run --bin study-bee-recommend --features server
//! 查询: curl 'http://127.0.0.1:8000/recommendation?event_title=Intro%20to%20Kubernetes'

#![cfg(feature = "server")]

use std::sync::Arc;

use anyhow::Context;

use study_bee::config::load_config;
use study_bee::integrations::GitHubSearch;
use study_bee::observability::{self, SearchMetrics};
use study_bee::ranking::RepositoryRanker;
use study_bee::server::{router, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    observability::init();

    // 推荐服务只需要 [github] 与 [server]，不做规划侧的必需项校验
    let cfg = load_config(None).context("loading configuration")?;

    let metrics = Arc::new(SearchMetrics::new());
    let search = GitHubSearch::from_config(&cfg.github, metrics.clone())
        .context("building GitHub client")?;

    let state = ServerState {
        source: Arc::new(RepositoryRanker::new(search)),
        metrics,
        default_max_results: cfg.github.default_max_results,
    };

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("binding {}", cfg.server.bind))?;
    tracing::info!(
        bind = %cfg.server.bind,
        public_url = cfg.server.public_url.as_deref().unwrap_or("-"),
        "Starting recommendation server"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}
