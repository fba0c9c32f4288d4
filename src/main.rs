//! Study Bee - 学习规划智能体
//!
//! 入口：加载配置、装配组件，跑一次今日学习规划并输出最终状态。
//! 用法: study-bee [config.toml]

use std::path::PathBuf;

use anyhow::Context;
use study_bee::{config::load_config, create_agent_components, observability};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    observability::init();

    tracing::info!("--- Starting Learning Agent Orchestration ---");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load configuration")?;

    // 必需凭据缺失：记录并以非零状态退出，不进入规划
    let components = match create_agent_components(&cfg) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Tool Initialization Failed: {}", e);
            std::process::exit(1);
        }
    };

    let recipient = cfg.app.recipient.clone().unwrap_or_default();
    let orchestrator = components.into_orchestrator(&cfg);
    let status = orchestrator
        .start(&recipient, cfg.app.max_iterations)
        .await
        .context("Planning run failed")?;

    tracing::info!("Final Agent Status: {}", status);
    tracing::info!("--- Orchestration Complete ---");
    Ok(())
}
