//! 可观测性：tracing 订阅器初始化 + 仓库检索计数器

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 安装全局订阅器：RUST_LOG 优先，未设置时为 info；重复调用无副作用
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}

/// 仓库检索次数，按 success / error 计数（进程级共享）
#[derive(Debug, Default)]
pub struct SearchMetrics {
    success: AtomicU64,
    error: AtomicU64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.error.fetch_add(1, Ordering::Relaxed);
    }

    /// (success, error)
    pub fn snapshot(&self) -> (u64, u64) {
        (
            self.success.load(Ordering::Relaxed),
            self.error.load(Ordering::Relaxed),
        )
    }

    /// Prometheus 文本格式
    pub fn render(&self) -> String {
        let (ok, err) = self.snapshot();
        format!(
            "# HELP github_searches_total Total GitHub searches\n\
             # TYPE github_searches_total counter\n\
             github_searches_total{{status=\"success\"}} {ok}\n\
             github_searches_total{{status=\"error\"}} {err}\n"
        )
    }
}
