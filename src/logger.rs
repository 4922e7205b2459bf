//! 日志初始化

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

/// 默认过滤规则，屏蔽 HTTP 库的噪音
const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// 初始化日志（重复调用无副作用）
pub fn init() {
    init_with_verbosity(false);
}

/// 初始化日志，`verbose` 为 true 时默认级别为 debug
///
/// 设置了 `RUST_LOG` 时以环境变量为准
pub fn init_with_verbosity(verbose: bool) {
    INIT_TRACING.call_once(|| {
        let fallback = if verbose {
            "debug,hyper=warn,reqwest=warn"
        } else {
            DEFAULT_FILTER
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}
