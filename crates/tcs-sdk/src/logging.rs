//! 日志初始化

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// 安装全局 `tracing` 订阅者
///
/// 读取 `RUST_LOG`，未设置时为 `info`；同时把 `log` crate 的记录转发到 `tracing`。
/// 重复调用无效果。进程中已有其他订阅者时保留已有的。
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = tracing_log::LogTracer::init();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
