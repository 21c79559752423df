//! 日志初始化

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::translation::error::{TranslationError, TranslationResult};

/// 初始化全局 tracing 订阅者
///
/// `RUST_LOG` 优先于 `level`。重复初始化返回 `ConfigError`。
pub fn init_tracing(level: &str) -> TranslationResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| TranslationError::ConfigError(format!("无效的日志级别 {}: {}", level, e)))?;

    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TranslationError::ConfigError(format!("日志系统初始化失败: {}", e)))?;

    tracing::info!("{} v{} 日志已初始化", crate::NAME, crate::VERSION);
    Ok(())
}
