//! 日志初始化
//!
//! 安装全局 `tracing` 订阅者，并把 `log` 记录桥接到 `tracing`。
//! 过滤规则优先取 `RUST_LOG`，否则使用调用方给出的默认指令。

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid filter directive: {0}")]
    Filter(#[from] ParseError),

    #[error("Failed to install log bridge: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),

    #[error("Global subscriber already set: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// 构造过滤器：`RUST_LOG` 优先，否则使用 `default_directive`
pub fn env_filter(default_directive: &str) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive),
    }
}

/// 初始化日志
///
/// 进程内只能成功调用一次。
///
/// ```no_run
/// slsdet::init_logger("slsdet=info").unwrap();
/// ```
pub fn init_logger(default_directive: &str) -> Result<(), LoggerError> {
    let filter = env_filter(default_directive)?;
    tracing_log::LogTracer::init()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(default_directive, "logger initialised");
    Ok(())
}
