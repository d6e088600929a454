//! Diagnostics logging via the `tracing` ecosystem.
//!
//! This is the node's own operational log, separate from the `LOG`/`TXLOG`
//! record files. The record loggers report what they cannot surface to their
//! callers (failed appends, panicking UI sinks, rotations) here. Provides:
//! - Console output (colored, human-readable)
//! - Optional file output (daily rotation via `tracing-appender`)
//! - Configurable level via env var `RUST_LOG` or explicit parameter

use std::path::Path;

use anyhow::anyhow;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Suffix of diagnostics files, keeping them apart from `xbridgep2p_*.log`.
const DIAG_SUFFIX: &str = "diag";

/// Initialize the global tracing subscriber.
///
/// Should be called once at program start. A second call fails rather than
/// replacing the first subscriber.
///
/// # Parameters
///
/// - `log_level`: default level if `RUST_LOG` env var is not set (e.g. `"info"`)
/// - `log_dir`: optional directory for daily-rotating diagnostics files
/// - `module_name`: used as the diagnostics file prefix (e.g. `"xbridgep2p"`)
pub fn init_logging(log_level: &str, log_dir: Option<&Path>, module_name: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(true).with_thread_ids(true).with_ansi(true);

    let registry = tracing_subscriber::registry().with(env_filter).with(console_layer);

    let result = if let Some(dir) = log_dir {
        let file_appender = tracing_appender::rolling::daily(dir, format!("{module_name}.{DIAG_SUFFIX}"));
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true);
        registry.with(file_layer).try_init()
    } else {
        registry.try_init()
    };

    result.map_err(|e| anyhow!("tracing subscriber already set: {e}"))
}
