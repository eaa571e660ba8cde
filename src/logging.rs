use tracing_subscriber::{
    fmt,
    EnvFilter,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use tracing::Level;

use crate::{DashboardError, Result};

/// Installs the process-wide tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise this crate and the HTTP trace layer
/// log at INFO. Lives from process start to process exit.
pub fn init_logger() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                Level::INFO,
                Level::INFO
            ))
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| DashboardError::Internal(format!("Failed to initialize logger: {}", e)))
}
