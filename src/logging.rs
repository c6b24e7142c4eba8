//! Log sink for the backup engine
//!
//! Every message goes through `tracing`. The `notify` field marks records
//! that server operators should see on the console even when the subscriber
//! is filtered down to warnings.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Severe,
}

/// Emit a log record with an operator-notification flag
pub fn send_log(level: LogLevel, message: &str, notify: bool) {
    match level {
        LogLevel::Info => tracing::info!(notify, "{}", message),
        LogLevel::Warning => tracing::warn!(notify, "{}", message),
        LogLevel::Severe => tracing::error!(notify, "{}", message),
    }
}

/// Install the fmt subscriber used by the binary
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests, embedding hosts) keeps the existing subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
