//! Tracing initialisation for the build front-end.
//!
//! Log lines go to stderr. Stdout carries the banner, the echoed compiler
//! command, the relayed compiler output and the yes/no prompts, and it must
//! stay in the order the user reads and answers it. Scripts that capture the
//! echoed command from stdout therefore never see log lines, whatever the
//! verbosity.
//!
//! Filtering follows `RUST_LOG` when it is set; otherwise the level comes
//! from [`LogSettings`] (`SPINDEC_VERBOSE`). `SPINDEC_LOG_JSON` switches the
//! formatter to newline-delimited JSON for log collectors.
//!
//! Only the first [`init_tracing`] call installs a subscriber; later calls
//! are no-ops, so tests and the binary may both call it.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging preferences read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Emit newline-delimited JSON instead of human-readable lines
    pub json: bool,
    /// Default verbosity when `RUST_LOG` is not set
    pub level: Level,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            json: false,
            level: Level::WARN,
        }
    }
}

impl LogSettings {
    /// Create from environment variables
    ///
    /// Reads:
    /// - SPINDEC_VERBOSE (optional) - "1" or "true" raises the level to DEBUG
    /// - SPINDEC_LOG_JSON (optional) - "1" or "true" selects JSON output
    pub fn from_env() -> Self {
        let flag = |name: &str| {
            std::env::var(name)
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true"))
                .unwrap_or(false)
        };

        Self {
            json: flag("SPINDEC_LOG_JSON"),
            level: if flag("SPINDEC_VERBOSE") {
                Level::DEBUG
            } else {
                Level::WARN
            },
        }
    }
}

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG`; falls back to `settings.level` otherwise.
/// Only the first call in a process takes effect.
pub fn init_tracing(settings: LogSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    if settings.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}
