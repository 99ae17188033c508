//! Tracing initialisation for the depwatch worker.
//!
//! The worker always runs at `info` verbosity unless `RUST_LOG` says
//! otherwise; the only knob is JSON output for log aggregation pipelines.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// * `json` — when `true`, emit newline-delimited JSON log lines.
///
/// Respects the `RUST_LOG` environment variable for fine-grained filtering;
/// defaults to `info` when unset. Safe to call more than once — the global
/// subscriber can only be set once per process, so subsequent calls are
/// silently ignored.
pub fn init_tracing(json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_safe() {
        init_tracing(false);
        init_tracing(true);
    }
}
