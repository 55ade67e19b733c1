//! Observability for the serverspec handler
//!
//! Provides:
//! - tracing subscriber setup (JSON lines on stderr, `RUST_LOG` aware)
//! - a structured logger with named events for the fan-out pipeline

use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Error;
use crate::report::Summary;

/// Install the global subscriber.
///
/// Output goes to stderr so stdout remains the confirmation channel. Safe to
/// call more than once; later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .try_init();
}

/// Structured logger for handler events
#[derive(Clone)]
pub struct StructuredLogger {
    entity: String,
    namespace: String,
}

impl StructuredLogger {
    pub fn new(entity: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            namespace: namespace.into(),
        }
    }

    /// Log a successfully decoded report
    pub fn log_report_parsed(&self, version: &str, examples: usize, summary: &Summary) {
        debug!(
            event = "report_parsed",
            entity = %self.entity,
            namespace = %self.namespace,
            version = %version,
            examples = examples,
            example_count = summary.example_count,
            failure_count = summary.failure_count,
            pending_count = summary.pending_count,
            errors_outside_of_examples = summary.errors_outside_of_examples_count,
            duration_secs = summary.duration,
            "Parsed serverspec report"
        );
    }

    /// Log a derived event accepted by the API
    pub fn log_event_dispatched(&self, check: &str, state: &str, status: u32, url: &str) {
        info!(
            event = "event_dispatched",
            entity = %self.entity,
            namespace = %self.namespace,
            check = %check,
            state = %state,
            status = status,
            url = %url,
            "Sent derived event to sensu api"
        );
    }

    /// Log the failure that aborted the run
    pub fn log_dispatch_failed(&self, index: usize, total: usize, check: &str, error: &Error) {
        warn!(
            event = "dispatch_failed",
            entity = %self.entity,
            namespace = %self.namespace,
            check = %check,
            sent = index,
            total = total,
            kind = error.kind(),
            error = %error,
            "Aborting fan-out, remaining examples not sent"
        );
    }

    /// Log completion of the whole fan-out
    pub fn log_run_completed(&self, sent: usize) {
        info!(
            event = "run_completed",
            entity = %self.entity,
            namespace = %self.namespace,
            sent = sent,
            "All serverspec examples sent"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("web-01", "prod");
        assert_eq!(logger.entity, "web-01");
        assert_eq!(logger.namespace, "prod");
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing(false);
        init_tracing(true);
    }
}
