//! Fan-out of one inbound serverspec event into per-example events
//!
//! Examples are processed strictly in report order and the run stops at the
//! first error. Events already accepted by the API are not retracted, so a
//! failed run may leave a partial set of derived events behind.

use crate::config::HandlerConfig;
use crate::dispatch::{DispatchReceipt, EventSink};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::observability::StructuredLogger;
use crate::report::Report;
use crate::transform::EventTransformer;

/// Translate `event` and send every derived event to `sink`.
///
/// Returns one receipt per example on success.
pub fn run<S: EventSink>(
    event: &Event,
    config: &HandlerConfig,
    sink: &mut S,
) -> Result<Vec<DispatchReceipt>> {
    if event.has_metrics() {
        return Err(Error::MetricsPresent);
    }

    let report = Report::parse(&event.check.output)?;

    let logger = StructuredLogger::new(event.entity_name(), &config.namespace);
    logger.log_report_parsed(&report.version, report.examples.len(), &report.summary);

    let transformer = EventTransformer::new(config);
    let total = report.examples.len();
    let mut receipts = Vec::with_capacity(total);

    for (index, example) in report.examples().enumerate() {
        let outcome = transformer
            .derive(event, example)
            .and_then(|derived| sink.send(&derived).map(|receipt| (derived, receipt)));

        match outcome {
            Ok((derived, receipt)) => {
                let state = derived
                    .check
                    .state
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                logger.log_event_dispatched(
                    derived.check_name(),
                    &state,
                    derived.check.status,
                    &receipt.url,
                );
                receipts.push(receipt);
            }
            Err(e) => {
                logger.log_dispatch_failed(index, total, &example.id, &e);
                return Err(e);
            }
        }
    }

    logger.log_run_completed(receipts.len());
    Ok(receipts)
}
