//! Per-example event derivation
//!
//! This module provides:
//! - Example id normalisation into check names
//! - Status mapping onto Sensu check state
//! - Construction of one derived event per example

mod identifier;
mod status;

pub use identifier::normalize_id;
pub use status::{map_status, TestStatus, STATUS_CRITICAL, STATUS_OK, STATUS_WARNING};

use crate::config::HandlerConfig;
use crate::error::Result;
use crate::event::Event;
use crate::report::Example;

/// Builds derived events from an inbound event and its examples
#[derive(Debug, Clone)]
pub struct EventTransformer {
    namespace: String,
    handlers: Vec<String>,
}

impl EventTransformer {
    pub fn new(config: &HandlerConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            handlers: config.handlers.clone(),
        }
    }

    /// Derive an event for `example`, stamped with the current time
    pub fn derive(&self, inbound: &Event, example: &Example) -> Result<Event> {
        self.derive_at(inbound, example, chrono::Utc::now().timestamp())
    }

    /// Derive an event for `example` with an explicit timestamp.
    ///
    /// The result is an independent clone of `inbound`; only the check name,
    /// namespaces, handlers, output, timestamp, state and status are replaced.
    pub fn derive_at(&self, inbound: &Event, example: &Example, timestamp: i64) -> Result<Event> {
        let (state, status) = map_status(&example.status)?;

        let mut event = inbound.clone();
        event.timestamp = timestamp;
        event.entity.metadata.namespace = self.namespace.clone();
        event.check.metadata.name = normalize_id(&example.id);
        event.check.metadata.namespace = self.namespace.clone();
        event.check.handlers = self.handlers.clone();
        event.check.output = example.to_string();
        event.check.state = Some(state);
        event.check.status = status;

        Ok(event)
    }
}
