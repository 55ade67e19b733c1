//! Serverspec to Sensu event translation
//!
//! This crate provides the core functionality for:
//! - Decoding a serverspec JSON report embedded in a Sensu check output
//! - Deriving one Sensu event per example
//! - Upserting derived events through the Sensu events API
//! - Configuration, errors and structured logging

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod transform;

pub use config::{ConfigOverrides, HandlerConfig};
pub use dispatch::{ApiDispatcher, DispatchReceipt, EventSink};
pub use error::{Error, Result};
pub use event::{Check, Entity, Event, EventState, ObjectMeta};
pub use observability::{init_tracing, StructuredLogger};
pub use pipeline::run;
pub use report::{Example, Exception, Report, Summary};
pub use transform::{map_status, normalize_id, EventTransformer, TestStatus};
