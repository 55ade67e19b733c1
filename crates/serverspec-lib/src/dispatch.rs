//! Sensu events API dispatch
//!
//! Each derived event is upserted with a synchronous `PUT` to
//! `/api/core/v2/namespaces/{namespace}/events/{entity}/{check}`.
//! There is no batching, retry or backoff.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::config::HandlerConfig;
use crate::error::{Error, Result};
use crate::event::Event;

/// Request timeout for a single event upsert
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Confirmation of a completed upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub url: String,
    pub status: u16,
}

/// Destination for derived events
pub trait EventSink {
    fn send(&mut self, event: &Event) -> Result<DispatchReceipt>;
}

/// Blocking client for the Sensu events API
pub struct ApiDispatcher {
    client: Client,
    base_url: Url,
    namespace: String,
    token: String,
}

impl ApiDispatcher {
    /// Create a dispatcher from configuration. The base URL must be an
    /// absolute http(s) URL.
    pub fn new(config: &HandlerConfig) -> Result<Self> {
        let base_url = config.base_url().map_err(|e| Error::RequestBuild {
            url: config.url.clone(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::RequestBuild {
                url: config.url.clone(),
                message: format!("failed to create http client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            namespace: config.namespace.clone(),
            token: config.token.clone(),
        })
    }

    /// Upsert URL for an event. Names are percent-encoded as path segments.
    pub fn event_url(&self, event: &Event) -> Result<Url> {
        let build_error = |message: &str| Error::RequestBuild {
            url: self.base_url.to_string(),
            message: message.to_string(),
        };

        if event.entity_name().is_empty() {
            return Err(build_error("event has no entity name"));
        }
        if event.check_name().is_empty() {
            return Err(build_error("event has no check name"));
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| build_error("base url cannot carry a path"))?;
            segments.pop_if_empty().extend([
                "api",
                "core",
                "v2",
                "namespaces",
                self.namespace.as_str(),
                "events",
                event.entity_name(),
                event.check_name(),
            ]);
        }

        Ok(url)
    }
}

impl EventSink for ApiDispatcher {
    fn send(&mut self, event: &Event) -> Result<DispatchReceipt> {
        let url = self.event_url(event)?;
        let body = serde_json::to_vec(event).map_err(Error::Serialization)?;

        let request = self
            .client
            .put(url.clone())
            .header(AUTHORIZATION, self.token.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(|e| Error::RequestBuild {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        debug!(url = %url, check = %event.check_name(), "Sending event to sensu api");

        let response = self.client.execute(request).map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::ApiRejected {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(DispatchReceipt {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}
