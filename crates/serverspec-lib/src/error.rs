//! Error taxonomy for the serverspec event handler
//!
//! Every failure is terminal for the run: nothing is retried and nothing is
//! recovered locally. Callers propagate with `?` and report at the top level.

use thiserror::Error;

/// Errors raised while translating and dispatching serverspec results
#[derive(Debug, Error)]
pub enum Error {
    /// Standard input could not be read
    #[error("failed to read stdin: {0}")]
    InputRead(#[from] std::io::Error),

    /// Standard input was not a valid Sensu event
    #[error("failed to unmarshal stdin data: {0}")]
    InputDecode(#[source] serde_json::Error),

    /// The inbound event carries metrics, which this handler does not accept
    #[error("event should not contain metrics")]
    MetricsPresent,

    /// The check output is not a serverspec JSON report
    #[error("failed to unmarshal serverspec data: {0}")]
    MalformedReport(#[source] serde_json::Error),

    /// The report decoded but holds no examples
    #[error("no serverspec examples in check output")]
    EmptyReport,

    /// An example reported a status outside passed/failed/unknown/pending
    #[error("unknown serverspec status: {0:?}")]
    UnknownStatus(String),

    /// A derived event could not be encoded
    #[error("failed to marshal event data: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request URL or request itself could not be constructed
    #[error("failed to create http request for {url}: {message}")]
    RequestBuild { url: String, message: String },

    /// The request never completed
    #[error("failed to send event data to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("sensu api rejected event at {url} ({status}): {body}")]
    ApiRejected {
        url: String,
        status: u16,
        body: String,
    },

    /// Startup configuration is missing or invalid
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl Error {
    /// Short machine-friendly name, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InputRead(_) | Error::InputDecode(_) => "input",
            Error::MetricsPresent => "metrics_present",
            Error::MalformedReport(_) => "malformed_report",
            Error::EmptyReport => "empty_report",
            Error::UnknownStatus(_) => "unknown_status",
            Error::Serialization(_) => "serialization",
            Error::RequestBuild { .. } => "request_build",
            Error::Transport { .. } | Error::ApiRejected { .. } => "transport",
            Error::Configuration(_) => "configuration",
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_message_quotes_value() {
        let err = Error::UnknownStatus("skipped".to_string());
        assert_eq!(err.to_string(), "unknown serverspec status: \"skipped\"");
        assert_eq!(err.kind(), "unknown_status");
    }

    #[test]
    fn test_rejection_is_transport_class() {
        let err = Error::ApiRejected {
            url: "http://127.0.0.1:8080/api".to_string(),
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.kind(), "transport");
        assert!(err.to_string().contains("500"));
    }
}
