//! Handler configuration
//!
//! Resolved once at startup and passed by reference afterwards. Sources, in
//! increasing precedence: built-in defaults, an optional config file,
//! `SENSU_SERVERSPEC_*` environment variables, then command-line overrides.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Environment prefix for configuration variables
pub const ENV_PREFIX: &str = "SENSU_SERVERSPEC";

/// Handler configuration
#[derive(Clone, Deserialize)]
pub struct HandlerConfig {
    /// Sensu handlers attached to every derived check
    #[serde(default)]
    pub handlers: Vec<String>,

    /// Namespace for derived checks and entities
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Sensu API token, sent verbatim in the Authorization header
    #[serde(default)]
    pub token: String,

    /// Sensu API base URL
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            namespace: default_namespace(),
            token: String::new(),
            url: default_url(),
        }
    }
}

// Keeps the token out of logs.
impl fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("handlers", &self.handlers)
            .field("namespace", &self.namespace)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("url", &self.url)
            .finish()
    }
}

/// Values supplied explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub handlers: Option<Vec<String>>,
    pub namespace: Option<String>,
    pub token: Option<String>,
    pub url: Option<String>,
}

impl HandlerConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("handlers"),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Apply explicit overrides on top of loaded values
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(handlers) = overrides.handlers {
            self.handlers = handlers;
        }
        if let Some(namespace) = overrides.namespace {
            self.namespace = namespace;
        }
        if let Some(token) = overrides.token {
            self.token = token;
        }
        if let Some(url) = overrides.url {
            self.url = url;
        }
        self
    }

    /// Reject configurations the handler cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::Configuration("sensu api token is required".to_string()));
        }
        if self.namespace.trim().is_empty() {
            return Err(Error::Configuration("namespace must not be empty".to_string()));
        }
        self.base_url()?;
        Ok(())
    }

    /// Parsed API base URL
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.url).map_err(|e| {
            Error::Configuration(format!("invalid sensu api url {:?}: {}", self.url, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Configuration(format!(
                "unsupported sensu api url scheme {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid() -> HandlerConfig {
        HandlerConfig {
            token: "secret".to_string(),
            ..HandlerConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = HandlerConfig::default();
        assert!(config.handlers.is_empty());
        assert_eq!(config.namespace, "default");
        assert_eq!(config.url, "http://127.0.0.1:8080");
        assert!(config.token.is_empty());
    }

    #[test]
    fn test_missing_token_rejected() {
        let err = HandlerConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("token is required"));
    }

    #[test]
    fn test_valid_config_accepted() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_bad_url_rejected() {
        let mut config = valid();
        config.url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        config.url = "ftp://sensu:8080".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let mut config = valid();
        config.namespace = " ".to_string();
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let config = valid().with_overrides(ConfigOverrides {
            namespace: Some("prod".to_string()),
            handlers: Some(vec!["slack".to_string(), "pagerduty".to_string()]),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.namespace, "prod");
        assert_eq!(config.handlers, vec!["slack", "pagerduty"]);
        assert_eq!(config.token, "secret");
        assert_eq!(config.url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "namespace": "staging",
                "handlers": ["email"],
                "url": "https://sensu.example.com:8080"
            }}"#
        )
        .unwrap();

        let config = HandlerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.handlers, vec!["email"]);
        assert_eq!(config.url, "https://sensu.example.com:8080");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let missing = Path::new("/nonexistent/serverspec.json");
        let err = HandlerConfig::load(Some(missing)).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
