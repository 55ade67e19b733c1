//! Sensu core/v2 event model
//!
//! Only the fields the handler reads or overrides are typed. Everything else
//! is kept in `extra` maps so that derived events round-trip the inbound
//! event's remaining fields unchanged.

use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Check state in the Sensu event model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventState {
    Passing,
    Failing,
    Flapping,
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventState::Passing => write!(f, "passing"),
            EventState::Failing => write!(f, "failing"),
            EventState::Flapping => write!(f, "flapping"),
        }
    }
}

impl EventState {
    fn from_wire(value: &str) -> Option<Self> {
        match value {
            "passing" => Some(EventState::Passing),
            "failing" => Some(EventState::Failing),
            "flapping" => Some(EventState::Flapping),
            _ => None,
        }
    }
}

/// Sensu serializes a check without handlers as `"handlers": null`
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Empty or unrecognised inbound states decode as `None`; derived events
/// always carry the mapped state.
fn lenient_state<'de, D>(deserializer: D) -> std::result::Result<Option<EventState>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(EventState::from_wire))
}

/// Object metadata shared by checks and entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The check half of an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub output: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub handlers: Vec<String>,
    #[serde(default)]
    pub status: u32,
    #[serde(
        default,
        deserialize_with = "lenient_state",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<EventState>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The monitored resource an event is attributed to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Sensu event, as read from stdin and as sent to the events API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub entity: Entity,
    #[serde(default)]
    pub check: Check,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Decode an event from a reader (stdin in production)
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        serde_json::from_slice(&buf).map_err(Error::InputDecode)
    }

    /// True when the event carries a metrics payload
    pub fn has_metrics(&self) -> bool {
        self.metrics.is_some()
    }

    pub fn entity_name(&self) -> &str {
        &self.entity.metadata.name
    }

    pub fn check_name(&self) -> &str {
        &self.check.metadata.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> Value {
        json!({
            "id": "3a7b1c2d-0000-4000-8000-000000000000",
            "timestamp": 1700000000,
            "entity": {
                "entity_class": "agent",
                "system": {"hostname": "web-01"},
                "metadata": {"name": "web-01", "namespace": "default", "labels": {"role": "web"}}
            },
            "check": {
                "command": "serverspec-runner",
                "interval": 60,
                "handlers": ["serverspec"],
                "output": "{}",
                "status": 0,
                "state": "passing",
                "metadata": {"name": "serverspec", "namespace": "default"}
            },
            "metadata": {"namespace": "default"}
        })
    }

    #[test]
    fn test_decode_typed_fields() {
        let raw = serde_json::to_vec(&sample_event()).unwrap();
        let event = Event::from_reader(raw.as_slice()).unwrap();

        assert_eq!(event.timestamp, 1700000000);
        assert_eq!(event.entity_name(), "web-01");
        assert_eq!(event.check_name(), "serverspec");
        assert_eq!(event.check.handlers, vec!["serverspec".to_string()]);
        assert_eq!(event.check.state, Some(EventState::Passing));
        assert!(!event.has_metrics());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let original = sample_event();
        let event: Event = serde_json::from_value(original.clone()).unwrap();
        let encoded = serde_json::to_value(&event).unwrap();

        assert_eq!(encoded, original);
    }

    #[test]
    fn test_metrics_detected() {
        let mut raw = sample_event();
        raw["metrics"] = json!({"points": [{"name": "cpu", "value": 1.0}]});
        let event: Event = serde_json::from_value(raw).unwrap();

        assert!(event.has_metrics());
    }

    #[test]
    fn test_null_metrics_is_absent() {
        let mut raw = sample_event();
        raw["metrics"] = Value::Null;
        let event: Event = serde_json::from_value(raw).unwrap();

        assert!(!event.has_metrics());
    }

    #[test]
    fn test_null_handlers_decode_as_empty() {
        let mut raw = sample_event();
        raw["check"]["handlers"] = Value::Null;
        let encoded = serde_json::to_vec(&raw).unwrap();

        let event = Event::from_reader(encoded.as_slice()).unwrap();
        assert!(event.check.handlers.is_empty());
    }

    #[test]
    fn test_missing_handlers_decode_as_empty() {
        let mut raw = sample_event();
        raw["check"].as_object_mut().unwrap().remove("handlers");

        let event: Event = serde_json::from_value(raw).unwrap();
        assert!(event.check.handlers.is_empty());
    }

    #[test]
    fn test_unrecognised_state_is_tolerated() {
        for state in [json!(""), json!("silenced"), Value::Null] {
            let mut raw = sample_event();
            raw["check"]["state"] = state.clone();
            let encoded = serde_json::to_vec(&raw).unwrap();

            let event = Event::from_reader(encoded.as_slice())
                .unwrap_or_else(|e| panic!("state {state} rejected: {e}"));
            assert_eq!(event.check.state, None);
        }
    }

    #[test]
    fn test_flapping_state_decodes() {
        let mut raw = sample_event();
        raw["check"]["state"] = json!("flapping");

        let event: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(event.check.state, Some(EventState::Flapping));
    }

    #[test]
    fn test_invalid_input_is_input_error() {
        let err = Event::from_reader("not json".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InputDecode(_)));
        assert_eq!(err.kind(), "input");
    }
}
