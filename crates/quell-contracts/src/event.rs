//! The inbound security event.
//!
//! An [`Event`] is an immutable string-keyed JSON object constructed at the
//! transport boundary and consumed read-only by exactly one handler instance
//! per dispatch. The runtime only ever reads two well-known keys — `type`
//! (the handler discriminator) and `event_id` (audit correlation) — plus the
//! handler-specific fields each variant requires.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::QuellError;

/// An immutable, arbitrarily-shaped security event.
///
/// Field accessors return `Some` only when the field is present AND a
/// non-empty string — an empty `"user": ""` is treated the same as a missing
/// field, which is what required-field validation relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event(Map<String, Value>);

impl Event {
    /// Build an event from an arbitrary JSON value.
    ///
    /// Returns `QuellError::MalformedEvent` when the value is not an object.
    /// The transport's schema layer normally guarantees this, but the core
    /// never assumes it.
    pub fn from_value(value: Value) -> Result<Self, QuellError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(QuellError::MalformedEvent {
                reason: format!("event body must be a JSON object, got {}", kind_of(&other)),
            }),
        }
    }

    /// The declared event type, if present and non-empty.
    pub fn event_type(&self) -> Option<&str> {
        self.field("type")
    }

    /// The opaque correlation identifier, if present and non-empty.
    pub fn event_id(&self) -> Option<&str> {
        self.field("event_id")
    }

    /// A named string field, if present and non-empty.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The raw value under `key`, regardless of its JSON type.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The verbatim event body, for audit persistence.
    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Event {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
