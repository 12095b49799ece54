//! Events: the unit of communication between threads.

use crate::error::EventError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A selected, requested, or injected event.
///
/// Immutable once created: the scheduler clones it into candidates and
/// feedback, it never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BPEvent {
    /// String identifier used for matching and dispatching.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Optional payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl BPEvent {
    /// Create an event with no detail.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            detail: None,
        }
    }

    /// Attach a detail payload.
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Borrow the event type.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Look up a field of an object detail.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.detail.as_ref().and_then(|d| d.get(key))
    }

    /// The detail handed to feedback handlers: the payload, or an empty
    /// object when the event has none.
    pub fn detail_or_default(&self) -> Value {
        self.detail
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Validate and decode untyped input.
    pub fn from_value(value: Value) -> Result<Self, EventError> {
        if !is_bp_event(&value) {
            return Err(EventError::Malformed(describe(&value)));
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl From<&str> for BPEvent {
    fn from(event_type: &str) -> Self {
        Self::new(event_type)
    }
}

impl From<String> for BPEvent {
    fn from(event_type: String) -> Self {
        Self::new(event_type)
    }
}

/// Returns true only if `value` is an object with a string `type` field.
pub fn is_bp_event(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get("type"))
        .is_some_and(Value::is_string)
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(obj) => match obj.get("type") {
            None => "object has no `type` field".to_owned(),
            Some(_) => "`type` field is not a string".to_owned(),
        },
        Value::Null => "expected an object, got null".to_owned(),
        Value::Bool(_) => "expected an object, got a boolean".to_owned(),
        Value::Number(_) => "expected an object, got a number".to_owned(),
        Value::String(_) => "expected an object, got a string".to_owned(),
        Value::Array(_) => "expected an object, got an array".to_owned(),
    }
}
