//! Verified webhook events

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A webhook that passed every verification gate.
///
/// Only the receiver constructs these; handlers get a shared reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookEvent {
    payload: Map<String, Value>,
    signature: String,
    timestamp: i64,
}

impl WebhookEvent {
    pub(crate) fn new(payload: Map<String, Value>, signature: String, timestamp: i64) -> Self {
        Self {
            payload,
            signature,
            timestamp,
        }
    }

    /// Decoded JSON body
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Signature the sender attached
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Unix timestamp the sender attached
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Timestamp as a UTC datetime, if representable
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Value of a top-level payload field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// The `event` field, e.g. `notification.delivered`
    pub fn event_type(&self) -> Option<&str> {
        self.get("event").and_then(Value::as_str)
    }

    /// The `mogotes_id` field
    pub fn mogotes_id(&self) -> Option<&Value> {
        self.get("mogotes_id")
    }

    /// Consume the event and return the payload
    pub fn into_payload(self) -> Map<String, Value> {
        self.payload
    }
}
