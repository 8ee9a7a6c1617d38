//! Event types for the audited ledger
//!
//! An [`Event`] is one line of the append-only ledger. The four identifying
//! fields are optional on purpose: a record that parses as JSON but lacks
//! `task_id` (say) must still reach the rules so the orphan check can report
//! it. Only lines that are not JSON objects at all are rejected, and that
//! happens in the reader, not here.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Well-known event type names referenced by the built-in rules
pub mod event_types {
    /// Public broadcast; requires a preceding license in the same task
    pub const BROADCAST: &str = "BROADCAST";
    /// License check started
    pub const LICENSE_CHECK: &str = "LICENSE_CHECK";
    /// License check succeeded
    pub const LICENSE_VALID: &str = "LICENSE_VALID";
    /// Movement of credits; requires a passed proposal in the same task
    pub const CREDIT_TRANSFER: &str = "CREDIT_TRANSFER";
    /// Proposal accepted
    pub const PROPOSAL_PASSED: &str = "PROPOSAL_PASSED";
    /// Proposal opened, carries `proposal_id`
    pub const PROPOSAL_CREATED: &str = "PROPOSAL_CREATED";
    /// Affirmative vote, carries `proposal_id`
    pub const PROPOSAL_VOTED_YES: &str = "PROPOSAL_VOTED_YES";
    /// Record written by the watchdog into the violations log
    pub const VIOLATION: &str = "VIOLATION";
}

/// The four fields every well-formed event must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// `task_id`
    TaskId,
    /// `agent_id`
    AgentId,
    /// `event_type`
    EventType,
    /// `timestamp`
    Timestamp,
}

impl RequiredField {
    /// Checking order used when looking for the first missing field
    pub const ALL: [RequiredField; 4] = [
        RequiredField::TaskId,
        RequiredField::AgentId,
        RequiredField::EventType,
        RequiredField::Timestamp,
    ];

    /// JSON key of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::TaskId => "task_id",
            RequiredField::AgentId => "agent_id",
            RequiredField::EventType => "event_type",
            RequiredField::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event in the ledger
///
/// Events are immutable once read. Keys other than the four identifying
/// fields are kept verbatim in `payload` and serialised back at the top
/// level, so a read/write cycle preserves the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Event {
    /// Kind of occurrence (e.g. `BROADCAST`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Causal context grouping related events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Actor that produced the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// ISO-8601 instant, kept as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Every other key of the record
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Event {
    /// Create a fully identified event with an empty payload
    pub fn new(
        event_type: impl Into<String>,
        task_id: impl Into<String>,
        agent_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            event_type: Some(event_type.into()),
            task_id: Some(task_id.into()),
            agent_id: Some(agent_id.into()),
            timestamp: Some(timestamp.into()),
            payload: Map::new(),
        }
    }

    /// Add a payload field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Build an event from a parsed JSON object
    ///
    /// Identifying fields are extracted leniently: strings are taken as is,
    /// `null` counts as absent, and any other JSON value is kept as its
    /// JSON text so the record stays auditable.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let event_type = take_text(&mut object, RequiredField::EventType);
        let task_id = take_text(&mut object, RequiredField::TaskId);
        let agent_id = take_text(&mut object, RequiredField::AgentId);
        let timestamp = take_text(&mut object, RequiredField::Timestamp);
        Self {
            event_type,
            task_id,
            agent_id,
            timestamp,
            payload: object,
        }
    }

    /// Parse one NDJSON line
    pub fn from_json_str(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        Self::try_from(value)
    }

    /// Render as a single NDJSON line (no trailing newline)
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether this event has the given type
    pub fn is_type(&self, event_type: &str) -> bool {
        self.event_type.as_deref() == Some(event_type)
    }

    /// `event_type` as `&str`
    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    /// `task_id` as `&str`
    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    /// `agent_id` as `&str`
    pub fn agent_id(&self) -> Option<&str> {
        self.agent_id.as_deref()
    }

    /// `timestamp` as `&str`
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Value of a required field, if present and non-empty
    pub fn required(&self, field: RequiredField) -> Option<&str> {
        let value = match field {
            RequiredField::TaskId => self.task_id(),
            RequiredField::AgentId => self.agent_id(),
            RequiredField::EventType => self.event_type(),
            RequiredField::Timestamp => self.timestamp(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// First required field that is missing or empty
    pub fn first_missing_field(&self) -> Option<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .find(|field| self.required(*field).is_none())
    }

    /// Look up a payload field
    ///
    /// Top-level keys win; otherwise a nested `"payload"` object is searched,
    /// since producers write both shapes.
    pub fn field(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.payload.get(key) {
            return Some(value);
        }
        self.payload
            .get("payload")
            .and_then(Value::as_object)
            .and_then(|nested| nested.get(key))
    }

    /// Payload field as a string, if it is one
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

impl TryFrom<Value> for Event {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self::from_object(object)),
            other => Err(Error::NotAnObject(json_kind(&other))),
        }
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Event::try_from(value).map_err(serde::de::Error::custom)
    }
}

fn take_text(object: &mut Map<String, Value>, field: RequiredField) -> Option<String> {
    match object.remove(field.as_str())? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
