//! Log record representation passed to [`Logger::emit`](crate::logs::Logger::emit).
//!
//! Only the fields needed to carry an event through the delegation layer are
//! modelled here. Backends are free to enrich records further before export.

use std::collections::BTreeMap;
use std::fmt;
use std::thread;
use std::time::SystemTime;

use crate::level::Severity;

#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    /// Time the event occurred, when known by the producer.
    pub timestamp: Option<SystemTime>,
    /// Time the record was observed by this library.
    pub observed_timestamp: SystemTime,
    pub severity: Option<Severity>,
    /// Original severity text from the source system (e.g. "WARNING").
    pub severity_text: Option<String>,
    pub body: Option<String>,
    /// Structured key-value pairs attached to the record.
    pub attributes: BTreeMap<String, String>,
    /// Name of the thread that created the record (if any).
    pub thread_name: Option<String>,
}

impl LogRecord {
    /// Create an empty record stamped with the current time and thread.
    pub fn new() -> Self {
        Self {
            timestamp: None,
            observed_timestamp: SystemTime::now(),
            severity: None,
            severity_text: None,
            body: None,
            attributes: BTreeMap::new(),
            thread_name: thread::current().name().map(ToString::to_string),
        }
    }

    /// Shorthand for a record with a severity and a body.
    pub fn with_message(severity: Severity, body: impl Into<String>) -> Self {
        Self::new().with_severity(severity).with_body(body)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_severity_text(mut self, text: impl Into<String>) -> Self {
        self.severity_text = Some(text.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach an attribute, replacing any previous value for `key`.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl Default for LogRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = self
            .severity_text
            .as_deref()
            .or_else(|| self.severity.map(Severity::as_str))
            .unwrap_or("UNSPECIFIED");
        write!(f, "{} - {}", level, self.body.as_deref().unwrap_or_default())
    }
}
