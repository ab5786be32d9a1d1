//! `tracing` bridge.

use std::collections::BTreeMap;
use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::{is_own_target, logger_name};
use crate::global;
use crate::level::Severity;
use crate::log_record::LogRecord;

/// [`Layer`] that emits every `tracing` event on the global logger named
/// after the event target.
///
/// The `message` field becomes the record body; all other fields become
/// attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingBridge;

impl TracingBridge {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    attributes: BTreeMap<String, String>,
}

impl FieldVisitor {
    fn store(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.attributes.insert(field.name().to_owned(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field, value.to_owned());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.store(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.store(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.store(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.store(field, format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for TracingBridge {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let level = *metadata.level();
        let mut record = LogRecord::new()
            .with_severity(Severity::from(level))
            .with_severity_text(level.as_str());
        record.body = visitor.message;
        record.attributes = visitor.attributes;

        global::logger(&logger_name(metadata.target())).emit(record);
    }
}
