//! Process-wide provider behaviour.

use std::sync::Arc;

use otlplogs::global::{self, GlobalError};
use otlplogs::logs::{LoggerProvider, NoopLoggerProvider};
use otlplogs::test_utils::RecordingLoggerProvider;
use otlplogs::{LogRecord, Severity};
use rstest::rstest;
use serial_test::serial;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::fixtures::{fresh_global, recorder};

#[rstest]
#[serial]
fn loggers_acquired_at_startup_reach_the_installed_provider(
    #[from(fresh_global)] _reset: (),
    recorder: RecordingLoggerProvider,
) {
    let early = otlplogs::logger("startup");
    early.emit(LogRecord::with_message(Severity::Debug, "too early"));

    otlplogs::set_logger_provider(recorder.clone()).expect("install recorder");
    early.emit(LogRecord::with_message(Severity::Info, "ready"));
    otlplogs::logger("later").emit(LogRecord::with_message(Severity::Warn, "late"));

    let emitted: Vec<(String, Option<String>)> = recorder
        .emitted()
        .into_iter()
        .map(|(name, record)| (name, record.body))
        .collect();
    assert_eq!(
        emitted,
        vec![
            ("startup".to_owned(), Some("ready".to_owned())),
            ("later".to_owned(), Some("late".to_owned())),
        ]
    );
}

#[rstest]
#[serial]
fn the_global_provider_cannot_delegate_to_itself(#[from(fresh_global)] _reset: ()) {
    let current = otlplogs::logger_provider();
    assert_eq!(
        otlplogs::set_logger_provider(current),
        Err(GlobalError::SelfDelegation)
    );
}

#[rstest]
#[serial]
fn replacing_the_provider_only_affects_new_loggers(
    #[from(fresh_global)] _reset: (),
    recorder: RecordingLoggerProvider,
) {
    let early = global::logger("early");
    otlplogs::set_logger_provider(recorder.clone()).expect("install recorder");
    otlplogs::set_logger_provider(NoopLoggerProvider::new()).expect("replace provider");

    early.emit(LogRecord::with_message(Severity::Info, "still recorded"));
    global::logger("fresh").emit(LogRecord::with_message(Severity::Info, "discarded"));

    assert_eq!(recorder.bodies(), ["still recorded"]);
}

#[rstest]
#[serial]
fn provider_handles_are_shareable(
    #[from(fresh_global)] _reset: (),
    recorder: RecordingLoggerProvider,
) {
    otlplogs::set_logger_provider(recorder.clone()).expect("install recorder");
    let handle = global::logger_provider();
    let shared: Arc<dyn LoggerProvider> = Arc::new(handle.clone());
    shared.logger("via-arc");
    handle.logger("via-handle");

    let names: Vec<String> = recorder.created().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["via-arc", "via-handle"]);
}
