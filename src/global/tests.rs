//! Tests for the placeholder provider and the process-wide entry points.

use std::sync::{Arc, Barrier, mpsc};
use std::thread;
use std::time::Duration;

use rstest::{fixture, rstest};
use serial_test::serial;

use crate::level::Severity;
use crate::log_record::LogRecord;
use crate::logs::{Logger, LoggerConfig, LoggerProvider, NoopLoggerProvider};
use crate::test_utils::{CreatedLogger, RecordingLoggerProvider};

use super::*;

#[fixture]
fn provider() -> DelegatingLoggerProvider {
    DelegatingLoggerProvider::new()
}

fn versioned(version: &str) -> LoggerConfig {
    LoggerConfig::new().with_version(version)
}

#[rstest]
fn same_identity_returns_same_placeholder(provider: DelegatingLoggerProvider) {
    let first = provider.logger_with_config("svc-a", &versioned("1.0"));
    let second = provider.logger_with_config("svc-a", &versioned("1.0"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.placeholder_count(), 1);
}

#[rstest]
fn missing_version_matches_empty_version(provider: DelegatingLoggerProvider) {
    let first = provider.logger("svc-b");
    let second = provider.logger_with_config("svc-b", &versioned(""));
    assert!(Arc::ptr_eq(&first, &second));
}

#[rstest]
#[case("svc-a", "1.0", "svc-a", "2.0")]
#[case("svc-a", "1.0", "svc-b", "1.0")]
#[case("svc-a", "", "svc-a", "1.0")]
fn distinct_identities_return_distinct_placeholders(
    provider: DelegatingLoggerProvider,
    #[case] name_a: &str,
    #[case] version_a: &str,
    #[case] name_b: &str,
    #[case] version_b: &str,
) {
    let a = provider.logger_with_config(name_a, &versioned(version_a));
    let b = provider.logger_with_config(name_b, &versioned(version_b));
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(provider.placeholder_count(), 2);
}

#[rstest]
fn emit_before_installation_is_dropped(provider: DelegatingLoggerProvider) {
    let logger = provider.logger("quiet");
    logger.emit(LogRecord::with_message(Severity::Info, "nobody hears this"));
    assert!(!provider.is_delegated());
}

#[rstest]
fn installation_rewires_existing_placeholders(provider: DelegatingLoggerProvider) {
    let backend = RecordingLoggerProvider::new();
    let p1 = provider.logger_with_config("svc-a", &versioned("1.0"));

    p1.emit(LogRecord::with_message(Severity::Info, "R1"));
    assert!(backend.emitted().is_empty());

    provider
        .set_delegate(Arc::new(backend.clone()))
        .expect("first installation succeeds");
    p1.emit(LogRecord::with_message(Severity::Info, "R2"));

    assert_eq!(
        backend.created(),
        vec![CreatedLogger {
            name: "svc-a".into(),
            config: versioned("1.0"),
        }]
    );
    assert_eq!(backend.bodies(), vec!["R2".to_string()]);
}

#[rstest]
fn installation_passes_original_config(provider: DelegatingLoggerProvider) {
    let backend = RecordingLoggerProvider::new();
    let config = versioned("3.1")
        .with_schema_url("https://example.com/schema")
        .with_attribute("region", "eu");
    let _logger = provider.logger_with_config("svc-c", &config);

    provider.set_delegate(Arc::new(backend.clone())).unwrap();

    let created = backend.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].config, config);
}

#[rstest]
fn installation_discards_cache(provider: DelegatingLoggerProvider) {
    let backend = RecordingLoggerProvider::new();
    let _a = provider.logger("a");
    let _b = provider.logger("b");
    assert_eq!(provider.placeholder_count(), 2);

    provider.set_delegate(Arc::new(backend.clone())).unwrap();
    assert_eq!(provider.placeholder_count(), 0);

    let fresh = provider.logger("fresh");
    fresh.emit(LogRecord::with_message(Severity::Warn, "direct"));
    assert_eq!(provider.placeholder_count(), 0);
    assert_eq!(backend.created().len(), 3);
    assert_eq!(backend.emitted()[0].0, "fresh");
}

#[rstest]
fn second_installation_is_rejected(provider: DelegatingLoggerProvider) {
    let first = RecordingLoggerProvider::new();
    let second = RecordingLoggerProvider::new();
    let logger = provider.logger("svc");

    provider.set_delegate(Arc::new(first.clone())).unwrap();
    assert_eq!(
        provider.set_delegate(Arc::new(second.clone())),
        Err(GlobalError::DelegateAlreadySet)
    );

    logger.emit(LogRecord::with_message(Severity::Info, "still first"));
    let _later = provider.logger("later");
    assert_eq!(first.bodies(), vec!["still first".to_string()]);
    assert!(second.created().is_empty());
}

#[rstest]
fn placeholder_counts_dropped_records(provider: DelegatingLoggerProvider) {
    let _ = provider.logger("counted");
    let placeholder = provider
        .placeholders()
        .pop()
        .expect("placeholder cached");
    placeholder.emit(LogRecord::new());
    placeholder.emit(LogRecord::new());
    assert_eq!(placeholder.dropped_records(), 2);
    assert!(!placeholder.is_bound());

    provider.set_delegate(Arc::new(NoopLoggerProvider)).unwrap();
    placeholder.emit(LogRecord::new());
    assert!(placeholder.is_bound());
    assert_eq!(placeholder.dropped_records(), 2);
    assert_eq!(placeholder.name(), "counted");
    assert_eq!(placeholder.config().version(), "");
}

#[rstest]
fn concurrent_acquisition_creates_one_placeholder(provider: DelegatingLoggerProvider) {
    const THREADS: usize = 8;
    let provider = Arc::new(provider);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let provider = Arc::clone(&provider);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                provider.logger_with_config("svc-b", &versioned(""))
            })
        })
        .collect();

    let loggers: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("acquiring thread panicked"))
        .collect();
    assert!(loggers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(provider.placeholder_count(), 1);
}

#[rstest]
fn emit_racing_installation_never_panics(provider: DelegatingLoggerProvider) {
    let provider = Arc::new(provider);
    let backend = RecordingLoggerProvider::new();
    let logger = provider.logger("racer");

    let emitter = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..1_000 {
                logger.emit(LogRecord::with_message(Severity::Debug, i.to_string()));
            }
        })
    };
    provider.set_delegate(Arc::new(backend.clone())).unwrap();
    emitter.join().expect("emitter panicked");

    logger.emit(LogRecord::with_message(Severity::Info, "after"));
    let bodies = backend.bodies();
    assert!(bodies.len() <= 1_001);
    assert_eq!(bodies.last().map(String::as_str), Some("after"));
}

#[test]
#[serial]
fn global_logger_forwards_after_install() {
    reset_global_state();
    let early = logger("early");
    early.emit(LogRecord::with_message(Severity::Info, "lost"));

    let backend = RecordingLoggerProvider::new();
    set_logger_provider(backend.clone()).expect("install succeeds");
    early.emit(LogRecord::with_message(Severity::Info, "kept"));
    logger("late").emit(LogRecord::with_message(Severity::Info, "direct"));

    let emitted = backend.emitted();
    let names: Vec<_> = emitted.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["early", "late"]);
    assert_eq!(backend.bodies(), vec!["kept".to_string(), "direct".to_string()]);
    reset_global_state();
}

#[test]
#[serial]
fn global_rejects_self_delegation() {
    reset_global_state();
    assert_eq!(
        set_logger_provider(logger_provider()),
        Err(GlobalError::SelfDelegation)
    );
    let placeholder = Arc::clone(&GLOBAL.read().placeholder);
    assert_eq!(
        set_logger_provider(Arc::clone(&placeholder)),
        Err(GlobalError::SelfDelegation)
    );
    reset_global_state();
}

#[test]
#[serial]
fn global_rejects_wrapped_self_delegation() {
    reset_global_state();
    let placeholder = Arc::clone(&GLOBAL.read().placeholder);
    assert_eq!(
        set_logger_provider(Arc::new(logger_provider())),
        Err(GlobalError::SelfDelegation)
    );
    assert_eq!(
        set_logger_provider(Arc::new(Arc::clone(&placeholder))),
        Err(GlobalError::SelfDelegation)
    );
    assert!(!placeholder.is_delegated());

    let backend = RecordingLoggerProvider::new();
    set_logger_provider(backend.clone()).expect("real provider still installs");
    logger("after").emit(LogRecord::with_message(Severity::Info, "ok"));
    assert_eq!(backend.bodies(), vec!["ok".to_string()]);
    reset_global_state();
}

#[rstest]
fn registry_rejects_itself_as_delegate(provider: DelegatingLoggerProvider) {
    let provider = Arc::new(provider);
    let _early = provider.logger("early");
    assert_eq!(
        provider.set_delegate(Arc::new(Arc::clone(&provider))),
        Err(GlobalError::SelfDelegation)
    );
    assert!(!provider.is_delegated());
    assert_eq!(provider.placeholder_count(), 1);
}

/// Backend that acquires an internal logger from the global API whenever it
/// creates a logger for someone else.
struct CallbackBackend {
    inner: RecordingLoggerProvider,
}

impl LoggerProvider for CallbackBackend {
    fn logger_with_config(&self, name: &str, config: &LoggerConfig) -> Arc<dyn Logger> {
        if !name.starts_with("backend.") {
            logger("backend.internal")
                .emit(LogRecord::with_message(Severity::Debug, format!("created {name}")));
        }
        self.inner.logger_with_config(name, config)
    }
}

#[test]
#[serial]
fn provider_may_call_global_api_while_binding() {
    reset_global_state();
    let early = logger("early");
    let recorder = RecordingLoggerProvider::new();
    let backend = CallbackBackend {
        inner: recorder.clone(),
    };

    let (done, finished) = mpsc::channel();
    let installer = thread::spawn(move || {
        let result = set_logger_provider(backend);
        let _ = done.send(result);
    });
    let result = finished
        .recv_timeout(Duration::from_secs(5))
        .expect("installation finished without blocking");
    installer.join().expect("installer panicked");
    assert_eq!(result, Ok(()));

    early.emit(LogRecord::with_message(Severity::Info, "bound"));
    let names: Vec<String> = recorder.created().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["backend.internal", "early"]);
    assert_eq!(
        recorder.bodies(),
        vec!["created early".to_string(), "bound".to_string()]
    );
    reset_global_state();
}

#[test]
#[serial]
fn global_replacement_keeps_first_binding() {
    reset_global_state();
    let early = logger_with_config("early", &versioned("1"));
    let first = RecordingLoggerProvider::new();
    let second = RecordingLoggerProvider::new();

    set_logger_provider(first.clone()).unwrap();
    set_logger_provider(second.clone()).unwrap();

    early.emit(LogRecord::with_message(Severity::Info, "to first"));
    logger("late").emit(LogRecord::with_message(Severity::Info, "to second"));

    assert_eq!(first.bodies(), vec!["to first".to_string()]);
    assert_eq!(second.bodies(), vec!["to second".to_string()]);
    reset_global_state();
}
