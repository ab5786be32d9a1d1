//! Fixtures shared by the integration tests.

use std::sync::Arc;

use otlplogs::global::{self, DelegatingLoggerProvider};
use otlplogs::test_utils::RecordingLoggerProvider;
use rstest::fixture;

/// A fresh placeholder provider with no backend installed.
#[fixture]
pub fn placeholder() -> Arc<DelegatingLoggerProvider> {
    Arc::new(DelegatingLoggerProvider::new())
}

/// A recording backend with empty history.
#[fixture]
pub fn recorder() -> RecordingLoggerProvider {
    RecordingLoggerProvider::new()
}

/// Reset the process-wide provider. Tests using this must be `#[serial]`.
#[fixture]
pub fn fresh_global() {
    global::reset_global_state();
}
