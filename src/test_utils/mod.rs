//! Helpers shared by unit and integration tests.
//!
//! Compiled for unit tests and behind the `test-util` feature so the
//! integration tests under `tests/` can reuse the same fake backend.

mod recording_provider;

pub use recording_provider::{CreatedLogger, RecordingLogger, RecordingLoggerProvider};
