//! Bridges that route records from other logging facades into loggers
//! acquired from the global provider.
//!
//! Records whose target belongs to this crate are never forwarded, so the
//! crate's own diagnostics cannot loop back into the provider that produced
//! them.

#[cfg(feature = "log-compat")]
mod log_bridge;
#[cfg(feature = "tracing-compat")]
mod tracing_bridge;

use std::borrow::Cow;

#[cfg(feature = "log-compat")]
pub use log_bridge::{LogBridge, install_log_bridge};
#[cfg(feature = "tracing-compat")]
pub use tracing_bridge::TracingBridge;

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Map a Rust module path such as `app::db` to the logger name `app.db`.
fn logger_name(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}
