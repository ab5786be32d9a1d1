//! Retry policy for transient export failures.
//!
//! [`RetryConfig`] is the user-facing policy; [`ExponentialBackoff`] is the
//! state machine an exporter drives while retrying a single batch.

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(5);
/// Default upper bound for the delay between two retries.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);
/// Default time after the first failure at which retrying stops.
pub const DEFAULT_MAX_ELAPSED_TIME: Duration = Duration::from_secs(60);

const MULTIPLIER: f64 = 1.5;
const RANDOMIZATION_FACTOR: f64 = 0.5;

/// Exponential backoff policy for retrying failed exports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Whether failed exports are retried at all.
    pub enabled: bool,
    /// Delay before the first retry.
    #[serde(rename = "initial_interval_ms", with = "duration_ms")]
    pub initial_interval: Duration,
    /// Upper bound for the delay between retries.
    #[serde(rename = "max_interval_ms", with = "duration_ms")]
    pub max_interval: Duration,
    /// Total time after the first failure after which the export is dropped.
    #[serde(rename = "max_elapsed_time_ms", with = "duration_ms")]
    pub max_elapsed_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_elapsed_time: DEFAULT_MAX_ELAPSED_TIME,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Start a fresh backoff sequence following this policy.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(self.clone())
    }
}

/// Tracks retry attempts for one export and produces jittered delays.
pub struct ExponentialBackoff {
    policy: RetryConfig,
    current: Duration,
    failure_since: Option<Instant>,
    rng: StdRng,
}

impl ExponentialBackoff {
    fn new(policy: RetryConfig) -> Self {
        Self {
            current: policy.initial_interval,
            failure_since: None,
            rng: StdRng::from_entropy(),
            policy,
        }
    }

    /// Delay to wait before the next attempt after a failure at `now`.
    ///
    /// Returns `None` once retrying is disabled or the elapsed time since the
    /// first failure reached `max_elapsed_time`. The delay never extends past
    /// that deadline.
    pub fn next_delay(&mut self, now: Instant) -> Option<Duration> {
        if !self.policy.enabled {
            return None;
        }

        let start = *self.failure_since.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= self.policy.max_elapsed_time {
            return None;
        }

        let delay = self.jittered(self.current);
        self.current = grow(self.current, self.policy.max_interval);
        Some(delay.min(self.policy.max_elapsed_time - elapsed))
    }

    /// Forget previous failures, e.g. after a successful export.
    pub fn reset(&mut self) {
        self.current = self.policy.initial_interval;
        self.failure_since = None;
    }

    fn jittered(&mut self, interval: Duration) -> Duration {
        let spread = interval.mul_f64(RANDOMIZATION_FACTOR);
        let low = interval.saturating_sub(spread);
        let high = interval.saturating_add(spread);
        if low >= high {
            return interval;
        }
        let nanos = |d: Duration| d.as_nanos().min(u128::from(u64::MAX)) as u64;
        Duration::from_nanos(self.rng.gen_range(nanos(low)..=nanos(high)))
    }
}

fn grow(current: Duration, cap: Duration) -> Duration {
    Duration::try_from_secs_f64(current.as_secs_f64() * MULTIPLIER)
        .map_or(cap, |next| next.min(cap))
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
