//! Wall-clock sources.
//!
//! Every engine method takes an explicit `now_ms` (milliseconds since the Unix
//! epoch) so behavior is reproducible. The runtime driver reads fresh timestamps
//! from a [`Clock`] on each scheduled callback.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        now_ms()
    }
}

/// Epoch-anchored clock that advances with tokio's (pausable) timer.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    base_epoch_ms: u64,
    base: tokio::time::Instant,
}

impl TokioClock {
    pub fn new(base_epoch_ms: u64) -> Self {
        Self {
            base_epoch_ms,
            base: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        self.base_epoch_ms + self.base.elapsed().as_millis() as u64
    }
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Convert epoch milliseconds into a UTC timestamp, saturating to the epoch.
pub fn to_datetime(ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms as i64).unwrap_or_default()
}
