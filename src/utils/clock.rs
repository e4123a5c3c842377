// src/utils/clock.rs

use crate::core::types::Timestamp;

/// Time source for lifecycle evaluation.
///
/// The state machine never schedules callbacks; every window (voting
/// delay, voting period, queue deadline) is evaluated by reading the
/// current time through this trait.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Timestamp;
}

/// Wall-clock time in milliseconds since UNIX epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        chrono::Utc::now().timestamp_millis() as u64
    }
}
