//! Monotonic time source.
//!
//! Engine operations take `now: Instant` explicitly (see `transport::bbr` and
//! `transport::connection`) rather than reading the clock themselves, so unit
//! tests can drive deterministic time without mocking. `Clock` is the thin
//! wrapper binaries use to produce that `now` from the real monotonic clock.

pub use quanta::Instant;

/// Real monotonic clock, used by the demo binaries and the process-wide
/// connection registry's tick driver.
#[derive(Debug, Clone, Default)]
pub struct Clock;

impl Clock {
    pub fn new() -> Self {
        Clock
    }

    pub fn now(&self) -> Instant {
        Instant::now()
    }
}
