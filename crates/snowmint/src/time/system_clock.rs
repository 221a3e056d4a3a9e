use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The operating system's wall clock.
///
/// Reads `SystemTime::now()` on every call. The wall clock may be stepped
/// backward (NTP corrections, manual changes); when that happens the
/// sequence resolver reports [`Error::ClockRegression`]. Use
/// [`MonotonicClock`] to rule that out.
///
/// A clock set before 1970 reads as `0`.
///
/// [`Error::ClockRegression`]: crate::Error::ClockRegression
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
