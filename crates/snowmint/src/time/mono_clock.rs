use core::time::Duration;
use portable_atomic::{AtomicU64, Ordering};
use std::{
    sync::Arc,
    thread,
    time::Instant,
};

use crate::{SystemClock, TimeSource};

/// Counter shared between the clock handles and the ticker thread.
#[derive(Debug)]
struct Ticker {
    elapsed: AtomicU64,
}

/// A wall-clock time source that never goes backward.
///
/// At construction the clock samples the system time once and from then on
/// advances using a monotonic timer (`Instant`). Readings are still Unix
/// milliseconds, so they can be packed against any epoch, but an NTP step or
/// a manual clock change after construction is ignored instead of surfacing
/// as a clock regression.
///
/// A background thread stores the elapsed milliseconds into a shared atomic
/// once per millisecond, which keeps syscalls off the minting hot path. The
/// thread exits once every clone of the clock has been dropped.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    ticker: Arc<Ticker>,
    anchor: u64, // unix millis at construction
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a new ticker anchored at the current system time.
    ///
    /// # Example
    ///
    /// ```
    /// use snowmint::{MonotonicClock, SystemClock, TimeSource};
    ///
    /// let clock = MonotonicClock::new();
    /// let first = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(5));
    ///
    /// // The ticker may trail the sleep by a millisecond, but never goes
    /// // backward.
    /// assert!(clock.current_millis() >= first);
    /// assert!(first <= SystemClock.current_millis());
    /// ```
    pub fn new() -> Self {
        let start = Instant::now();
        let anchor = SystemClock.current_millis();

        let ticker = Arc::new(Ticker {
            elapsed: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&ticker);
        thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(ticker) = weak.upgrade() else {
                    break;
                };

                // Sleep until the next millisecond boundary
                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                // Re-measure after waking; sleep may have overshot
                let elapsed = start.elapsed().as_millis() as u64;
                ticker.elapsed.fetch_max(elapsed, Ordering::Relaxed);

                tick = elapsed + 1;
            }
        });

        Self { ticker, anchor }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.anchor + self.ticker.elapsed.load(Ordering::Relaxed)
    }
}
