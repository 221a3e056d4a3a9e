#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, Result, SequenceResolver};

/// The resolver a generator starts with.
///
/// Counts up within a millisecond and restarts at zero whenever the clock
/// moves forward. It never clamps: once the count passes the 12-bit range the
/// generator treats the millisecond as exhausted and retries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultSequenceResolver {
    last_timestamp: Option<u64>,
    sequence: u64,
}

impl DefaultSequenceResolver {
    pub const fn new() -> Self {
        Self {
            last_timestamp: None,
            sequence: 0,
        }
    }

    /// The latest timestamp this resolver has handed a sequence out for.
    pub const fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// The most recently returned sequence number.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl SequenceResolver for DefaultSequenceResolver {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn next(&mut self, current_millis: u64) -> Result<u64> {
        match self.last_timestamp {
            Some(last) if current_millis < last => {
                #[cfg(feature = "tracing")]
                tracing::warn!(current = current_millis, last, "clock moved backwards");
                Err(Error::ClockRegression {
                    current: current_millis,
                    last,
                })
            }
            Some(last) if current_millis == last => {
                self.sequence = self.sequence.saturating_add(1);
                Ok(self.sequence)
            }
            _ => {
                self.sequence = 0;
                self.last_timestamp = Some(current_millis);
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_starts_at_zero() {
        let mut resolver = DefaultSequenceResolver::new();
        assert_eq!(resolver.last_timestamp(), None);
        assert_eq!(resolver.next(42), Ok(0));
        assert_eq!(resolver.last_timestamp(), Some(42));
    }

    #[test]
    fn same_millisecond_increments() {
        let mut resolver = DefaultSequenceResolver::new();
        assert_eq!(resolver.next(42), Ok(0));
        assert_eq!(resolver.next(42), Ok(1));
        assert_eq!(resolver.next(42), Ok(2));
        assert_eq!(resolver.sequence(), 2);
    }

    #[test]
    fn increments_past_the_sequence_field() {
        let mut resolver = DefaultSequenceResolver::new();
        for expected in 0..=4096 {
            assert_eq!(resolver.next(7), Ok(expected));
        }
    }

    #[test]
    fn newer_millisecond_resets() {
        let mut resolver = DefaultSequenceResolver::new();
        resolver.next(42).unwrap();
        resolver.next(42).unwrap();
        assert_eq!(resolver.next(43), Ok(0));
        assert_eq!(resolver.last_timestamp(), Some(43));
    }

    #[test]
    fn older_millisecond_is_a_regression() {
        let mut resolver = DefaultSequenceResolver::new();
        resolver.next(5_000).unwrap();
        assert_eq!(
            resolver.next(4_999),
            Err(Error::ClockRegression {
                current: 4_999,
                last: 5_000
            })
        );
        // State is untouched by the failed call.
        assert_eq!(resolver.last_timestamp(), Some(5_000));
        assert_eq!(resolver.next(5_000), Ok(1));
    }
}
