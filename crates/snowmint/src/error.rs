/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `snowmint` can produce.
///
/// Sequence exhaustion is intentionally absent: it is a transient condition
/// that the generator resolves by waiting for the next millisecond, and it is
/// surfaced as [`Poll::Pending`] rather than as an error.
///
/// [`Poll::Pending`]: crate::Poll::Pending
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A datacenter or worker ID does not fit its 5-bit field.
    #[error("`{field}` must be >= 0 and <= {max}, got {value}")]
    InvalidParameter {
        /// The name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// The largest accepted value.
        max: u64,
    },

    /// The clock handed to a sequence resolver moved backward.
    ///
    /// This is never retried: minting at an earlier timestamp could collide
    /// with identifiers that were already issued.
    #[error("clock moved backwards: current timestamp {current} is earlier than last timestamp {last}")]
    ClockRegression {
        /// The timestamp passed to the resolver.
        current: u64,
        /// The latest timestamp the resolver had seen before.
        last: u64,
    },

    /// The requested epoch is later than the current time.
    #[error("the start time cannot be in the future (epoch {epoch} > now {now})")]
    EpochInFuture {
        /// The rejected epoch, in Unix milliseconds.
        epoch: u64,
        /// The clock reading it was compared against.
        now: u64,
    },

    /// The requested epoch is so old that `now - epoch` no longer fits in the
    /// 41-bit timestamp field.
    #[error("now - epoch exceeds the 41-bit timestamp range, pick a more recent epoch (epoch {epoch}, now {now})")]
    EpochRangeExceeded {
        /// The rejected epoch, in Unix milliseconds.
        epoch: u64,
        /// The clock reading it was compared against.
        now: u64,
    },

    /// At mint time the clock was either before the epoch or more than
    /// 2^41 - 1 milliseconds past it.
    #[error("timestamp {now} cannot be encoded relative to epoch {epoch}")]
    TimestampOutOfRange {
        /// The clock reading used for the mint attempt.
        now: u64,
        /// The configured epoch.
        epoch: u64,
    },

    /// The input is not the decimal form of a valid identifier.
    #[error("invalid snowflake id: {input:?}")]
    ParseId {
        /// The rejected input.
        input: String,
    },

    /// The shared generator's lock was poisoned by a panicking thread.
    ///
    /// `parking_lot` mutexes do not poison, so this variant only exists when
    /// the `parking-lot` feature is disabled.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("the generator lock was poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` for the errors raised by an invalid epoch configuration.
    pub const fn is_epoch_configuration(&self) -> bool {
        matches!(
            self,
            Self::EpochInFuture { .. } | Self::EpochRangeExceeded { .. }
        )
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_names_field_and_range() {
        let err = Error::InvalidParameter {
            field: "datacenter",
            value: 32,
            max: 31,
        };
        assert_eq!(err.to_string(), "`datacenter` must be >= 0 and <= 31, got 32");
    }

    #[test]
    fn epoch_errors_share_a_kind() {
        assert!(Error::EpochInFuture { epoch: 2, now: 1 }.is_epoch_configuration());
        assert!(Error::EpochRangeExceeded { epoch: 0, now: 1 }.is_epoch_configuration());
        assert!(!Error::ClockRegression { current: 1, last: 2 }.is_epoch_configuration());
    }
}
