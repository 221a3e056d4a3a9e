use chrono::{Local, NaiveTime, TimeZone};

use crate::{Error, Result, SnowflakeId, SystemClock, TimeSource};

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: u64 = 1_288_834_974_657;

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: u64 = 1_420_070_400_000;

/// Returns local midnight of the day containing `unix_millis`, in Unix
/// milliseconds.
///
/// When midnight does not exist locally (a DST gap), the current UTC offset is
/// applied to the naive midnight instead. Results before 1970 clamp to `0`.
pub fn start_of_day(unix_millis: u64) -> u64 {
    let millis = i64::try_from(unix_millis).unwrap_or(i64::MAX);
    let Some(now) = Local.timestamp_millis_opt(millis).single() else {
        return 0;
    };

    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    let start = Local
        .from_local_datetime(&midnight)
        .earliest()
        .map_or_else(
            || {
                let offset = i64::from(now.offset().local_minus_utc());
                midnight.and_utc().timestamp_millis() - offset * 1000
            },
            |dt| dt.timestamp_millis(),
        );

    u64::try_from(start).unwrap_or(0)
}

/// Returns local midnight of the current day, in Unix milliseconds.
///
/// This is the epoch a generator falls back to when none is configured.
pub fn start_of_today() -> u64 {
    start_of_day(SystemClock.current_millis())
}

/// Checks that `epoch` can serve as the origin of the 41-bit timestamp field
/// at time `now`.
///
/// # Errors
///
/// - [`Error::EpochInFuture`] if `epoch > now`
/// - [`Error::EpochRangeExceeded`] if `now - epoch` exceeds
///   [`SnowflakeId::TIMESTAMP_MASK`]
pub fn validate_epoch(epoch: u64, now: u64) -> Result<()> {
    let Some(elapsed) = now.checked_sub(epoch) else {
        return Err(Error::EpochInFuture { epoch, now });
    };
    if elapsed > SnowflakeId::TIMESTAMP_MASK {
        return Err(Error::EpochRangeExceeded { epoch, now });
    }
    Ok(())
}
