use core::{any::Any, cell::OnceCell, fmt, time::Duration};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    DefaultSequenceResolver, Error, ParsedId, Poll, Result, SequenceResolver, SnowflakeId,
    SystemClock, TimeSource, start_of_day, validate_epoch,
};

/// A Snowflake ID generator for a single datacenter/worker pair.
///
/// The generator reads the clock, asks its [`SequenceResolver`] for a
/// sequence number and packs the result into a [`SnowflakeId`]. Minting takes
/// `&mut self`: resolver state is not synchronized, so share a generator
/// between threads through [`LockSnowflakeGenerator`].
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Swappable sequence resolver
/// - ✅ Configurable epoch (defaults to local midnight)
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct SnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    datacenter: u64,
    worker: u64,
    epoch: OnceCell<u64>,
    resolver: Box<dyn InstalledResolver>,
    time: T,
}

/// Object-safe view of an installed resolver that keeps its concrete type
/// reachable.
trait InstalledResolver: SequenceResolver + Send {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<R> InstalledResolver for R
where
    R: SequenceResolver + Send + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl SnowflakeGenerator<SystemClock> {
    /// Creates a generator backed by the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `datacenter` or `worker` is
    /// greater than 31.
    ///
    /// # Example
    /// ```
    /// use snowmint::SnowflakeGenerator;
    ///
    /// let mut generator = SnowflakeGenerator::new(1, 1)?;
    /// let id = generator.mint()?;
    ///
    /// assert_eq!(id.datacenter(), 1);
    /// assert_eq!(id.worker(), 1);
    /// assert!(id.to_string().len() <= 19);
    ///
    /// assert!(SnowflakeGenerator::new(32, 0).is_err());
    /// # Ok::<(), snowmint::Error>(())
    /// ```
    pub fn new(datacenter: u64, worker: u64) -> Result<Self> {
        Self::with_time(datacenter, worker, SystemClock)
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator that reads time from `time`.
    ///
    /// The generator starts with a [`DefaultSequenceResolver`] and no explicit
    /// epoch; see [`Self::epoch`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `datacenter` or `worker` is
    /// greater than 31.
    pub fn with_time(datacenter: u64, worker: u64, time: T) -> Result<Self> {
        check_field("datacenter", datacenter, SnowflakeId::DATACENTER_MASK)?;
        check_field("worker", worker, SnowflakeId::WORKER_MASK)?;
        Ok(Self {
            datacenter,
            worker,
            epoch: OnceCell::new(),
            resolver: Box::new(DefaultSequenceResolver::new()),
            time,
        })
    }

    pub const fn datacenter(&self) -> u64 {
        self.datacenter
    }

    pub const fn worker(&self) -> u64 {
        self.worker
    }

    pub const fn time(&self) -> &T {
        &self.time
    }

    /// Returns the epoch in Unix milliseconds.
    ///
    /// If no epoch was set, local midnight of the current day (according to
    /// this generator's clock) is computed on first use and kept from then on,
    /// so IDs minted after midnight still share one origin. When the first use
    /// is a mint, the day is taken from that mint's clock reading.
    pub fn epoch(&self) -> u64 {
        *self
            .epoch
            .get_or_init(|| start_of_day(self.time.current_millis()))
    }

    /// Sets the epoch, in Unix milliseconds.
    ///
    /// # Errors
    ///
    /// - [`Error::EpochInFuture`] if `epoch` is later than the current time
    /// - [`Error::EpochRangeExceeded`] if the time elapsed since `epoch` does
    ///   not fit in the 41-bit timestamp field
    ///
    /// The configured epoch is left unchanged on error.
    ///
    /// # Example
    /// ```
    /// use snowmint::{SnowflakeGenerator, TWITTER_EPOCH};
    ///
    /// let mut generator = SnowflakeGenerator::new(0, 0)?;
    /// generator.set_epoch(TWITTER_EPOCH)?;
    /// assert_eq!(generator.epoch(), TWITTER_EPOCH);
    ///
    /// assert!(generator.set_epoch(u64::MAX).is_err());
    /// assert_eq!(generator.epoch(), TWITTER_EPOCH);
    /// # Ok::<(), snowmint::Error>(())
    /// ```
    pub fn set_epoch(&mut self, epoch: u64) -> Result<&mut Self> {
        validate_epoch(epoch, self.time.current_millis())?;
        #[cfg(feature = "tracing")]
        tracing::debug!(epoch, "epoch configured");
        self.epoch = OnceCell::from(epoch);
        Ok(self)
    }

    /// Installs a new sequence resolver, dropping the previous one.
    ///
    /// Takes effect from the next mint attempt.
    pub fn set_sequence_resolver<R>(&mut self, resolver: R) -> &mut Self
    where
        R: SequenceResolver + Send + 'static,
    {
        self.resolver = Box::new(resolver);
        self
    }

    /// Returns the installed sequence resolver if it is an `R`.
    ///
    /// `R` must be the exact type passed to [`Self::set_sequence_resolver`]
    /// (a `Box<R>` is stored as `Box<R>`, not `R`).
    ///
    /// # Example
    /// ```
    /// use snowmint::{DefaultSequenceResolver, FixedSequenceResolver, SnowflakeGenerator};
    ///
    /// let mut generator = SnowflakeGenerator::new(0, 0)?;
    /// assert!(generator.sequence_resolver::<DefaultSequenceResolver>().is_some());
    ///
    /// generator.set_sequence_resolver(FixedSequenceResolver(7));
    /// assert_eq!(
    ///     generator.sequence_resolver::<FixedSequenceResolver>(),
    ///     Some(&FixedSequenceResolver(7))
    /// );
    /// assert!(generator.sequence_resolver::<DefaultSequenceResolver>().is_none());
    /// # Ok::<(), snowmint::Error>(())
    /// ```
    pub fn sequence_resolver<R>(&self) -> Option<&R>
    where
        R: SequenceResolver + 'static,
    {
        (*self.resolver).as_any().downcast_ref()
    }

    /// Mutable counterpart of [`Self::sequence_resolver`], e.g. to drive or
    /// reconfigure the installed resolver in place.
    pub fn sequence_resolver_mut<R>(&mut self) -> Option<&mut R>
    where
        R: SequenceResolver + 'static,
    {
        (*self.resolver).as_any_mut().downcast_mut()
    }

    /// Mints a new ID, sleeping through exhausted milliseconds.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the resolver saw the clock go backward
    /// - [`Error::TimestampOutOfRange`] if the clock is before the epoch or
    ///   more than 2^41 - 1 ms past it
    ///
    /// # Example
    /// ```
    /// use snowmint::SnowflakeGenerator;
    ///
    /// let mut generator = SnowflakeGenerator::new(3, 4)?;
    /// let a = generator.mint()?;
    /// let b = generator.mint()?;
    /// assert!(a < b);
    /// # Ok::<(), snowmint::Error>(())
    /// ```
    pub fn mint(&mut self) -> Result<SnowflakeId> {
        self.mint_with(|ms| std::thread::sleep(Duration::from_millis(ms)))
    }

    /// Mints a new ID, calling `f` with the suggested wait (in milliseconds)
    /// whenever the current millisecond is exhausted.
    ///
    /// `f` decides how to wait: sleep, yield or spin.
    ///
    /// # Errors
    ///
    /// Same as [`Self::mint`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, f)))]
    pub fn mint_with(&mut self, mut f: impl FnMut(u64)) -> Result<SnowflakeId> {
        loop {
            match self.poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(yield_for, "sequence exhausted");
                    f(yield_for);
                }
            }
        }
    }

    /// Makes a single mint attempt.
    ///
    /// Returns [`Poll::Pending`] instead of waiting when the resolver hands
    /// out a sequence above [`SnowflakeId::SEQUENCE_MASK`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::mint`].
    pub fn poll_id(&mut self) -> Result<Poll> {
        let now = self.time.current_millis();
        let sequence = self.resolver.next(now)?;
        if sequence > SnowflakeId::SEQUENCE_MASK {
            return Ok(Poll::Pending { yield_for: 1 });
        }

        let epoch = *self.epoch.get_or_init(|| start_of_day(now));
        let elapsed = now
            .checked_sub(epoch)
            .filter(|elapsed| *elapsed <= SnowflakeId::TIMESTAMP_MASK)
            .ok_or(Error::TimestampOutOfRange { now, epoch })?;

        Ok(Poll::Ready {
            id: SnowflakeId::from_components(elapsed, self.datacenter, self.worker, sequence),
        })
    }

    /// Decomposes `id` into its four fields.
    ///
    /// With `transform` set the fields are decoded to integers, otherwise they
    /// are returned as binary strings of their field width. The timestamp
    /// stays relative; add [`Self::epoch`] to get Unix milliseconds.
    pub fn parse(&self, id: SnowflakeId, transform: bool) -> ParsedId {
        ParsedId::new(id, transform)
    }
}

impl<T> fmt::Debug for SnowflakeGenerator<T>
where
    T: TimeSource + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("datacenter", &self.datacenter)
            .field("worker", &self.worker)
            .field("epoch", &self.epoch.get())
            .field("time", &self.time)
            .finish_non_exhaustive()
    }
}

fn check_field(field: &'static str, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(Error::InvalidParameter { field, value, max });
    }
    Ok(())
}
