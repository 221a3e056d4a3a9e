use core::{fmt, time::Duration};
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    ParsedId, Poll, Result, SequenceResolver, SnowflakeGenerator, SnowflakeId, SystemClock,
    TimeSource,
    generator::{Mutex, MutexGuard},
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// This wraps a [`SnowflakeGenerator`] in an [`Arc<Mutex<_>>`]; each mint
/// attempt (clock read, resolver call and bit-pack) runs under the lock, so
/// concurrent callers never observe the same resolver state. Clones share the
/// same generator.
///
/// The lock is released while waiting out an exhausted millisecond.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Cheap to clone
///
/// ## See Also
/// - [`SnowflakeGenerator`]
pub struct LockSnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    pub(crate) state: Arc<Mutex<SnowflakeGenerator<T>>>,
}

impl LockSnowflakeGenerator<SystemClock> {
    /// Creates a shared generator backed by the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `datacenter` or `worker` is
    /// greater than 31.
    ///
    /// # Example
    /// ```
    /// use snowmint::LockSnowflakeGenerator;
    ///
    /// let generator = LockSnowflakeGenerator::new(2, 9)?;
    /// let handles: Vec<_> = (0..4)
    ///     .map(|_| {
    ///         let generator = generator.clone();
    ///         std::thread::spawn(move || generator.mint())
    ///     })
    ///     .collect();
    ///
    /// for handle in handles {
    ///     let id = handle.join().unwrap()?;
    ///     assert_eq!(id.worker(), 9);
    /// }
    /// # Ok::<(), snowmint::Error>(())
    /// ```
    ///
    /// [`Error::InvalidParameter`]: crate::Error::InvalidParameter
    pub fn new(datacenter: u64, worker: u64) -> Result<Self> {
        SnowflakeGenerator::new(datacenter, worker).map(Self::from_generator)
    }
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a shared generator that reads time from `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `datacenter` or `worker` is
    /// greater than 31.
    ///
    /// [`Error::InvalidParameter`]: crate::Error::InvalidParameter
    pub fn with_time(datacenter: u64, worker: u64, time: T) -> Result<Self> {
        SnowflakeGenerator::with_time(datacenter, worker, time).map(Self::from_generator)
    }

    /// Moves an already configured generator behind a lock.
    pub fn from_generator(generator: SnowflakeGenerator<T>) -> Self {
        Self {
            state: Arc::new(Mutex::new(generator)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SnowflakeGenerator<T>>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    /// Mints a new ID, sleeping through exhausted milliseconds.
    ///
    /// # Errors
    ///
    /// Everything [`SnowflakeGenerator::mint`] returns, plus
    /// [`Error::LockPoisoned`] when built without `parking-lot`.
    ///
    /// [`Error::LockPoisoned`]: crate::Error
    pub fn mint(&self) -> Result<SnowflakeId> {
        self.mint_with(|ms| std::thread::sleep(Duration::from_millis(ms)))
    }

    /// Mints a new ID, calling `f` (outside the lock) with the suggested wait
    /// whenever the current millisecond is exhausted.
    ///
    /// # Errors
    ///
    /// Same as [`Self::mint`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, f)))]
    pub fn mint_with(&self, mut f: impl FnMut(u64)) -> Result<SnowflakeId> {
        loop {
            match self.poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => f(yield_for),
            }
        }
    }

    /// Makes a single mint attempt under the lock.
    ///
    /// # Errors
    ///
    /// Same as [`Self::mint`].
    pub fn poll_id(&self) -> Result<Poll> {
        self.lock()?.poll_id()
    }

    /// See [`SnowflakeGenerator::parse`].
    pub fn parse(&self, id: SnowflakeId, transform: bool) -> ParsedId {
        ParsedId::new(id, transform)
    }

    /// See [`SnowflakeGenerator::epoch`].
    ///
    /// # Errors
    ///
    /// May return an error if the lock is poisoned.
    pub fn epoch(&self) -> Result<u64> {
        Ok(self.lock()?.epoch())
    }

    /// See [`SnowflakeGenerator::set_epoch`].
    ///
    /// # Errors
    ///
    /// The epoch validation errors, or a poisoned lock.
    pub fn set_epoch(&self, epoch: u64) -> Result<()> {
        self.lock()?.set_epoch(epoch)?;
        Ok(())
    }

    /// See [`SnowflakeGenerator::set_sequence_resolver`].
    ///
    /// # Errors
    ///
    /// May return an error if the lock is poisoned.
    pub fn set_sequence_resolver<R>(&self, resolver: R) -> Result<()>
    where
        R: SequenceResolver + Send + 'static,
    {
        self.lock()?.set_sequence_resolver(resolver);
        Ok(())
    }

    /// Runs `f` with exclusive access to the wrapped generator.
    ///
    /// # Errors
    ///
    /// May return an error if the lock is poisoned.
    pub fn with_generator<R>(&self, f: impl FnOnce(&mut SnowflakeGenerator<T>) -> R) -> Result<R> {
        let mut generator = self.lock()?;
        Ok(f(&mut *generator))
    }
}

impl<T> Clone for LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for LockSnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockSnowflakeGenerator").finish_non_exhaustive()
    }
}
