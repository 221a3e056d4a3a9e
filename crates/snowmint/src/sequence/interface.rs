use crate::Result;

/// Chooses the sequence number for each mint attempt.
///
/// The generator calls [`SequenceResolver::next`] once per attempt with the
/// current Unix millisecond. A returned value above
/// [`SnowflakeId::SEQUENCE_MASK`] means "this millisecond is exhausted": the
/// generator waits for the clock to advance and asks again.
///
/// Implementations own their state; nothing is shared between generators.
/// Plain closures are adapted with [`from_fn`].
///
/// # Example
///
/// ```
/// use snowmint::{Result, SequenceResolver, SnowflakeGenerator};
///
/// /// Always hands out odd sequence numbers.
/// #[derive(Default)]
/// struct Odd {
///     last: Option<u64>,
///     next: u64,
/// }
///
/// impl SequenceResolver for Odd {
///     fn next(&mut self, current_millis: u64) -> Result<u64> {
///         if self.last != Some(current_millis) {
///             self.last = Some(current_millis);
///             self.next = 1;
///         }
///         let sequence = self.next;
///         self.next += 2;
///         Ok(sequence)
///     }
/// }
///
/// let mut generator = SnowflakeGenerator::new(1, 2)?;
/// generator.set_sequence_resolver(Odd::default());
/// assert_eq!(generator.mint()?.sequence() % 2, 1);
/// # Ok::<(), snowmint::Error>(())
/// ```
///
/// [`SnowflakeId::SEQUENCE_MASK`]: crate::SnowflakeId::SEQUENCE_MASK
/// [`from_fn`]: crate::from_fn
pub trait SequenceResolver {
    /// Returns the sequence number to use at `current_millis`.
    ///
    /// # Errors
    ///
    /// Implementations that track time should return
    /// [`Error::ClockRegression`] when `current_millis` is earlier than a
    /// timestamp they have already seen.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    fn next(&mut self, current_millis: u64) -> Result<u64>;
}

impl<R: SequenceResolver + ?Sized> SequenceResolver for &mut R {
    fn next(&mut self, current_millis: u64) -> Result<u64> {
        (**self).next(current_millis)
    }
}

impl<R: SequenceResolver + ?Sized> SequenceResolver for Box<R> {
    fn next(&mut self, current_millis: u64) -> Result<u64> {
        (**self).next(current_millis)
    }
}
