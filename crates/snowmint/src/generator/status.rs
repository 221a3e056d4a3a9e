use crate::SnowflakeId;

/// The outcome of a single mint attempt.
///
/// - [`Poll::Ready`] carries a freshly minted ID.
/// - [`Poll::Pending`] means the resolver reported the current millisecond as
///   exhausted; wait `yield_for` milliseconds and try again.
///
/// # Example
///
/// ```
/// use snowmint::{Poll, SnowflakeGenerator};
///
/// let mut generator = SnowflakeGenerator::new(0, 0)?;
/// let id = loop {
///     match generator.poll_id()? {
///         Poll::Ready { id } => break id,
///         Poll::Pending { .. } => std::thread::yield_now(),
///     }
/// };
/// assert!(id.is_valid());
/// # Ok::<(), snowmint::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was minted.
    Ready {
        /// The minted ID.
        id: SnowflakeId,
    },
    /// No ID could be minted because the sequence is exhausted for the
    /// current millisecond.
    Pending {
        /// Milliseconds to wait before retrying.
        yield_for: u64,
    },
}
