use core::fmt;

use crate::{Result, SequenceResolver};

/// Adapts a closure `FnMut(current_millis) -> sequence` into a
/// [`SequenceResolver`].
///
/// Created by [`from_fn`]. Any state the closure needs lives in its captures.
#[derive(Clone)]
pub struct FnSequenceResolver<F> {
    f: F,
}

/// Wraps a closure as a [`SequenceResolver`].
///
/// # Example
///
/// ```
/// use snowmint::{SnowflakeGenerator, from_fn};
///
/// let mut generator = SnowflakeGenerator::new(1, 1)?;
/// generator.set_sequence_resolver(from_fn(|_| 999));
///
/// let parts = generator.mint()?.parts();
/// assert_eq!((parts.datacenter, parts.worker, parts.sequence), (1, 1, 999));
/// # Ok::<(), snowmint::Error>(())
/// ```
pub const fn from_fn<F>(f: F) -> FnSequenceResolver<F>
where
    F: FnMut(u64) -> u64,
{
    FnSequenceResolver { f }
}

impl<F> SequenceResolver for FnSequenceResolver<F>
where
    F: FnMut(u64) -> u64,
{
    fn next(&mut self, current_millis: u64) -> Result<u64> {
        Ok((self.f)(current_millis))
    }
}

impl<F> fmt::Debug for FnSequenceResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSequenceResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_sees_each_timestamp() {
        let mut seen = Vec::new();
        {
            let mut resolver = from_fn(|ts| {
                seen.push(ts);
                ts * 2
            });
            assert_eq!(resolver.next(3), Ok(6));
            assert_eq!(resolver.next(4), Ok(8));
        }
        assert_eq!(seen, [3, 4]);
    }

    #[test]
    fn captured_state_persists_between_calls() {
        let mut last = None;
        let mut sequence = 0;
        let mut resolver = from_fn(move |ts| {
            if last == Some(ts) {
                sequence += 1;
            } else {
                sequence = 0;
            }
            last = Some(ts);
            sequence
        });
        assert_eq!(resolver.next(1), Ok(0));
        assert_eq!(resolver.next(1), Ok(1));
        assert_eq!(resolver.next(2), Ok(0));
    }
}
