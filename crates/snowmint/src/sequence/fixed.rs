use crate::{Result, SequenceResolver};

/// Returns the same sequence number on every call.
///
/// Handy for tests and for scripting an exact ID. Two mints within one
/// millisecond will collide, so this is not a production strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedSequenceResolver(pub u64);

impl SequenceResolver for FixedSequenceResolver {
    fn next(&mut self, _current_millis: u64) -> Result<u64> {
        Ok(self.0)
    }
}
