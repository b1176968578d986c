use crate::CoreId;

/// Represents the result of polling a [`CoreGenerator`] for a new id.
///
/// - [`Poll::Ready`] indicates a new id was successfully generated.
/// - [`Poll::Pending`] means the sequence space of the current millisecond
///   is exhausted and no id can be issued until the clock reaches
///   `yield_until`.
///
/// This allows non-blocking generation loops and custom backoff strategies;
/// [`CoreGenerator::next_id`] is the blocking loop built on top of it.
///
/// [`CoreGenerator`]: crate::CoreGenerator
/// [`CoreGenerator::next_id`]: crate::CoreGenerator::next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique id was generated and is ready to use.
    Ready {
        /// The generated core id.
        id: CoreId,
    },
    /// The sequence is exhausted for the current tick.
    Pending {
        /// The next timestamp (inclusive, ms since the custom epoch) at which
        /// generation may resume.
        yield_until: u64,
    },
}
