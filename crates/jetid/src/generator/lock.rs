use std::sync::Arc;
use core::cmp::Ordering;
use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument, trace};

use crate::{CoreId, Error, Poll, Result, TimeSource, WallClock, error::check_range};

/// The mutable clock and sequence state of one logical node.
///
/// Starts empty, is mutated only by [`CoreGenerator`] and is never
/// persisted. `last_timestamp` never decreases once set; `sequence` resets
/// to zero whenever the observed timestamp moves past `last_timestamp`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorState {
    /// Timestamp of the most recently issued id (ms since the custom epoch),
    /// or `None` before the first id.
    pub last_timestamp: Option<u64>,
    /// Sequence of the most recently issued id within `last_timestamp`.
    pub sequence: u64,
}

/// A lock-based core id generator suitable for multi-threaded environments.
///
/// The [`GeneratorState`] lives behind an [`Arc<Mutex<_>>`]; the
/// read-compare-update of timestamp and sequence is the only critical
/// section in the crate. Clones share the same state and therefore act as
/// one node.
///
/// The client id is supplied per call and is not part of the shared state:
/// ids from different client ids on the same node still draw from one
/// sequence.
///
/// ## Clock policy
///
/// - Clock ahead of the state: the sequence resets to zero.
/// - Same millisecond: the sequence increments, or the generator reports
///   [`Poll::Pending`] once it is exhausted.
/// - Clock behind the state: [`Error::ClockRegression`] is returned at once;
///   the generator never blocks waiting for a regressed clock to catch up.
pub struct CoreGenerator<T = WallClock>
where
    T: TimeSource,
{
    pub(crate) state: Arc<Mutex<GeneratorState>>,
    pub(crate) time: T,
}

impl<T> CoreGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new generator that has issued no ids yet.
    ///
    /// # Example
    /// ```
    /// use jetid::{CoreGenerator, WallClock};
    ///
    /// let generator = CoreGenerator::new(WallClock);
    /// let id = generator.next_id(7).unwrap();
    /// assert_eq!(id.client_id(), 7);
    /// ```
    pub fn new(time: T) -> Self {
        Self::from_state(GeneratorState::default(), time)
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// Mainly useful in tests; in typical use prefer [`Self::new`].
    pub fn from_state(state: GeneratorState, time: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            time,
        }
    }

    /// The time source this generator reads.
    pub const fn time(&self) -> &T {
        &self.time
    }

    /// A snapshot of the shared state.
    pub fn state(&self) -> GeneratorState {
        *self.state.lock()
    }

    /// Attempts to generate the next id without waiting.
    ///
    /// # Errors
    ///
    /// - [`Error::Range`] if `client_id` does not fit in 10 bits, or the
    ///   clock is past the 42-bit timestamp range
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued timestamp
    /// - [`Error::ClockBeforeEpoch`] if the time source reads before the
    ///   custom epoch
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self, client_id: u64) -> Result<Poll> {
        check_range("client id", client_id, CoreId::max_client_id())?;

        // Read the clock under the lock: readings must be ordered like the
        // state updates they drive.
        let mut state = self.state.lock();
        let now = self.time.try_current_millis()?;
        check_range("timestamp", now, CoreId::max_timestamp())?;

        match state.last_timestamp.map(|last| (now.cmp(&last), last)) {
            Some((Ordering::Equal, _)) => {
                if state.sequence < CoreId::max_sequence() {
                    state.sequence += 1;
                    Ok(Poll::Ready {
                        id: CoreId::from_components(now, client_id, state.sequence),
                    })
                } else {
                    #[cfg(feature = "tracing")]
                    trace!(now, "sequence exhausted");
                    Ok(Poll::Pending { yield_until: now + 1 })
                }
            }
            None | Some((Ordering::Greater, _)) => {
                state.last_timestamp = Some(now);
                state.sequence = 0;
                Ok(Poll::Ready {
                    id: CoreId::from_components(now, client_id, 0),
                })
            }
            Some((Ordering::Less, last)) => Err(Self::cold_clock_behind(now, last)),
        }
    }

    /// Generates the next id, waiting out sequence exhaustion.
    ///
    /// The wait is bounded by clock resolution: the lock is released and the
    /// thread yields until the clock ticks into the next millisecond.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_poll_id`]. A clock regression aborts the call
    /// immediately, including one observed while waiting.
    pub fn next_id(&self, client_id: u64) -> Result<CoreId> {
        loop {
            match self.try_poll_id(client_id)? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { .. } => std::thread::yield_now(),
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        debug!(now, last, "clock moved backwards");
        Error::ClockRegression { now, last }
    }
}

impl<T> Clone for CoreGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            time: self.time.clone(),
        }
    }
}

impl<T> core::fmt::Debug for CoreGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CoreGenerator")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
