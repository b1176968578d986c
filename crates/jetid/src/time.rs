use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Error, Result};

/// Custom epoch: Wednesday, January 1, 2020 00:00:00 UTC
///
/// Every timestamp in a [`CoreId`](crate::CoreId) or
/// [`ShortId`](crate::ShortId) is measured from this origin.
pub const JETID_EPOCH: Duration = Duration::from_millis(1_577_836_800_000);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The unit is **milliseconds** relative to [`JETID_EPOCH`].
///
/// # Example
///
/// ```
/// use jetid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since [`JETID_EPOCH`].
    fn current_millis(&self) -> u64;

    /// Like [`Self::current_millis`], but fails when the source cannot
    /// produce a time at or after [`JETID_EPOCH`].
    ///
    /// Generators read time through this method. The default never fails.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::ClockBeforeEpoch`] for a clock set
    /// before the epoch.
    fn try_current_millis(&self) -> Result<u64> {
        Ok(self.current_millis())
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }

    fn try_current_millis(&self) -> Result<u64> {
        (**self).try_current_millis()
    }
}

/// The system wall clock, offset to [`JETID_EPOCH`].
///
/// Unlike a monotonic timer this follows external clock adjustments, which is
/// what lets the generator detect and report a clock that moved backwards.
/// [`TimeSource::try_current_millis`] rejects a clock set before the epoch;
/// the infallible [`TimeSource::current_millis`] saturates it to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WallClock;

impl WallClock {
    /// Milliseconds since the Unix epoch, saturating at zero.
    pub fn unix_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        Self::unix_millis().saturating_sub(epoch_millis())
    }

    fn try_current_millis(&self) -> Result<u64> {
        since_epoch(Self::unix_millis())
    }
}

/// Offsets a Unix timestamp to [`JETID_EPOCH`].
fn since_epoch(unix_millis: u64) -> Result<u64> {
    unix_millis
        .checked_sub(epoch_millis())
        .ok_or(Error::ClockBeforeEpoch { unix_millis })
}

/// [`JETID_EPOCH`] as milliseconds since the Unix epoch.
pub(crate) const fn epoch_millis() -> u64 {
    JETID_EPOCH.as_millis() as u64
}
