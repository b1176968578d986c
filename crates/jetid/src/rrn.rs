use chrono::{DateTime, Datelike, Timelike, Utc};
use core::{fmt, str::FromStr};
use rand::Rng;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, Result, error::check_range};

/// A Retrieval Reference Number: `DDDhhmmssNNN`.
///
/// Day of year (001-366), UTC hour, minute and second, then a 3-digit
/// Systems Trace Audit Number (STAN). It is derived from the wall clock
/// alone and is unique only down to one second per STAN value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rrn {
    /// Ordinal day in UTC, `1..=366`.
    pub day_of_year: u16,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// System trace audit number, `0..=999`.
    pub stan: u16,
}

impl Rrn {
    /// Number of digits in a rendered RRN.
    pub const LEN: usize = 12;
    /// Largest STAN value.
    pub const MAX_STAN: u64 = 999;

    /// Builds the RRN for instant `now` with the given STAN.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] if `stan` exceeds [`Rrn::MAX_STAN`].
    pub fn at(now: DateTime<Utc>, stan: u64) -> Result<Self> {
        check_range("STAN", stan, Self::MAX_STAN)?;
        Ok(Self {
            day_of_year: u16::try_from(now.ordinal()).unwrap_or(366),
            hour: u8::try_from(now.hour()).unwrap_or(0),
            minute: u8::try_from(now.minute()).unwrap_or(0),
            second: u8::try_from(now.second()).unwrap_or(0),
            stan: u16::try_from(stan).unwrap_or(0),
        })
    }
}

impl fmt::Display for Rrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}{:02}{:02}{:02}{:03}",
            self.day_of_year, self.hour, self.minute, self.second, self.stan
        )
    }
}

impl FromStr for Rrn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != Self::LEN || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::format("RRN", format!("{s:?} is not 12 digits")));
        }
        let field = |range: core::ops::Range<usize>| -> u64 {
            s[range]
                .bytes()
                .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
        };
        let day_of_year = field(0..3);
        if day_of_year == 0 {
            return Err(Error::format("RRN", "day of year 000"));
        }
        check_range("day of year", day_of_year, 366)?;
        check_range("hour", field(3..5), 23)?;
        check_range("minute", field(5..7), 59)?;
        check_range("second", field(7..9), 59)?;
        // Every field was range checked above.
        Ok(Self {
            day_of_year: day_of_year as u16,
            hour: field(3..5) as u8,
            minute: field(5..7) as u8,
            second: field(7..9) as u8,
            stan: field(9..12) as u16,
        })
    }
}

/// Generates an RRN for the current UTC time.
///
/// Uses `stan` when given, otherwise a random value in `000..=999`.
///
/// # Errors
///
/// Returns [`Error::Range`] if `stan` exceeds 999.
#[cfg_attr(feature = "tracing", instrument(level = "debug", ret, err))]
pub fn generate_rrn(stan: Option<u64>) -> Result<String> {
    let stan = match stan {
        Some(stan) => stan,
        None => rand::rng().random_range(0..=Rrn::MAX_STAN),
    };
    Rrn::at(Utc::now(), stan).map(|rrn| rrn.to_string())
}
