//! Compact 9-character ids.
//!
//! A short id keeps only a second-resolution timestamp, the type identifier
//! and an optional context byte, guarded by a 4-bit check nibble. It drops
//! the client id and sequence, so two short ids issued in the same second
//! with the same suffix collide; it is not meant for high-frequency issuance.
//!
//! The 54-bit layout is written most significant field first, so short ids
//! of equal width sort by creation second:
//!
//! ```text
//!  Bit Index:  53          22 21      14 13      6  5    4    3     0
//!              +--------------+----------+---------+----+----+-------+
//!  Field:      | seconds (32) | type (8) | ctx (8) | c? | 0  | check |
//!              +--------------+----------+---------+----+----+-------+
//! ```

use chrono::{DateTime, Utc};

use crate::{
    Error, Result,
    error::check_range,
    repr::{BITS_PER_CHAR, URLSAFE_ALPHABET, urlsafe_value},
    time::epoch_millis,
};

const TIMESTAMP_SHIFT: u64 = 22;
const TYPE_SHIFT: u64 = 14;
const CONTEXT_SHIFT: u64 = 6;
const HAS_CONTEXT_BIT: u64 = 1 << 5;
const RESERVED_BIT: u64 = 1 << 4;
const CHECK_MASK: u64 = 0xF;
const CHECK_SALT: u64 = 0b1010;

/// A decoded short id.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortId {
    /// Seconds since the custom epoch.
    pub timestamp: u32,
    /// The mandatory type identifier.
    pub type_identifier: u8,
    /// Optional context byte.
    pub context: Option<u8>,
}

impl ShortId {
    /// Number of characters in an encoded short id.
    pub const LEN: usize = 9;

    /// Builds a short id, checking the timestamp fits 32 bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] if `timestamp_secs` exceeds `u32::MAX`.
    pub fn new(timestamp_secs: u64, type_identifier: u8, context: Option<u8>) -> Result<Self> {
        check_range("short id timestamp", timestamp_secs, u64::from(u32::MAX))?;
        Ok(Self {
            timestamp: u32::try_from(timestamp_secs).unwrap_or(u32::MAX),
            type_identifier,
            context,
        })
    }

    /// Encodes into exactly [`ShortId::LEN`] characters.
    pub fn pack(&self) -> String {
        let mut value = (u64::from(self.timestamp) << TIMESTAMP_SHIFT)
            | (u64::from(self.type_identifier) << TYPE_SHIFT)
            | (u64::from(self.context.unwrap_or(0)) << CONTEXT_SHIFT);
        if self.context.is_some() {
            value |= HAS_CONTEXT_BIT;
        }
        value |= check_nibble(value >> 4);

        (0..Self::LEN)
            .rev()
            .map(|i| {
                let digit = (value >> (i * BITS_PER_CHAR)) & 0x3F;
                char::from(URLSAFE_ALPHABET[digit as usize])
            })
            .collect()
    }

    /// Strictly decodes a short id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] on wrong length, characters outside the
    /// alphabet, a set reserved bit, context bits without the context flag,
    /// or a check nibble mismatch.
    pub fn unpack(text: &str) -> Result<Self> {
        if text.len() != Self::LEN {
            return Err(Error::format(
                "short id",
                format!("length {}, expected {}", text.len(), Self::LEN),
            ));
        }
        let mut value = 0_u64;
        for (i, b) in text.bytes().enumerate() {
            value = (value << BITS_PER_CHAR) | u64::from(urlsafe_value(b, i)?);
        }

        if value & CHECK_MASK != check_nibble(value >> 4) {
            return Err(Error::format("short id", "check nibble mismatch"));
        }
        if value & RESERVED_BIT != 0 {
            return Err(Error::format("short id", "reserved bit set"));
        }
        let context = ((value >> CONTEXT_SHIFT) & 0xFF) as u8;
        let context = if value & HAS_CONTEXT_BIT != 0 {
            Some(context)
        } else if context == 0 {
            None
        } else {
            return Err(Error::format("short id", "context bits without context flag"));
        };

        Ok(Self {
            timestamp: (value >> TIMESTAMP_SHIFT) as u32,
            type_identifier: ((value >> TYPE_SHIFT) & 0xFF) as u8,
            context,
        })
    }

    /// Creation time as a UTC instant.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::from(self.timestamp) + i64::try_from(epoch_millis() / 1000).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Sum of the 4-bit groups of the 50-bit payload, salted.
fn check_nibble(payload: u64) -> u64 {
    let mut sum = 0;
    let mut rest = payload;
    while rest != 0 {
        sum += rest & CHECK_MASK;
        rest >>= 4;
    }
    (sum & CHECK_MASK) ^ CHECK_SALT
}

/// The result of classifying an arbitrary string as a short id.
///
/// Fields are only populated when `is_valid` is `true`.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShortComponents {
    /// Whether the input decoded; every other field is `None` when not.
    pub is_valid: bool,
    /// Creation time at second resolution.
    pub timestamp: Option<DateTime<Utc>>,
    pub type_identifier: Option<u8>,
    pub context: Option<u8>,
}

impl From<ShortId> for ShortComponents {
    fn from(id: ShortId) -> Self {
        Self {
            is_valid: true,
            timestamp: id.created_at(),
            type_identifier: Some(id.type_identifier),
            context: id.context,
        }
    }
}

/// Decodes any string into its short-id components; never fails.
///
/// Malformed input yields `is_valid = false` with every other field empty.
pub fn get_short_components(text: &str) -> ShortComponents {
    ShortId::unpack(text).map_or_else(|_| ShortComponents::default(), ShortComponents::from)
}

/// Whether `text` is a well-formed short id.
pub fn validate_short(text: &str) -> bool {
    ShortId::unpack(text).is_ok()
}
