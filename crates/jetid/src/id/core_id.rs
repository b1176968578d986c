use chrono::{DateTime, Utc};
use core::fmt;

use crate::time::epoch_millis;

/// The 64-bit time-ordered core of every id.
///
/// - 42 bits timestamp (ms since [`JETID_EPOCH`])
/// - 10 bits client ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21             12 11             0
///              +----------------+-----------------+---------------+
///  Field:      | timestamp (42) | client ID (10)  | sequence (12) |
///              +----------------+-----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB ----->|
/// ```
///
/// The split is fixed: sortability of every encoding depends on the
/// timestamp occupying the most significant bits, and encoder and decoder
/// must agree on it bit-for-bit.
///
/// [`JETID_EPOCH`]: crate::JETID_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreId {
    id: u64,
}

impl CoreId {
    /// Size of the packed core in bytes.
    pub const BYTES: usize = 8;

    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 10-bit client ID field. Occupies bits 12
    /// through 21.
    pub const CLIENT_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position.
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the client ID to its correct position.
    pub const CLIENT_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field.
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields, silently masking each to its width.
    pub const fn from(timestamp: u64, client_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let client_id = (client_id & Self::CLIENT_ID_MASK) << Self::CLIENT_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | client_id | sequence,
        }
    }

    /// Packs the three fields. Out-of-range values are a logic error and
    /// panic in debug builds.
    pub fn from_components(timestamp: u64, client_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(client_id <= Self::CLIENT_ID_MASK, "client_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, client_id, sequence)
    }

    /// Extracts the timestamp (ms since the custom epoch).
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the client ID.
    pub const fn client_id(&self) -> u64 {
        (self.id >> Self::CLIENT_ID_SHIFT) & Self::CLIENT_ID_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum possible value for the timestamp field.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum possible value for the client id field.
    pub const fn max_client_id() -> u64 {
        Self::CLIENT_ID_MASK
    }

    /// Returns the maximum possible value for the sequence field.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this type into its raw type representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw type into this type.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Big-endian byte layout shared by every textual encoding.
    pub const fn to_be_bytes(&self) -> [u8; Self::BYTES] {
        self.id.to_be_bytes()
    }

    /// Inverse of [`Self::to_be_bytes`].
    pub const fn from_be_bytes(bytes: [u8; Self::BYTES]) -> Self {
        Self {
            id: u64::from_be_bytes(bytes),
        }
    }

    /// Creation time as milliseconds since the Unix epoch.
    pub const fn unix_millis(&self) -> u64 {
        self.timestamp() + epoch_millis()
    }

    /// Creation time as a UTC instant.
    ///
    /// Every 42-bit timestamp maps onto a representable instant, so this only
    /// returns `None` if the calendar library cannot represent the date.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.unix_millis())
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreId")
            .field("id", &format_args!("{:#018x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("client_id", &self.client_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
