use hex::FromHexError;

use crate::{Error, Result};

/// Lowercase hex, two characters per byte.
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Accepts either case; the width must be even and non-zero.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    if text.is_empty() {
        return Err(Error::format("HEX id", "empty input"));
    }
    hex::decode(text).map_err(|e| match e {
        FromHexError::OddLength => Error::format(
            "HEX id",
            format!("length {} is not a positive even number", text.len()),
        ),
        FromHexError::InvalidHexCharacter { c, index } => Error::format(
            "HEX id",
            format!("invalid character {c:?} at index {index}"),
        ),
        other => Error::format("HEX id", other.to_string()),
    })
}
