use crate::{Error, Result};

/// Eight `'0'`/`'1'` characters per byte, most significant bit first.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:08b}")).collect()
}

/// The width must be a non-zero multiple of eight.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    if text.is_empty() || text.len() % 8 != 0 {
        return Err(Error::format(
            "BINARY id",
            format!("length {} is not a positive multiple of 8", text.len()),
        ));
    }
    if let Some(index) = text.bytes().position(|c| c != b'0' && c != b'1') {
        return Err(Error::format(
            "BINARY id",
            format!("invalid character at index {index}"),
        ));
    }
    Ok(text
        .as_bytes()
        .chunks_exact(8)
        .map(|bits| bits.iter().fold(0_u8, |acc, &bit| (acc << 1) | (bit - b'0')))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_msb_first() {
        assert_eq!(encode(&[0x80, 0x05]), "1000000000000101");
    }

    #[test]
    fn decode_inverts_encode() {
        assert_eq!(decode("1000000000000101"), Ok(vec![0x80, 0x05]));
    }

    #[test]
    fn decode_rejects_bad_width_and_chars() {
        assert!(decode("").is_err());
        assert!(decode("0101").is_err());
        assert!(decode("01010102").is_err());
    }
}
