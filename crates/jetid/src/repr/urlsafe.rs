use crate::{Error, Result};

/// URL-safe alphabet in strictly ascending ASCII order, so lexical order of
/// fixed-width encodings matches numeric order of the decoded value.
pub(crate) const ALPHABET: &[u8; 64] =
    b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
const NO_VALUE: u8 = 255;
pub(crate) const BITS_PER_CHAR: usize = 6;
const MASK: u16 = 0x3F;

/// Lookup table for decoding.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 64 {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Number of characters used for `len` bytes: `ceil(8 * len / 6)`.
pub const fn encoded_width(len: usize) -> usize {
    (len * 8).div_ceil(BITS_PER_CHAR)
}

/// Encodes `bytes` as a big-endian number left-padded with zero bits to a
/// whole number of characters.
pub fn encode(bytes: &[u8]) -> String {
    let width = encoded_width(bytes.len());
    let mut out = String::with_capacity(width);
    // Padding bits are implicit zeros already sitting in the accumulator.
    let mut bits = width * BITS_PER_CHAR - bytes.len() * 8;
    let mut acc = 0_u16;
    for &b in bytes {
        acc = (acc << 8) | u16::from(b);
        bits += 8;
        while bits >= BITS_PER_CHAR {
            bits -= BITS_PER_CHAR;
            out.push(char::from(ALPHABET[usize::from((acc >> bits) & MASK)]));
        }
    }
    out
}

/// Decodes a canonical-width string back into bytes.
///
/// Rejects widths no byte length encodes to and non-zero padding bits, so
/// every accepted string has exactly one preimage.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let width = text.len();
    let len = width * BITS_PER_CHAR / 8;
    if len == 0 || encoded_width(len) != width {
        return Err(Error::format(
            "URLSAFE id",
            format!("length {width} is not a canonical width"),
        ));
    }
    let pad = width * BITS_PER_CHAR - len * 8;

    let mut out = Vec::with_capacity(len);
    let mut bits = 0;
    let mut acc = 0_u16;
    for (i, b) in text.bytes().enumerate() {
        let val = value_of(b, i)?;
        if i == 0 && pad > 0 && val >> (BITS_PER_CHAR - pad) != 0 {
            return Err(Error::format(
                "URLSAFE id",
                format!("leading character {:?} overflows {len} bytes", char::from(b)),
            ));
        }
        acc = (acc << BITS_PER_CHAR) | u16::from(val);
        bits += BITS_PER_CHAR;
        if i == 0 {
            bits -= pad;
        }
        while bits >= 8 {
            bits -= 8;
            out.push(((acc >> bits) & 0xFF) as u8);
        }
    }
    Ok(out)
}

/// Maps one alphabet character to its 6-bit value.
pub(crate) fn value_of(b: u8, index: usize) -> Result<u8> {
    match LOOKUP[usize::from(b)] {
        NO_VALUE => Err(Error::format(
            "URLSAFE id",
            format!("invalid byte {b:#04x} at index {index}"),
        )),
        val => Ok(val),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_strictly_ascending() {
        assert!(ALPHABET.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn widths_for_id_lengths() {
        assert_eq!(encoded_width(8), 11);
        assert_eq!(encoded_width(9), 12);
        assert_eq!(encoded_width(10), 14);
    }

    #[test]
    fn encodes_extremes() {
        assert_eq!(encode(&[0; 8]), "-----------");
        // 64 bits of ones with two padding bits: first char carries 4 bits.
        assert_eq!(encode(&[0xFF; 8]), "Ezzzzzzzzzz");
        assert_eq!(encode(&[0xFF; 9]), "zzzzzzzzzzzz");
    }

    #[test]
    fn decode_inverts_encode() {
        for bytes in [
            vec![0_u8; 8],
            vec![0xFF; 8],
            vec![0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0x05],
            vec![0x80, 0, 0, 0, 0, 0, 0, 0, 0x05, 0xAA],
        ] {
            let text = encode(&bytes);
            assert_eq!(decode(&text), Ok(bytes));
        }
    }

    #[test]
    fn decode_rejects_non_canonical_width() {
        // 13 characters hold 78 bits: not the width of any byte length.
        assert!(decode("-------------").is_err());
        assert!(decode("").is_err());
        assert!(decode("-").is_err());
    }

    #[test]
    fn decode_rejects_overflowing_padding() {
        // 'F' = 16 sets a padding bit of an 11-char (8 byte) encoding.
        assert!(decode("F----------").is_err());
        assert!(decode("E----------").is_ok());
    }

    #[test]
    fn decode_rejects_invalid_characters() {
        assert!(decode("-----------+").is_err());
        assert!(decode("----------=").is_err());
    }
}
