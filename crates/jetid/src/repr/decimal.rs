use crate::{Error, Result};

/// Renders `bytes` as an unsigned big-endian integer in base 10, without
/// leading zeros. Works for any length; zero renders as `"0"`.
pub fn encode(bytes: &[u8]) -> String {
    let mut value = strip_leading_zeros(bytes).to_vec();
    if value.is_empty() {
        return String::from("0");
    }
    let mut digits = Vec::new();
    while !value.is_empty() {
        digits.push(b'0' + div_rem_small(&mut value, 10));
        let nonzero = value.iter().position(|&b| b != 0).unwrap_or(value.len());
        value.drain(..nonzero);
    }
    digits.iter().rev().map(|&d| char::from(d)).collect()
}

/// Parses an arbitrary-precision unsigned decimal into its minimal
/// big-endian byte form (at least one byte). Leading zeros are accepted.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    if text.is_empty() {
        return Err(Error::format("DECIMAL id", "empty input"));
    }
    let mut value: Vec<u8> = Vec::new();
    for (i, c) in text.bytes().enumerate() {
        if !c.is_ascii_digit() {
            return Err(Error::format(
                "DECIMAL id",
                format!("invalid character at index {i}"),
            ));
        }
        mul_add_small(&mut value, 10, c - b'0');
    }
    if value.is_empty() {
        value.push(0);
    }
    Ok(value)
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// `value = value / divisor`, returning the remainder.
fn div_rem_small(value: &mut [u8], divisor: u8) -> u8 {
    let mut rem = 0_u16;
    for byte in value.iter_mut() {
        let cur = (rem << 8) | u16::from(*byte);
        *byte = (cur / u16::from(divisor)) as u8;
        rem = cur % u16::from(divisor);
    }
    rem as u8
}

/// `value = value * factor + addend`, growing at the front as needed.
fn mul_add_small(value: &mut Vec<u8>, factor: u8, addend: u8) {
    let mut carry = u16::from(addend);
    for byte in value.iter_mut().rev() {
        let cur = u16::from(*byte) * u16::from(factor) + carry;
        *byte = (cur & 0xFF) as u8;
        carry = cur >> 8;
    }
    if carry > 0 {
        value.insert(0, carry as u8);
    }
}
