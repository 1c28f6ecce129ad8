//! Hex string to bit sequence conversion.

use crate::{bits::Bits, errors::DecodeError};

/// Decodes a hex string into its exact bit representation.
///
/// Every character contributes four bits, MSB-first, in input order, so the
/// result is always `4 * hex.len()` bits long. Upper and lower case digits are
/// both accepted.
pub fn decode_hex(hex: &str) -> Result<Bits, DecodeError> {
    let mut data = Vec::with_capacity(hex.len().div_ceil(2));
    let mut nibbles = 0usize;

    for (index, character) in hex.chars().enumerate() {
        let nibble = character
            .to_digit(16)
            .ok_or(DecodeError::InvalidDigit { index, character })? as u8;

        if nibbles % 2 == 0 {
            data.push(nibble << 4);
        } else if let Some(last) = data.last_mut() {
            *last |= nibble;
        }
        nibbles += 1;
    }

    Ok(Bits::from_bytes(data, nibbles * 4))
}

/// Encodes a bit sequence as uppercase hex, zero-padding the final nibble.
pub fn encode_hex(bits: &Bits) -> String {
    let nibbles = bits.len().div_ceil(4);
    let mut out = String::with_capacity(nibbles);

    for i in 0..nibbles {
        let byte = bits.as_bytes()[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
        out.push(char::from_digit(nibble as u32, 16).map_or('0', |c| c.to_ascii_uppercase()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_literal_example() {
        let bits = decode_hex("D2FE28").unwrap();
        assert_eq!(bits.len(), 24);
        assert_eq!(bits.to_string(), "110100101111111000101000");
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(decode_hex("d2fe28").unwrap(), decode_hex("D2FE28").unwrap());
        assert_eq!(decode_hex("aBcD").unwrap().as_bytes(), &[0xAB, 0xCD]);
    }

    #[test]
    fn test_decode_odd_length() {
        let bits = decode_hex("ABC").unwrap();
        assert_eq!(bits.len(), 12);
        assert_eq!(bits.to_string(), "101010111100");
        assert!(bits.read(12, 1).is_err());
    }

    #[test]
    fn test_decode_empty() {
        let bits = decode_hex("").unwrap();
        assert!(bits.is_empty());
    }

    #[test]
    fn test_decode_invalid_digit() {
        assert_eq!(
            decode_hex("D2G").unwrap_err(),
            DecodeError::InvalidDigit {
                index: 2,
                character: 'G'
            }
        );
        assert!(matches!(
            decode_hex("12 34"),
            Err(DecodeError::InvalidDigit { index: 2, character: ' ' })
        ));
    }

    #[test]
    fn test_encode_hex() {
        let bits = decode_hex("38006f45291200").unwrap();
        assert_eq!(encode_hex(&bits), "38006F45291200");
        assert_eq!(encode_hex(&bits.prefix(5)), "38");
    }
}
