//! Low-level bit buffer and read utilities.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte.
//! A [Bits] buffer knows its exact length in bits, so pad bits in the final byte
//! can never be read.

use std::fmt;

use crate::errors::{ReadError, WriteError};

/// A packed, MSB-first sequence of bits with an exact bit length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bits {
    data: Vec<u8>,
    len: usize,
}

impl Bits {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `data`, exposing only its first `len` bits.
    ///
    /// `len` is clamped to the number of bits `data` actually holds. Bytes and
    /// bits past `len` are dropped.
    pub fn from_bytes(data: Vec<u8>, len: usize) -> Self {
        let len = len.min(data.len() * 8);
        Self { data, len }.prefix(len)
    }

    /// Number of readable bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The backing bytes. Bits past [Bits::len] in the last byte are zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Reads a single bit at `bit_pos`. Returns 0 or 1.
    pub fn bit(&self, bit_pos: usize) -> Result<u8, ReadError> {
        read_bit_at(&self.data, self.len, bit_pos)
    }

    /// Reads `n` bits starting at `bit_pos` as an unsigned value (max 64 bits).
    pub fn read(&self, bit_pos: usize, n: usize) -> Result<u64, ReadError> {
        read_bits_at(&self.data, self.len, bit_pos, n)
    }

    /// Appends `value` as an `n`-bit field, most significant bit first.
    pub fn push(&mut self, value: u64, n: usize) -> Result<(), WriteError> {
        if n > 64 || (n < 64 && value >> n != 0) {
            return Err(WriteError::InvalidValue { value, bits: n });
        }

        for i in (0..n).rev() {
            let bit = ((value >> i) & 1) as u8;
            let byte_index = self.len / 8;
            if byte_index == self.data.len() {
                self.data.push(0);
            }
            self.data[byte_index] |= bit << (7 - self.len % 8);
            self.len += 1;
        }

        Ok(())
    }

    /// Copies the first `len` bits into a new buffer.
    pub fn prefix(&self, len: usize) -> Bits {
        let len = len.min(self.len);
        let mut data = self.data[..len.div_ceil(8)].to_vec();
        if len % 8 != 0 {
            if let Some(last) = data.last_mut() {
                *last &= 0xFF << (8 - len % 8);
            }
        }

        Bits { data, len }
    }
}

/// Renders the sequence as a string of `0`/`1` characters.
impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in 0..self.len {
            let bit = (self.data[pos / 8] >> (7 - pos % 8)) & 1;
            f.write_str(if bit == 1 { "1" } else { "0" })?;
        }

        Ok(())
    }
}

/// Reads a single bit at `bit_pos` from the first `len_bits` bits of `data`.
pub fn read_bit_at(data: &[u8], len_bits: usize, bit_pos: usize) -> Result<u8, ReadError> {
    let available = len_bits.min(data.len() * 8);
    if bit_pos >= available {
        return Err(ReadError::OutOfBounds {
            offset: bit_pos,
            needed: 1,
            available,
        });
    }

    let byte_index = bit_pos / 8;
    let bit_index = bit_pos % 8;

    Ok((data[byte_index] >> (7 - bit_index)) & 1)
}

/// Reads `n` bits starting at `bit_pos` as an unsigned value (max 64 bits). MSB-first.
pub fn read_bits_at(data: &[u8], len_bits: usize, bit_pos: usize, n: usize) -> Result<u64, ReadError> {
    if n > 64 {
        return Err(ReadError::TooManyBitsRead);
    }

    let available = len_bits.min(data.len() * 8);
    if bit_pos.checked_add(n).is_none_or(|end| end > available) {
        return Err(ReadError::OutOfBounds {
            offset: bit_pos,
            needed: n,
            available,
        });
    }

    let mut value = 0u64;
    let mut pos = bit_pos;

    for _ in 0..n {
        let bit = read_bit_at(data, available, pos)? as u64;
        value = (value << 1) | bit;
        pos += 1;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bit_at() {
        let data = [0b10000000];
        assert_eq!(read_bit_at(&data, 8, 0).unwrap(), 1);
        assert_eq!(read_bit_at(&data, 8, 1).unwrap(), 0);
    }

    #[test]
    fn test_read_bits_at() {
        let data = [0b11111111];
        assert_eq!(read_bits_at(&data, 8, 0, 8).unwrap(), 0b11111111);
    }

    #[test]
    fn test_read_bits_across_bytes() {
        let data = [0b0000_1010, 0b1100_0000];
        assert_eq!(read_bits_at(&data, 16, 4, 6).unwrap(), 0b101011);
    }

    #[test]
    fn test_read_bits_out_of_bounds() {
        let data = [0b11111111];
        assert_eq!(
            read_bits_at(&data, 8, 0, 9).unwrap_err(),
            ReadError::OutOfBounds {
                offset: 0,
                needed: 9,
                available: 8
            }
        );
    }

    #[test]
    fn test_read_respects_bit_length() {
        let bits = Bits::from_bytes(vec![0b1111_0000], 4);
        assert_eq!(bits.read(0, 4).unwrap(), 0b1111);
        assert!(matches!(
            bits.read(2, 3),
            Err(ReadError::OutOfBounds { available: 4, .. })
        ));
        assert!(bits.bit(4).is_err());
    }

    #[test]
    fn test_read_bits_more_than_64() {
        let data = [0b11111111];
        assert_eq!(
            read_bits_at(&data, 8, 0, 65).unwrap_err(),
            ReadError::TooManyBitsRead
        );
    }

    #[test]
    fn test_push_and_display() {
        let mut bits = Bits::new();
        bits.push(0b110, 3).unwrap();
        bits.push(0b100, 3).unwrap();
        bits.push(0b10111, 5).unwrap();
        assert_eq!(bits.len(), 11);
        assert_eq!(bits.to_string(), "11010010111");
        assert_eq!(bits.as_bytes(), &[0b1101_0010, 0b1110_0000]);
    }

    #[test]
    fn test_push_rejects_wide_value() {
        let mut bits = Bits::new();
        assert_eq!(
            bits.push(8, 3).unwrap_err(),
            WriteError::InvalidValue { value: 8, bits: 3 }
        );
        assert!(bits.is_empty());
        bits.push(u64::MAX, 64).unwrap();
        assert_eq!(bits.len(), 64);
    }

    #[test]
    fn test_prefix_masks_trailing_bits() {
        let bits = Bits::from_bytes(vec![0xFF, 0xFF], 16);
        let prefix = bits.prefix(11);
        assert_eq!(prefix.len(), 11);
        assert_eq!(prefix.as_bytes(), &[0xFF, 0b1110_0000]);
    }
}
