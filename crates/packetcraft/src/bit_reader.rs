use crate::{bits::Bits, errors::ReadError};

/// A forward-only cursor over a [Bits] sequence.
pub struct BitReader<'a> {
    bits: &'a Bits,
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a Bits) -> Self {
        Self { bits, bit_pos: 0 }
    }

    pub fn at(bits: &'a Bits, bit_pos: usize) -> Self {
        Self { bits, bit_pos }
    }

    pub fn position(&self) -> usize {
        self.bit_pos
    }

    pub fn remaining(&self) -> usize {
        self.bits.len().saturating_sub(self.bit_pos)
    }

    pub fn read_bits(&mut self, n: usize) -> Result<u64, ReadError> {
        let value = self.bits.read(self.bit_pos, n)?;
        self.bit_pos += n;

        Ok(value)
    }

    pub fn read_flag(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_bits(1)? == 1)
    }
}
