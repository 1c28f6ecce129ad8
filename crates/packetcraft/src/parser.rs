//! Recursive-descent parser from a bit sequence to a [Packet] tree.
//!
//! Every parse call returns the packet it built together with the number of
//! bits that packet occupied. Operator packets add up the counts returned by
//! their children to know where the next sibling starts and when a total-bits
//! operator is complete.

use tracing::{debug, trace};

use crate::{
    bit_reader::BitReader,
    bits::Bits,
    config::Limits,
    errors::ParseError,
    packet::{LengthType, Operator, Packet, PacketKind},
};

const VERSION_BITS: usize = 3;
const TYPE_ID_BITS: usize = 3;
const CHUNK_BITS: usize = 4;

/// Packet parser with configurable [Limits].
#[derive(Debug, Clone, Default)]
pub struct Parser {
    limits: Limits,
}

impl Parser {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parses the single top-level packet at the start of `bits`.
    ///
    /// Bits after the packet are padding and are ignored.
    pub fn parse(&self, bits: &Bits) -> Result<Packet, ParseError> {
        let (packet, consumed) = self.parse_packet(bits, 0)?;
        debug!(
            consumed,
            padding = bits.len() - consumed,
            "parsed top-level packet"
        );

        Ok(packet)
    }

    /// Parses one packet starting at `offset`. Returns the packet and the
    /// number of bits it occupied, descendants included.
    pub fn parse_packet(&self, bits: &Bits, offset: usize) -> Result<(Packet, usize), ParseError> {
        self.parse_at(bits, offset, 1)
    }

    fn parse_at(
        &self,
        bits: &Bits,
        offset: usize,
        depth: usize,
    ) -> Result<(Packet, usize), ParseError> {
        if depth > self.limits.max_depth() {
            return Err(ParseError::DepthExceeded {
                max_depth: self.limits.max_depth(),
            });
        }

        let mut reader = BitReader::at(bits, offset);
        let version = reader.read_bits(VERSION_BITS)? as u8;
        let type_id = reader.read_bits(TYPE_ID_BITS)? as u8;

        // Three bits leave the literal id as the only one that is not an operator.
        let (kind, end) = match Operator::try_from(type_id) {
            Ok(operator) => self.parse_operator(bits, &mut reader, operator, offset, depth)?,
            Err(_) => {
                let value = read_literal(&mut reader, offset)?;
                (PacketKind::Literal { value }, reader.position())
            }
        };

        let consumed = end - offset;
        trace!(offset, version, type_id, consumed, "decoded packet");

        Ok((Packet::from_parts(version, kind, consumed), consumed))
    }

    /// Reads the length field and the subpackets of an operator. Returns the
    /// payload and the bit position right after the last subpacket.
    fn parse_operator(
        &self,
        bits: &Bits,
        reader: &mut BitReader<'_>,
        operator: Operator,
        offset: usize,
        depth: usize,
    ) -> Result<(PacketKind, usize), ParseError> {
        let length_type = LengthType::from_flag(reader.read_flag()?);
        let declared = reader.read_bits(length_type.field_bits())? as usize;
        if declared == 0 {
            return Err(ParseError::EmptyOperator { offset });
        }

        let mut position = reader.position();
        let mut children = Vec::new();

        match length_type {
            LengthType::TotalBits => {
                let mut consumed = 0;
                while consumed < declared {
                    let (child, used) = self.parse_at(bits, position, depth + 1)?;
                    children.push(child);
                    position += used;
                    consumed += used;
                }

                if consumed != declared {
                    return Err(ParseError::LengthMismatch { declared, consumed });
                }
            }
            LengthType::PacketCount => {
                children.reserve_exact(declared);
                for _ in 0..declared {
                    let (child, used) = self.parse_at(bits, position, depth + 1)?;
                    children.push(child);
                    position += used;
                }
            }
        }

        let kind = PacketKind::Operator {
            operator,
            length_type,
            children,
        };

        Ok((kind, position))
    }
}

/// Reads 5-bit groups until one has a clear continuation flag, concatenating
/// their 4-bit chunks most significant first.
fn read_literal(reader: &mut BitReader<'_>, offset: usize) -> Result<u64, ParseError> {
    let mut value = 0u64;

    loop {
        let more = reader.read_flag()?;
        let chunk = reader.read_bits(CHUNK_BITS)?;

        if value >> (u64::BITS as usize - CHUNK_BITS) != 0 {
            return Err(ParseError::LiteralOverflow { offset });
        }
        value = (value << CHUNK_BITS) | chunk;

        if !more {
            return Ok(value);
        }
    }
}

/// Parses the top-level packet of `bits` with default [Limits].
pub fn parse(bits: &Bits) -> Result<Packet, ParseError> {
    Parser::default().parse(bits)
}

/// Parses one packet at `offset` with default [Limits], returning it with its bit length.
pub fn parse_packet(bits: &Bits, offset: usize) -> Result<(Packet, usize), ParseError> {
    Parser::default().parse_packet(bits, offset)
}
