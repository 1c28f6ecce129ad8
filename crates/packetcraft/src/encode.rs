//! Writing [Packet] trees back into their bit representation.
//!
//! A packet is written with the same shape it was read with: literals keep
//! their group count and operators keep their length type. Encoding a parsed
//! packet therefore reproduces exactly the bits it was parsed from.

use crate::{
    bits::Bits,
    errors::WriteError,
    hex,
    packet::{GROUP_BITS, LengthType, Packet, PacketKind},
};

/// Encodes `packet` into a new bit sequence of exactly `packet.bits_consumed()` bits.
pub fn encode(packet: &Packet) -> Result<Bits, WriteError> {
    let mut bits = Bits::new();
    write_packet(&mut bits, packet)?;

    Ok(bits)
}

/// Encodes `packet` as uppercase hex. The last nibble is zero-padded.
pub fn encode_hex(packet: &Packet) -> Result<String, WriteError> {
    Ok(hex::encode_hex(&encode(packet)?))
}

/// Appends `packet` to `bits`.
pub fn write_packet(bits: &mut Bits, packet: &Packet) -> Result<(), WriteError> {
    bits.push(packet.version() as u64, 3)?;
    bits.push(packet.type_id() as u64, 3)?;

    match packet.kind() {
        PacketKind::Literal { value } => {
            let groups = packet.literal_groups().unwrap_or(1);
            write_literal(bits, *value, groups)
        }
        PacketKind::Operator {
            length_type,
            children,
            ..
        } => {
            let length = match length_type {
                LengthType::TotalBits => children.iter().map(Packet::bits_consumed).sum(),
                LengthType::PacketCount => children.len(),
            };

            let field_bits = length_type.field_bits();
            if length >> field_bits != 0 {
                return Err(WriteError::LengthOverflow { length, field_bits });
            }

            bits.push(*length_type as u64, 1)?;
            bits.push(length as u64, field_bits)?;

            for child in children {
                write_packet(bits, child)?;
            }

            Ok(())
        }
    }
}

fn write_literal(bits: &mut Bits, value: u64, groups: usize) -> Result<(), WriteError> {
    let significant = (u64::BITS - value.leading_zeros()) as usize;
    if groups == 0 || groups < significant.div_ceil(4) {
        return Err(WriteError::LiteralGroups { value, groups });
    }

    for i in (0..groups).rev() {
        let shift = i * 4;
        let chunk = if shift < u64::BITS as usize {
            (value >> shift) & 0xF
        } else {
            0
        };
        let more = (i > 0) as u64;

        bits.push((more << (GROUP_BITS - 1)) | chunk, GROUP_BITS)?;
    }

    Ok(())
}
