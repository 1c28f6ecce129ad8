//! JSON‑serializable packet and configuration shapes.
//!
//! These types mirror the core `packetcraft` types in a form that is easy to
//! read from and write to JSON, for example to inspect a decoded transmission
//! or to ship parser limits in a configuration file. Convert with `From` /
//! `TryFrom` into the core types.

use serde::{Deserialize, Serialize};

use crate::{
    errors::ParseError,
    packet::{GROUP_BITS, HEADER_BITS, LengthType, Operator, Packet, PacketKind},
};

/// Most groups a literal definition may declare: the largest literal that
/// still fits under a 15-bit total length.
pub const MAX_LITERAL_GROUPS: usize = ((1 << 15) - 1 - HEADER_BITS) / GROUP_BITS;

/// Length type of an operator packet.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum LengthTypeDef {
    /// Subpackets are bounded by their total bit length.
    TotalBits,
    /// Subpackets are bounded by their count.
    PacketCount,
}

/// Description of a packet tree.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PacketDef {
    /// A literal value.
    Literal {
        /// 3‑bit packet version.
        version: u8,
        /// The decoded value.
        value: u64,
        /// Number of 5‑bit groups; the minimal count when omitted. At most
        /// [MAX_LITERAL_GROUPS].
        #[serde(default)]
        groups: Option<usize>,
    },
    /// An operator over child packets.
    Operator {
        /// 3‑bit packet version.
        version: u8,
        /// 3‑bit type id selecting the operation (any value except 4).
        type_id: u8,
        /// How the children are bounded on the wire.
        length_type: LengthTypeDef,
        /// Child packets in stream order.
        children: Vec<PacketDef>,
    },
}

/// Parser and evaluator limits as found in a configuration file.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct LimitsDef {
    /// Deepest allowed packet nesting; the library default when omitted.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl From<LengthType> for LengthTypeDef {
    fn from(value: LengthType) -> Self {
        match value {
            LengthType::TotalBits => LengthTypeDef::TotalBits,
            LengthType::PacketCount => LengthTypeDef::PacketCount,
        }
    }
}

impl From<LengthTypeDef> for LengthType {
    fn from(value: LengthTypeDef) -> Self {
        match value {
            LengthTypeDef::TotalBits => LengthType::TotalBits,
            LengthTypeDef::PacketCount => LengthType::PacketCount,
        }
    }
}

/// Converts recursively, one call per nesting level of `packet`.
impl From<&Packet> for PacketDef {
    fn from(packet: &Packet) -> Self {
        match packet.kind() {
            PacketKind::Literal { value } => PacketDef::Literal {
                version: packet.version(),
                value: *value,
                groups: packet.literal_groups(),
            },
            PacketKind::Operator {
                operator,
                length_type,
                children,
            } => PacketDef::Operator {
                version: packet.version(),
                type_id: operator.type_id(),
                length_type: (*length_type).into(),
                children: children.iter().map(PacketDef::from).collect(),
            },
        }
    }
}

impl TryFrom<PacketDef> for Packet {
    type Error = ParseError;

    fn try_from(value: PacketDef) -> Result<Self, Self::Error> {
        match value {
            PacketDef::Literal {
                version,
                value,
                groups,
            } => {
                check_version(version)?;
                let minimal = Packet::literal(version, value);

                match groups {
                    None => Ok(minimal),
                    Some(groups) if groups > MAX_LITERAL_GROUPS => {
                        Err(ParseError::InvalidDefinition(format!(
                            "literal declares {groups} groups, more than {MAX_LITERAL_GROUPS}"
                        )))
                    }
                    Some(groups) if groups >= minimal.literal_groups().unwrap_or(1) => {
                        Ok(Packet::from_parts(
                            version,
                            PacketKind::Literal { value },
                            HEADER_BITS + GROUP_BITS * groups,
                        ))
                    }
                    Some(groups) => Err(ParseError::InvalidDefinition(format!(
                        "literal {value} does not fit in {groups} groups"
                    ))),
                }
            }
            PacketDef::Operator {
                version,
                type_id,
                length_type,
                children,
            } => {
                check_version(version)?;
                let operator = Operator::try_from(type_id).map_err(|id| {
                    ParseError::InvalidDefinition(format!("type id {id} is not an operator"))
                })?;
                let children = children
                    .into_iter()
                    .map(Packet::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Packet::operator(
                    version,
                    operator,
                    length_type.into(),
                    children,
                ))
            }
        }
    }
}

fn check_version(version: u8) -> Result<(), ParseError> {
    if version > 7 {
        return Err(ParseError::InvalidDefinition(format!(
            "version {version} does not fit in 3 bits"
        )));
    }

    Ok(())
}
