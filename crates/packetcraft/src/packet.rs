//! The packet tree produced by the parser and consumed by the evaluator.

use std::fmt;

/// Bits taken by the version and type id fields.
pub const HEADER_BITS: usize = 6;
/// Bits in one literal group: a continuation flag and a 4-bit chunk.
pub const GROUP_BITS: usize = 5;
/// Type id reserved for literal packets.
pub const LITERAL_TYPE_ID: u8 = 4;
/// Bits taken by the length type flag of an operator.
pub const LENGTH_TYPE_BITS: usize = 1;

const VERSION_MASK: u8 = 0b111;

/// The operation an operator packet applies to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Sum = 0,
    Product = 1,
    Minimum = 2,
    Maximum = 3,
    GreaterThan = 5,
    LessThan = 6,
    EqualTo = 7,
}

impl Operator {
    /// The 3-bit type id this operator is encoded as.
    pub fn type_id(self) -> u8 {
        self as u8
    }

    /// Short symbol used when rendering a packet as an expression.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Sum => "+",
            Operator::Product => "*",
            Operator::Minimum => "min",
            Operator::Maximum => "max",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::EqualTo => "==",
        }
    }

    /// Whether the operator compares exactly two operands.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::GreaterThan | Operator::LessThan | Operator::EqualTo
        )
    }
}

/// Fails with the rejected id for the literal id and anything above 7.
impl TryFrom<u8> for Operator {
    type Error = u8;

    fn try_from(type_id: u8) -> Result<Self, Self::Error> {
        match type_id {
            0 => Ok(Operator::Sum),
            1 => Ok(Operator::Product),
            2 => Ok(Operator::Minimum),
            3 => Ok(Operator::Maximum),
            5 => Ok(Operator::GreaterThan),
            6 => Ok(Operator::LessThan),
            7 => Ok(Operator::EqualTo),
            other => Err(other),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Sum => "sum",
            Operator::Product => "product",
            Operator::Minimum => "minimum",
            Operator::Maximum => "maximum",
            Operator::GreaterThan => "greater-than",
            Operator::LessThan => "less-than",
            Operator::EqualTo => "equal-to",
        };
        f.write_str(name)
    }
}

/// How an operator packet bounds its subpackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthType {
    /// A 15-bit field gives the total bit length of all subpackets.
    TotalBits = 0,
    /// An 11-bit field gives the number of immediate subpackets.
    PacketCount = 1,
}

impl LengthType {
    pub fn from_flag(flag: bool) -> Self {
        if flag {
            LengthType::PacketCount
        } else {
            LengthType::TotalBits
        }
    }

    /// Width of the length field that follows the flag.
    pub fn field_bits(self) -> usize {
        match self {
            LengthType::TotalBits => 15,
            LengthType::PacketCount => 11,
        }
    }
}

/// Literal or operator payload of a [Packet].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketKind {
    Literal {
        value: u64,
    },
    Operator {
        operator: Operator,
        length_type: LengthType,
        children: Vec<Packet>,
    },
}

/// One node of a decoded BITS transmission.
///
/// A packet knows how many bits it occupied in its source stream, children
/// included. The count is fixed when the packet is built and is never
/// recomputed from the subtree.
///
/// Formatting, dropping and converting to `PacketDef` recurse once per level.
/// Parsed trees are bounded by [crate::Limits]; trees built by hand should
/// stay within [crate::config::MAX_DEPTH_CEILING] levels as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    version: u8,
    kind: PacketKind,
    bits_consumed: usize,
}

impl Packet {
    /// Builds a literal written with the fewest groups that hold `value`.
    ///
    /// Only the low 3 bits of `version` are kept.
    pub fn literal(version: u8, value: u64) -> Self {
        let significant = (u64::BITS - value.leading_zeros()) as usize;
        let groups = significant.div_ceil(4).max(1);

        Self {
            version: version & VERSION_MASK,
            kind: PacketKind::Literal { value },
            bits_consumed: HEADER_BITS + GROUP_BITS * groups,
        }
    }

    /// Builds an operator over `children`. Arity is not checked here; the
    /// evaluator rejects operand counts the operator cannot take.
    ///
    /// Only the low 3 bits of `version` are kept.
    pub fn operator(
        version: u8,
        operator: Operator,
        length_type: LengthType,
        children: Vec<Packet>,
    ) -> Self {
        let payload: usize = children.iter().map(Packet::bits_consumed).sum();

        Self {
            version: version & VERSION_MASK,
            kind: PacketKind::Operator {
                operator,
                length_type,
                children,
            },
            bits_consumed: HEADER_BITS + LENGTH_TYPE_BITS + length_type.field_bits() + payload,
        }
    }

    /// Assembles a packet whose size was measured while reading it.
    pub(crate) fn from_parts(version: u8, kind: PacketKind, bits_consumed: usize) -> Self {
        Self {
            version,
            kind,
            bits_consumed,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// The 3-bit type id: [LITERAL_TYPE_ID] for literals, the operator's id otherwise.
    pub fn type_id(&self) -> u8 {
        match &self.kind {
            PacketKind::Literal { .. } => LITERAL_TYPE_ID,
            PacketKind::Operator { operator, .. } => operator.type_id(),
        }
    }

    pub fn kind(&self) -> &PacketKind {
        &self.kind
    }

    /// Bits this packet and all of its descendants occupy.
    pub fn bits_consumed(&self) -> usize {
        self.bits_consumed
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, PacketKind::Literal { .. })
    }

    /// The literal value, or `None` for operators.
    pub fn value(&self) -> Option<u64> {
        match self.kind {
            PacketKind::Literal { value } => Some(value),
            PacketKind::Operator { .. } => None,
        }
    }

    pub fn operator_kind(&self) -> Option<Operator> {
        match self.kind {
            PacketKind::Operator { operator, .. } => Some(operator),
            PacketKind::Literal { .. } => None,
        }
    }

    pub fn length_type(&self) -> Option<LengthType> {
        match self.kind {
            PacketKind::Operator { length_type, .. } => Some(length_type),
            PacketKind::Literal { .. } => None,
        }
    }

    /// Immediate subpackets in stream order. Empty for literals.
    pub fn children(&self) -> &[Packet] {
        match &self.kind {
            PacketKind::Operator { children, .. } => children,
            PacketKind::Literal { .. } => &[],
        }
    }

    /// Number of 5-bit groups a literal was written with.
    pub fn literal_groups(&self) -> Option<usize> {
        match self.kind {
            PacketKind::Literal { .. } => Some((self.bits_consumed - HEADER_BITS) / GROUP_BITS),
            PacketKind::Operator { .. } => None,
        }
    }

    /// Sum of the version field over this packet and every descendant.
    pub fn version_sum(&self) -> u64 {
        self.iter().map(|packet| packet.version as u64).sum()
    }

    /// Number of packet levels, counting this one. A lone literal has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];

        while let Some((packet, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(packet.children().iter().map(|child| (child, depth + 1)));
        }

        deepest
    }

    /// Depth-first, pre-order walk over this packet and its descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

impl<'a> IntoIterator for &'a Packet {
    type Item = &'a Packet;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator returned by [Packet::iter].
pub struct Iter<'a> {
    stack: Vec<&'a Packet>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Packet;

    fn next(&mut self) -> Option<Self::Item> {
        let packet = self.stack.pop()?;
        self.stack.extend(packet.children().iter().rev());
        Some(packet)
    }
}

/// Renders the packet as a prefix expression, e.g. `(+ 1 (* 2 3))`.
///
/// Nested operators are rendered recursively, one call per level.
impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PacketKind::Literal { value } => write!(f, "{value}"),
            PacketKind::Operator {
                operator, children, ..
            } => {
                write!(f, "({}", operator.symbol())?;
                for child in children {
                    write!(f, " {child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Packet {
        Packet::operator(
            1,
            Operator::Sum,
            LengthType::PacketCount,
            vec![
                Packet::literal(2, 1),
                Packet::operator(
                    3,
                    Operator::Product,
                    LengthType::TotalBits,
                    vec![Packet::literal(4, 2), Packet::literal(5, 3)],
                ),
            ],
        )
    }

    #[test]
    fn test_operator_type_ids() {
        for type_id in 0..8u8 {
            match Operator::try_from(type_id) {
                Ok(operator) => assert_eq!(operator.type_id(), type_id),
                Err(rejected) => assert_eq!(rejected, LITERAL_TYPE_ID),
            }
        }
        assert_eq!(Operator::try_from(8), Err(8));
    }

    #[test]
    fn test_literal_bits_use_minimal_groups() {
        assert_eq!(Packet::literal(0, 0).bits_consumed(), 11);
        assert_eq!(Packet::literal(0, 15).bits_consumed(), 11);
        assert_eq!(Packet::literal(0, 16).bits_consumed(), 16);
        assert_eq!(Packet::literal(6, 2021).bits_consumed(), 21);
        assert_eq!(Packet::literal(0, u64::MAX).literal_groups(), Some(16));
    }

    #[test]
    fn test_operator_bits_include_children() {
        let packet = sample();
        let inner = &packet.children()[1];
        assert_eq!(inner.bits_consumed(), 6 + 1 + 15 + 11 + 11);
        assert_eq!(packet.bits_consumed(), 6 + 1 + 11 + 11 + inner.bits_consumed());
    }

    #[test]
    fn test_type_id_follows_kind() {
        let packet = sample();
        assert_eq!(packet.type_id(), 0);
        assert_eq!(packet.children()[0].type_id(), LITERAL_TYPE_ID);
        assert_eq!(packet.children()[1].type_id(), 1);
    }

    #[test]
    fn test_iter_is_preorder() {
        let versions: Vec<u8> = sample().iter().map(Packet::version).collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_version_sum_and_depth() {
        let packet = sample();
        assert_eq!(packet.version_sum(), 15);
        assert_eq!(packet.depth(), 3);
        assert_eq!(Packet::literal(0, 1).depth(), 1);
    }

    #[test]
    fn test_display_expression() {
        assert_eq!(sample().to_string(), "(+ 1 (* 2 3))");
        let cmp = Packet::operator(
            0,
            Operator::EqualTo,
            LengthType::TotalBits,
            vec![Packet::literal(0, 5), Packet::literal(0, 15)],
        );
        assert_eq!(cmp.to_string(), "(== 5 15)");
    }

    #[test]
    fn test_accessors_on_literal() {
        let literal = Packet::literal(7, 42);
        assert!(literal.is_literal());
        assert_eq!(literal.value(), Some(42));
        assert_eq!(literal.operator_kind(), None);
        assert_eq!(literal.length_type(), None);
        assert!(literal.children().is_empty());
    }

    #[test]
    fn test_version_keeps_low_bits() {
        assert_eq!(Packet::literal(8, 1).version(), 0);
        assert_eq!(Packet::literal(0xFF, 1).version(), 7);
        let packet = Packet::operator(13, Operator::Sum, LengthType::TotalBits, vec![]);
        assert_eq!(packet.version(), 5);
    }

    #[test]
    fn test_display_deep_tree() {
        let mut packet = Packet::literal(0, 1);
        for _ in 1..crate::config::MAX_DEPTH_CEILING {
            packet = Packet::operator(0, Operator::Minimum, LengthType::PacketCount, vec![packet]);
        }

        let rendered = packet.to_string();
        assert_eq!(packet.depth(), crate::config::MAX_DEPTH_CEILING);
        assert!(rendered.starts_with("(min (min "));
        assert_eq!(rendered.matches('(').count(), crate::config::MAX_DEPTH_CEILING - 1);
    }
}
