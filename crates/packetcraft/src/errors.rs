//! Error types for hex decoding, bit reading, packet parsing, evaluation and encoding.

use thiserror::Error;

use crate::packet::Operator;

/// Errors produced when turning a hex string into [crate::bits::Bits].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A character outside `0-9`, `a-f`, `A-F` was found.
    #[error("invalid hex digit {character:?} at index {index}")]
    InvalidDigit { index: usize, character: char },
}

/// Errors produced when reading bits from a [crate::bits::Bits] buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Requested bit range is beyond the end of the data.
    #[error("read of {needed} bits at offset {offset} exceeds {available} available bits")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// More than 64 bits were requested in a single read.
    #[error("cannot read more than 64 bits at once")]
    TooManyBitsRead,
}

/// Errors produced by [crate::parser::parse_packet] and friends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The stream ended before a header, length field, or group was complete.
    #[error("unexpected end of packet stream: {0}")]
    UnexpectedEnd(#[from] ReadError),
    /// Subpackets of a total-bits operator overshot the declared length.
    #[error("subpackets consumed {consumed} bits but {declared} were declared")]
    LengthMismatch { declared: usize, consumed: usize },
    /// An operator declared zero subpackets or zero subpacket bits.
    #[error("operator packet at offset {offset} declares no subpackets")]
    EmptyOperator { offset: usize },
    /// A literal's significant bits do not fit in a `u64`.
    #[error("literal at offset {offset} does not fit in 64 bits")]
    LiteralOverflow { offset: usize },
    /// Packet nesting went past the configured limit.
    #[error("packet nesting exceeds maximum depth {max_depth}")]
    DepthExceeded { max_depth: usize },
    /// A structural description could not be turned into a packet.
    #[error("invalid packet definition: {0}")]
    InvalidDefinition(String),
}

/// Errors produced by [crate::eval::evaluate].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A comparison operator did not have exactly the required operand count.
    #[error("{operator} expects {expected} operands, found {found}")]
    Arity {
        operator: Operator,
        expected: usize,
        found: usize,
    },
    /// A variadic operator had no operands.
    #[error("{operator} has no operands")]
    NoOperands { operator: Operator },
    /// The result does not fit in a `u64`.
    #[error("arithmetic overflow in {operator}")]
    Overflow { operator: Operator },
    /// Packet nesting went past the configured limit.
    #[error("packet nesting exceeds maximum depth {max_depth}")]
    DepthExceeded { max_depth: usize },
}

/// Errors produced when encoding a packet back into bits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// A subpacket length or count does not fit its length field.
    #[error("length {length} does not fit in a {field_bits}-bit length field")]
    LengthOverflow { length: usize, field_bits: usize },
    /// A value does not fit in the requested number of bits.
    #[error("value {value} does not fit in {bits} bits")]
    InvalidValue { value: u64, bits: usize },
    /// A literal's recorded group count cannot hold its value.
    #[error("literal {value} cannot be written in {groups} groups")]
    LiteralGroups { value: u64, groups: usize },
}

/// Any failure along the hex → packet → value pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
