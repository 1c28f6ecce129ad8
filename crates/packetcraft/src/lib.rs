//! # packetcraft
//!
//! A decoder and evaluator for BITS transmissions: hex strings carrying a
//! bit-packed tree of nested packets.
//!
//! Decoding runs in three stages, each usable on its own:
//! hex digits become a [bits::Bits] sequence ([hex::decode_hex]), the bits
//! become a [packet::Packet] tree ([parser::parse]), and the tree reduces to a
//! single `u64` ([eval::evaluate]). Packets can also be written back out with
//! [encode::encode].
//!
//! ## Example
//!
//! ```
//! use packetcraft::packet::Operator;
//!
//! let packet = packetcraft::decode("C200B40A82").unwrap();
//! assert_eq!(packet.operator_kind(), Some(Operator::Sum));
//! assert_eq!(packet.to_string(), "(+ 1 2)");
//! assert_eq!(packetcraft::evaluate_hex("C200B40A82").unwrap(), 3);
//! ```

use tracing::debug;

pub mod bit_reader;
pub mod bits;
pub mod config;
pub mod encode;
pub mod errors;
pub mod eval;
pub mod hex;
pub mod packet;
pub mod parser;
#[cfg(feature = "serde")]
pub mod serde;

pub use config::Limits;
pub use errors::Error;
pub use packet::Packet;

/// Decodes a hex transmission into its top-level packet.
pub fn decode(hex: &str) -> Result<Packet, Error> {
    decode_with(hex, Limits::default())
}

/// Decodes a hex transmission into its top-level packet under `limits`.
pub fn decode_with(hex: &str, limits: Limits) -> Result<Packet, Error> {
    debug!(digits = hex.len(), "decoding transmission");
    let bits = hex::decode_hex(hex)?;

    Ok(parser::Parser::new(limits).parse(&bits)?)
}

/// Decodes a hex transmission and evaluates its top-level packet.
pub fn evaluate_hex(hex: &str) -> Result<u64, Error> {
    evaluate_hex_with(hex, Limits::default())
}

/// Decodes and evaluates a hex transmission under `limits`.
pub fn evaluate_hex_with(hex: &str, limits: Limits) -> Result<u64, Error> {
    let packet = decode_with(hex, limits)?;
    let value = eval::Evaluator::new(limits).evaluate(&packet)?;
    debug!(value, "evaluated transmission");

    Ok(value)
}
