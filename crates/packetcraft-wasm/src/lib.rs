//! WASM bindings for the `packetcraft` BITS decoder.
//!
//! JavaScript hands over a hex transmission, gets back a [`WasmPacket`], and
//! can then evaluate it, inspect its tree, or re-encode it.
//!
//! ```text
//! // const packet = new WasmPacket("9C0141080250320F1802104A08");
//! // packet.evaluate();      // 1n
//! // packet.versionSum();    // 20n
//! // packet.toExpression();  // "(== (+ 1 3) (* 2 2))"
//! // packet.toJs();          // { type: "Operator", version: 4, ... }
//! ```
//!
//! 64-bit results cross the boundary as `BigInt`. Errors are returned as
//! strings carrying the library's error message.

mod convert;

use packetcraft::{Limits, Packet, encode, eval::Evaluator};
use wasm_bindgen::prelude::*;

/// A decoded transmission together with the limits it was decoded under.
#[wasm_bindgen]
pub struct WasmPacket {
    packet: Packet,
    limits: Limits,
}

#[wasm_bindgen]
impl WasmPacket {
    /// Decodes `hex` with the default limits.
    #[wasm_bindgen(constructor)]
    pub fn new(hex: &str) -> Result<WasmPacket, JsValue> {
        Self::decode(hex, Limits::default())
    }

    /// Decodes `hex` with limits read from a JSON document such as
    /// `{"max_depth": 64}`. Omitted keys keep their defaults, and depths above
    /// `MAX_DEPTH_CEILING` are clamped to it.
    #[wasm_bindgen(js_name = withLimits)]
    pub fn with_limits(hex: &str, limits_json: &str) -> Result<WasmPacket, JsValue> {
        let limits = convert::parse_limits(limits_json).map_err(convert::error_to_js)?;
        Self::decode(hex, limits)
    }

    pub fn evaluate(&self) -> Result<u64, JsValue> {
        Evaluator::new(self.limits)
            .evaluate(&self.packet)
            .map_err(convert::error_to_js)
    }

    #[wasm_bindgen(js_name = versionSum)]
    pub fn version_sum(&self) -> u64 {
        self.packet.version_sum()
    }

    #[wasm_bindgen(js_name = bitsConsumed)]
    pub fn bits_consumed(&self) -> usize {
        self.packet.bits_consumed()
    }

    /// The packet tree as a JS object.
    #[wasm_bindgen(js_name = toJs)]
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        convert::packet_to_js(&self.packet)
    }

    /// The packet tree as a JSON string.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        convert::packet_to_json(&self.packet)
    }

    /// Prefix-expression rendering, e.g. `(+ 1 2)`.
    #[wasm_bindgen(js_name = toExpression)]
    pub fn to_expression(&self) -> String {
        self.packet.to_string()
    }

    /// Re-encodes the packet as hex, without the input's trailing padding.
    #[wasm_bindgen(js_name = toHex)]
    pub fn to_hex(&self) -> Result<String, JsValue> {
        encode::encode_hex(&self.packet).map_err(convert::error_to_js)
    }
}

impl WasmPacket {
    fn decode(hex: &str, limits: Limits) -> Result<WasmPacket, JsValue> {
        let packet = packetcraft::decode_with(hex, limits).map_err(convert::error_to_js)?;
        Ok(WasmPacket { packet, limits })
    }
}

/// Decodes and evaluates `hex` in one call.
#[wasm_bindgen(js_name = evaluateHex)]
pub fn evaluate_hex(hex: &str) -> Result<u64, JsValue> {
    packetcraft::evaluate_hex(hex).map_err(convert::error_to_js)
}
