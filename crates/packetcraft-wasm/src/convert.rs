use std::fmt::Display;

use packetcraft::{Limits, Packet, serde::{LimitsDef, PacketDef}};
use serde::Serialize;
use wasm_bindgen::JsValue;

/// Converts any displayable error into a JS string value.
pub fn error_to_js(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Reads [Limits] from a JSON document shaped like [LimitsDef].
pub fn parse_limits(limits_json: &str) -> Result<Limits, serde_json::Error> {
    let def: LimitsDef = serde_json::from_str(limits_json)?;
    Ok(def.into())
}

/// Converts a packet tree into a plain JS object. Values beyond the safe
/// integer range of a JS number are emitted as `BigInt`s.
pub fn packet_to_js(packet: &Packet) -> Result<JsValue, JsValue> {
    let serializer =
        serde_wasm_bindgen::Serializer::new().serialize_large_number_types_as_bigints(true);

    PacketDef::from(packet)
        .serialize(&serializer)
        .map_err(error_to_js)
}

pub fn packet_to_json(packet: &Packet) -> Result<String, JsValue> {
    serde_json::to_string(&PacketDef::from(packet)).map_err(error_to_js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limits() {
        assert_eq!(parse_limits(r#"{"max_depth": 12}"#).unwrap().max_depth(), 12);
        assert_eq!(parse_limits("{}").unwrap(), Limits::default());
        assert!(parse_limits(r#"{"max_depth": -1}"#).is_err());
    }

    #[test]
    fn test_parse_limits_clamps_depth() {
        let limits = parse_limits(r#"{"max_depth": 1000000}"#).unwrap();
        assert_eq!(limits.max_depth(), packetcraft::config::MAX_DEPTH_CEILING);
    }
}
