//! Character-card payload encoding
//!
//! A card is stored as compact JSON, base64-encoded (standard alphabet, padded)
//! so the `tEXt` text stays printable ASCII.

use crate::error::Result;
use base64::{engine::general_purpose, Engine as _};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Keyword for the current card chunk
pub const CCV3_KEYWORD: &str = "ccv3";

/// Keyword for the legacy card chunk
pub const CHARA_KEYWORD: &str = "chara";

/// `spec` value of cards that also need the legacy chunk
pub const LEGACY_SPEC: &str = "chara_card_v2";

/// Serialize a card to the text stored in its `tEXt` chunk
pub fn encode_payload(card: &Value) -> Result<String> {
    let json = serde_json::to_vec(card)?;
    Ok(general_purpose::STANDARD.encode(json))
}

/// Decode the text of a card chunk back into JSON
pub fn decode_payload(text: &[u8]) -> Result<Value> {
    decode_payload_as(text)
}

/// Decode the text of a card chunk into a typed value
pub fn decode_payload_as<T: DeserializeOwned>(text: &[u8]) -> Result<T> {
    let json = general_purpose::STANDARD.decode(text.trim_ascii())?;
    Ok(serde_json::from_slice(&json)?)
}

/// True when the card's top-level `spec` equals `legacy_spec`
pub fn has_spec(card: &Value, legacy_spec: &str) -> bool {
    card.get("spec").and_then(Value::as_str) == Some(legacy_spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_is_compact_base64() {
        let text = encode_payload(&json!({"name": "Ada"})).unwrap();
        assert_eq!(text, "eyJuYW1lIjoiQWRhIn0=");
        assert!(text.bytes().all(|b| b.is_ascii_graphic()));
    }

    #[test]
    fn test_decode_payload() {
        let value = decode_payload(b"eyJuYW1lIjoiQWRhIn0=").unwrap();
        assert_eq!(value, json!({"name": "Ada"}));
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let value = decode_payload(b" eyJuYW1lIjoiQWRhIn0=\n").unwrap();
        assert_eq!(value, json!({"name": "Ada"}));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode_payload(b"not base64!"),
            Err(crate::Error::Base64(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_json() {
        // base64 of "{oops"
        assert!(matches!(
            decode_payload(b"e29vcHM="),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn test_has_spec() {
        assert!(has_spec(&json!({"spec": "chara_card_v2"}), LEGACY_SPEC));
        assert!(!has_spec(&json!({"spec": "chara_card_v3"}), LEGACY_SPEC));
        assert!(!has_spec(&json!({"spec": 2}), LEGACY_SPEC));
        assert!(!has_spec(&json!(["chara_card_v2"]), LEGACY_SPEC));
        assert!(!has_spec(&json!(null), LEGACY_SPEC));
    }
}
