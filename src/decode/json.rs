//! JSON decoder.

use super::{Decoder, FormatTag, root_mapping, text};
use crate::error::DecodeError;
use crate::value::{ConfigDocument, ConfigValue};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn format(&self) -> FormatTag {
        FormatTag::Json
    }

    fn decode(&self, raw: &[u8]) -> Result<ConfigDocument, DecodeError> {
        let text = text(raw)?;
        if text.trim().is_empty() {
            return Ok(ConfigDocument::new());
        }

        let value: Value = serde_json::from_str(text)?;
        root_mapping(ConfigValue::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_document() {
        let doc = JsonDecoder.decode(br#"{"k": "v"}"#).unwrap();
        assert_eq!(doc.get("k"), Some(&ConfigValue::from("v")));
    }

    #[test]
    fn test_native_types() {
        let doc = JsonDecoder
            .decode(br#"{"n": 1, "f": 2.5, "b": true, "z": null, "s": [1, {"x": "y"}]}"#)
            .unwrap();
        assert_eq!(
            ConfigValue::Mapping(doc),
            ConfigValue::from(json!({"n": 1, "f": 2.5, "b": true, "z": null, "s": [1, {"x": "y"}]}))
        );
    }

    #[test]
    fn test_null_root_is_empty() {
        assert!(JsonDecoder.decode(b"null").unwrap().is_empty());
    }

    #[test]
    fn test_falsy_root_is_empty() {
        for raw in ["[]", "0", "false", "\"\""] {
            assert!(JsonDecoder.decode(raw.as_bytes()).unwrap().is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_non_mapping_root_rejected() {
        let err = JsonDecoder.decode(b"[1, 2]").unwrap_err();
        assert!(matches!(err, DecodeError::NotAMapping { found: "sequence" }));

        let err = JsonDecoder.decode(b"\"text\"").unwrap_err();
        assert!(matches!(err, DecodeError::NotAMapping { found: "string" }));
    }

    #[test]
    fn test_trailing_comma_rejected() {
        let err = JsonDecoder.decode(br#"{"a": 1,}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }
}
