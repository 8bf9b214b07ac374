//! TOML decoder.
//!
//! Dates and times have no counterpart in [`ConfigValue`] and are kept as
//! their RFC 3339 text.

use super::{Decoder, FormatTag, text};
use crate::error::DecodeError;
use crate::value::{ConfigDocument, ConfigValue};
use toml::{Table, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct TomlDecoder;

impl Decoder for TomlDecoder {
    fn format(&self) -> FormatTag {
        FormatTag::Toml
    }

    fn decode(&self, raw: &[u8]) -> Result<ConfigDocument, DecodeError> {
        let table: Table = toml::from_str(text(raw)?)?;
        Ok(convert_table(table))
    }
}

fn convert_table(table: Table) -> ConfigDocument {
    table
        .into_iter()
        .map(|(key, value)| (key, convert(value)))
        .collect()
}

fn convert(value: Value) -> ConfigValue {
    match value {
        Value::String(s) => ConfigValue::String(s),
        Value::Integer(i) => ConfigValue::Integer(i),
        Value::Float(f) => ConfigValue::Float(f),
        Value::Boolean(b) => ConfigValue::Bool(b),
        Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
        Value::Array(items) => ConfigValue::Sequence(items.into_iter().map(convert).collect()),
        Value::Table(table) => ConfigValue::Mapping(convert_table(table)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_document() {
        let doc = TomlDecoder.decode(b"k = \"v\"\n").unwrap();
        assert_eq!(doc.get("k"), Some(&ConfigValue::from("v")));
    }

    #[test]
    fn test_tables_and_arrays() {
        let doc = TomlDecoder
            .decode(
                br#"
title = "demo"

[server]
port = 8080
ratio = 0.25
tls = true

[[routes]]
path = "/a"

[[routes]]
path = "/b"
"#,
            )
            .unwrap();

        assert_eq!(
            ConfigValue::Mapping(doc),
            ConfigValue::from(json!({
                "title": "demo",
                "server": {"port": 8080, "ratio": 0.25, "tls": true},
                "routes": [{"path": "/a"}, {"path": "/b"}]
            }))
        );
    }

    #[test]
    fn test_datetime_kept_as_text() {
        let doc = TomlDecoder.decode(b"released = 1979-05-27T07:32:00Z\n").unwrap();
        assert_eq!(
            doc.get("released"),
            Some(&ConfigValue::from("1979-05-27T07:32:00Z"))
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = TomlDecoder.decode(b"a = 1\na = 2\n").unwrap_err();
        assert!(matches!(err, DecodeError::Toml(_)));
    }
}
