//! YAML decoder.

use super::{Decoder, FormatTag, root_mapping, text};
use crate::error::DecodeError;
use crate::value::{ConfigDocument, ConfigValue, Mapping};
use serde_yaml::Value;

/// Decodes a single YAML document. Merge keys (`<<`) are applied and tags
/// are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn format(&self) -> FormatTag {
        FormatTag::Yaml
    }

    fn decode(&self, raw: &[u8]) -> Result<ConfigDocument, DecodeError> {
        let text = text(raw)?;
        if is_comments_only(text) {
            return Ok(ConfigDocument::new());
        }

        let mut value: Value = serde_yaml::from_str(text)?;
        value.apply_merge()?;
        root_mapping(convert(value)?)
    }
}

/// Blank lines and `#` comments only.
fn is_comments_only(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn convert(value: Value) -> Result<ConfigValue, DecodeError> {
    Ok(match value {
        Value::Null => ConfigValue::Null,
        Value::Bool(b) => ConfigValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ConfigValue::Integer(i),
            None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => ConfigValue::String(s),
        Value::Sequence(items) => ConfigValue::Sequence(
            items
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = Mapping::new();
            for (key, value) in map {
                out.insert(key_string(key)?, convert(value)?);
            }
            ConfigValue::Mapping(out)
        }
        Value::Tagged(tagged) => convert(tagged.value)?,
    })
}

/// Scalar keys are stringified; collection keys are rejected.
fn key_string(key: Value) -> Result<String, DecodeError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => key_string(tagged.value),
        Value::Sequence(_) => Err(DecodeError::UnsupportedKey { found: "sequence" }),
        Value::Mapping(_) => Err(DecodeError::UnsupportedKey { found: "mapping" }),
    }
}
