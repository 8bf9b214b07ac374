//! Normalized configuration values.
//!
//! Every decoder produces a [`ConfigDocument`]: a string-keyed mapping whose
//! values are [`ConfigValue`] trees. Mappings are `BTreeMap`s, so iteration
//! and serialized output are key-sorted regardless of source order.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// String-keyed mapping of configuration values.
pub type Mapping = BTreeMap<String, ConfigValue>;

/// Root of one decoded configuration file.
pub type ConfigDocument = Mapping;

/// A normalized configuration value.
///
/// Serializes untagged, so a value renders as plain JSON/YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<ConfigValue>),
    Mapping(Mapping),
}

impl ConfigValue {
    /// An empty mapping.
    pub fn empty_mapping() -> Self {
        ConfigValue::Mapping(Mapping::new())
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) | ConfigValue::Float(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Sequence(_) => "sequence",
            ConfigValue::Mapping(_) => "mapping",
        }
    }

    /// Null, `false`, zero, and empty strings, sequences or mappings.
    pub fn is_falsy(&self) -> bool {
        match self {
            ConfigValue::Null => true,
            ConfigValue::Bool(b) => !b,
            ConfigValue::Integer(i) => *i == 0,
            ConfigValue::Float(f) => *f == 0.0,
            ConfigValue::String(s) => s.is_empty(),
            ConfigValue::Sequence(items) => items.is_empty(),
            ConfigValue::Mapping(map) => map.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ConfigValue::Mapping(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as `f64`; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Integer(i) => Some(*i as f64),
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Consume the value, returning its mapping if it is one.
    pub fn into_mapping(self) -> Option<Mapping> {
        match self {
            ConfigValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key if this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Walk a dotted key path (`"server.port"`) through nested mappings.
    pub fn get_path(&self, dotted: &str) -> Option<&ConfigValue> {
        dotted
            .split('.')
            .try_fold(self, |value, segment| value.get(segment))
    }

    /// Deep merge `overlay` onto a copy of `self`, leaving both untouched.
    ///
    /// See [`crate::config::merge`] for the rules.
    pub fn merged(&self, overlay: &ConfigValue) -> ConfigValue {
        crate::config::merge(self.clone(), overlay.clone())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        ConfigValue::Sequence(value)
    }
}

impl From<Mapping> for ConfigValue {
    fn from(value: Mapping) -> Self {
        ConfigValue::Mapping(value)
    }
}

/// JSON values convert losslessly except for unsigned integers above
/// `i64::MAX`, which become floats.
impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ConfigValue::String(s),
            Value::Array(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            Value::Object(map) => ConfigValue::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, ConfigValue::from(value)))
                    .collect(),
            ),
        }
    }
}
