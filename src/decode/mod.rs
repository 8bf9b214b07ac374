//! Format decoders.
//!
//! Each supported serialization format has a unit-struct [`Decoder`] that
//! turns raw file bytes into a [`ConfigDocument`]. [`FormatTag`] maps a file
//! extension to its format and a format to its decoder, so dispatch is a
//! fixed table rather than a runtime lookup.
//!
//! All decoders treat blank content, and a root that is null or otherwise
//! falsy (`false`, `0`, `""`, `[]`), as an empty document, and reject any
//! other root that is not a mapping.

pub mod ini;
mod json;
mod toml;
mod yaml;

pub use self::ini::{IniDecoder, IniSections, sections};
pub use self::json::JsonDecoder;
pub use self::toml::TomlDecoder;
pub use self::yaml::YamlDecoder;

use crate::error::DecodeError;
use crate::value::{ConfigDocument, ConfigValue};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A supported configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Yaml,
    Json,
    Toml,
    Ini,
}

impl FormatTag {
    /// Every supported format.
    pub const ALL: [FormatTag; 4] = [
        FormatTag::Yaml,
        FormatTag::Json,
        FormatTag::Toml,
        FormatTag::Ini,
    ];

    /// File extensions (without the dot) that select this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FormatTag::Yaml => &["yaml", "yml"],
            FormatTag::Json => &["json"],
            FormatTag::Toml => &["toml"],
            FormatTag::Ini => &["ini", "cfg"],
        }
    }

    /// Resolve a format from an extension, ignoring ASCII case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }

    /// Resolve a format from a path's extension, ignoring ASCII case.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// The decoder for this format.
    pub fn decoder(self) -> &'static dyn Decoder {
        match self {
            FormatTag::Yaml => &YamlDecoder,
            FormatTag::Json => &JsonDecoder,
            FormatTag::Toml => &TomlDecoder,
            FormatTag::Ini => &IniDecoder,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::Yaml => "yaml",
            FormatTag::Json => "json",
            FormatTag::Toml => "toml",
            FormatTag::Ini => "ini",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatTag::Yaml => write!(f, "YAML"),
            FormatTag::Json => write!(f, "JSON"),
            FormatTag::Toml => write!(f, "TOML"),
            FormatTag::Ini => write!(f, "INI"),
        }
    }
}

impl FromStr for FormatTag {
    type Err = String;

    /// Accepts a format name or any of its extensions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('.');
        Self::from_extension(name).ok_or_else(|| {
            format!("unknown config format '{s}' (expected yaml, json, toml or ini)")
        })
    }
}

/// Allow-list of formats considered during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSet(BTreeSet<FormatTag>);

impl FormatSet {
    pub fn all() -> Self {
        FormatTag::ALL.into_iter().collect()
    }

    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, format: FormatTag) -> bool {
        self.0.contains(&format)
    }

    pub fn insert(&mut self, format: FormatTag) -> bool {
        self.0.insert(format)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Formats in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = FormatTag> + '_ {
        self.0.iter().copied()
    }
}

/// YAML, JSON and TOML. INI files must be opted into.
impl Default for FormatSet {
    fn default() -> Self {
        [FormatTag::Yaml, FormatTag::Json, FormatTag::Toml]
            .into_iter()
            .collect()
    }
}

impl FromIterator<FormatTag> for FormatSet {
    fn from_iter<I: IntoIterator<Item = FormatTag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<FormatTag> for FormatSet {
    fn from(format: FormatTag) -> Self {
        std::iter::once(format).collect()
    }
}

impl<const N: usize> From<[FormatTag; N]> for FormatSet {
    fn from(formats: [FormatTag; N]) -> Self {
        formats.into_iter().collect()
    }
}

impl fmt::Display for FormatSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(FormatTag::as_str).collect();
        write!(f, "{}", names.join(","))
    }
}

impl FromStr for FormatSet {
    type Err = String;

    /// Parses a comma-separated list (`"yaml,ini"`) or `"all"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(FormatTag::from_str)
            .collect()
    }
}

/// Converts raw file content into a normalized document.
pub trait Decoder: Send + Sync {
    /// The format this decoder accepts.
    fn format(&self) -> FormatTag;

    /// Decode raw content. Blank content yields an empty document.
    fn decode(&self, raw: &[u8]) -> Result<ConfigDocument, DecodeError>;
}

/// Decode `raw` with the decoder for `format`.
pub fn decode(raw: &[u8], format: FormatTag) -> Result<ConfigDocument, DecodeError> {
    format.decoder().decode(raw)
}

/// Interpret raw bytes as UTF-8 text, dropping a leading byte-order mark.
fn text(raw: &[u8]) -> Result<&str, DecodeError> {
    let text = std::str::from_utf8(raw)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Accept a decoded root as a document. A falsy root is an empty document.
fn root_mapping(value: ConfigValue) -> Result<ConfigDocument, DecodeError> {
    match value {
        ConfigValue::Mapping(map) => Ok(map),
        falsy if falsy.is_falsy() => Ok(ConfigDocument::new()),
        other => Err(DecodeError::NotAMapping {
            found: other.type_name(),
        }),
    }
}
