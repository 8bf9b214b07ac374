//! INI decoder and section view.
//!
//! Supported grammar:
//! - `[section]` headers; `key = value` or `key: value` (first delimiter wins)
//! - keys are lowercased, keys and values are trimmed
//! - `#` and `;` start full-line comments; inline comments are kept
//! - a line indented deeper than its key continues the value, joined with
//!   `\n`; blank lines inside a value are kept, trailing ones dropped
//! - `[DEFAULT]` entries are inherited by every other section
//! - duplicate sections and duplicate keys are errors
//! - `%(name)s` expands to another key of the same section (or `DEFAULT`),
//!   `%%` is a literal `%`
//!
//! Values are never coerced; every leaf is a string.

use super::{Decoder, FormatTag, text};
use crate::error::{ConfigError, DecodeError};
use crate::value::{ConfigDocument, ConfigValue};
use std::collections::BTreeMap;

/// Section name whose entries every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Deepest chain of `%(name)s` references followed before giving up.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Section name → (key → value).
pub type IniSections = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct IniDecoder;

impl Decoder for IniDecoder {
    fn format(&self) -> FormatTag {
        FormatTag::Ini
    }

    fn decode(&self, raw: &[u8]) -> Result<ConfigDocument, DecodeError> {
        let parsed = parse(text(raw)?)?;
        Ok(parsed
            .into_iter()
            .map(|(section, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|(key, value)| (key, ConfigValue::String(value)))
                    .collect();
                (section, ConfigValue::Mapping(entries))
            })
            .collect())
    }
}

/// A value as read: the line of its key and its physical lines.
#[derive(Debug)]
struct RawEntry {
    line: usize,
    lines: Vec<String>,
}

impl RawEntry {
    fn joined(&self) -> String {
        self.lines.join("\n").trim_end().to_string()
    }
}

type RawSection = BTreeMap<String, RawEntry>;

/// Parse INI text into sections, with `DEFAULT` entries folded in and
/// `%(name)s` references expanded.
pub fn parse(text: &str) -> Result<IniSections, DecodeError> {
    let (defaults, sections) = read(text)?;

    let mut out = IniSections::new();
    for (name, entries) in sections {
        // key -> (line of the key, raw value)
        let mut folded: BTreeMap<String, (usize, String)> = defaults
            .iter()
            .map(|(key, entry)| (key.clone(), (entry.line, entry.joined())))
            .collect();
        for (key, entry) in &entries {
            folded.insert(key.clone(), (entry.line, entry.joined()));
        }

        let raw: BTreeMap<String, String> = folded
            .iter()
            .map(|(key, (_, value))| (key.clone(), value.clone()))
            .collect();

        let mut expanded = BTreeMap::new();
        for (key, (line, value)) in &folded {
            let mut value_out = String::new();
            interpolate(value, &raw, 1, &mut value_out).map_err(|message| {
                DecodeError::ini(
                    *line,
                    format!("cannot expand key '{key}' in section '{name}': {message}"),
                )
            })?;
            expanded.insert(key.clone(), value_out);
        }
        out.insert(name, expanded);
    }

    Ok(out)
}

/// Split the text into the `DEFAULT` entries and the named sections.
fn read(text: &str) -> Result<(RawSection, BTreeMap<String, RawSection>), DecodeError> {
    let mut defaults = RawSection::new();
    let mut sections: BTreeMap<String, RawSection> = BTreeMap::new();
    let mut current: Option<String> = None;
    let mut last_key: Option<String> = None;
    let mut indent_level = 0;

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();

        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.is_empty() {
            // Kept only if a deeper-indented line follows; trimmed on join otherwise
            if let (Some(section), Some(key)) = (current.as_deref(), last_key.as_deref())
                && let Some(entry) = section_entries(&mut defaults, &mut sections, section).get_mut(key)
            {
                entry.lines.push(String::new());
            }
            continue;
        }

        let indent = raw_line.len() - raw_line.trim_start().len();
        if indent > indent_level
            && let (Some(section), Some(key)) = (current.as_deref(), last_key.as_deref())
        {
            if let Some(entry) = section_entries(&mut defaults, &mut sections, section).get_mut(key) {
                entry.lines.push(line.to_string());
            }
            continue;
        }
        indent_level = indent;

        if line.starts_with('[')
            && let Some(end) = line.rfind(']')
            && end > 1
        {
            let name = &line[1..end];
            if name != DEFAULT_SECTION
                && sections.insert(name.to_string(), RawSection::new()).is_some()
            {
                return Err(DecodeError::ini(
                    line_no,
                    format!("section '{name}' already exists"),
                ));
            }

            current = Some(name.to_string());
            last_key = None;
            continue;
        }

        let Some(section) = current.as_deref() else {
            return Err(DecodeError::ini(
                line_no,
                "key/value pair before any section header",
            ));
        };
        let Some(delimiter) = line.find(['=', ':']) else {
            return Err(DecodeError::ini(line_no, "expected '=' or ':' delimiter"));
        };

        let key = line[..delimiter].trim().to_lowercase();
        if key.is_empty() {
            return Err(DecodeError::ini(line_no, "empty key"));
        }
        let value = line[delimiter + 1..].trim().to_string();

        let entries = section_entries(&mut defaults, &mut sections, section);
        if entries.contains_key(&key) {
            return Err(DecodeError::ini(
                line_no,
                format!("key '{key}' already exists in section '{section}'"),
            ));
        }
        entries.insert(
            key.clone(),
            RawEntry {
                line: line_no,
                lines: vec![value],
            },
        );
        last_key = Some(key);
    }

    Ok((defaults, sections))
}

fn section_entries<'a>(
    defaults: &'a mut RawSection,
    sections: &'a mut BTreeMap<String, RawSection>,
    section: &str,
) -> &'a mut RawSection {
    if section == DEFAULT_SECTION {
        defaults
    } else {
        sections.entry(section.to_string()).or_default()
    }
}

/// Expand `%(name)s` and `%%` in `rest` against `values`, appending to `out`.
fn interpolate(
    mut rest: &str,
    values: &BTreeMap<String, String>,
    depth: usize,
    out: &mut String,
) -> Result<(), String> {
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(format!(
            "references nested deeper than {MAX_INTERPOLATION_DEPTH} levels"
        ));
    }

    while let Some(percent) = rest.find('%') {
        out.push_str(&rest[..percent]);
        rest = &rest[percent..];

        if let Some(tail) = rest.strip_prefix("%%") {
            out.push('%');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%(") {
            let reference = tail
                .find(')')
                .filter(|&close| close > 0 && tail[close + 1..].starts_with('s'));
            let Some(close) = reference else {
                return Err(format!("bad reference {rest:?}"));
            };

            let name = tail[..close].to_lowercase();
            rest = &tail[close + 2..];
            let Some(value) = values.get(&name) else {
                return Err(format!("no key '{name}' to reference"));
            };
            if value.contains('%') {
                interpolate(value, values, depth + 1, out)?;
            } else {
                out.push_str(value);
            }
        } else {
            return Err(format!("'%' must be followed by '%' or '(', found {rest:?}"));
        }
    }

    out.push_str(rest);
    Ok(())
}

/// View a document as INI sections.
///
/// Every top-level value must be a mapping of scalars. Booleans and numbers
/// are rendered as text. Fails with [`ConfigError::Configuration`] when a
/// section is not a mapping or holds a null or collection value.
pub fn sections(document: &ConfigDocument) -> Result<IniSections, ConfigError> {
    let mut out = IniSections::new();

    for (section, value) in document {
        let Some(entries) = value.as_mapping() else {
            return Err(ConfigError::Configuration {
                section: section.clone(),
                message: format!("section value is not a mapping, found {}", value.type_name()),
            });
        };

        let mut rendered = BTreeMap::new();
        for (key, value) in entries {
            let text = match value {
                ConfigValue::String(s) => s.clone(),
                ConfigValue::Bool(b) => b.to_string(),
                ConfigValue::Integer(i) => i.to_string(),
                ConfigValue::Float(f) => f.to_string(),
                other => {
                    return Err(ConfigError::Configuration {
                        section: section.clone(),
                        message: format!(
                            "value for key '{key}' is not a scalar, found {}",
                            other.type_name()
                        ),
                    });
                }
            };
            rendered.insert(key.clone(), text);
        }
        out.insert(section.clone(), rendered);
    }

    Ok(out)
}
