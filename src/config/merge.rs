//! Deep merge of configuration values.
//!
//! Mappings are merged key by key, recursively. Everything else, sequences
//! included, is replaced by the overlay. Sequences are never concatenated
//! or merged element-wise.

use crate::value::{ConfigDocument, ConfigValue};

/// Deep merge two values, with `overlay` taking precedence over `base`.
///
/// - Mappings are merged recursively: keys in overlay override keys in base,
///   keys present on one side only are kept as-is
/// - Sequences, strings, numbers, booleans and nulls are replaced entirely
/// - A null overlay replaces the base value (null is a value, not "unset")
///
/// Both inputs are consumed; clone first, or use [`ConfigValue::merged`], to
/// keep them.
///
/// # Example
/// ```
/// use confstack::config::merge;
/// use confstack::ConfigValue;
/// use serde_json::json;
///
/// let base = ConfigValue::from(json!({
///     "server": { "port": 8080, "host": "localhost" },
///     "features": ["a", "b"]
/// }));
/// let overlay = ConfigValue::from(json!({
///     "server": { "port": 9000 },
///     "features": ["c"]
/// }));
/// let result = merge(base, overlay);
/// assert_eq!(result, ConfigValue::from(json!({
///     "server": { "port": 9000, "host": "localhost" },
///     "features": ["c"]
/// })));
/// ```
pub fn merge(base: ConfigValue, overlay: ConfigValue) -> ConfigValue {
    match (base, overlay) {
        (ConfigValue::Mapping(base_map), ConfigValue::Mapping(overlay_map)) => {
            ConfigValue::Mapping(merge_documents(base_map, overlay_map))
        }
        // Any other case: overlay replaces base entirely
        (_, overlay) => overlay,
    }
}

/// Deep merge two documents, with `overlay` taking precedence.
pub fn merge_documents(mut base: ConfigDocument, overlay: ConfigDocument) -> ConfigDocument {
    for (key, overlay_value) in overlay {
        let merged_value = match base.remove(&key) {
            Some(base_value) => merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged_value);
    }
    base
}

/// Merge multiple values in order, with later values taking precedence.
///
/// Equivalent to folding [`merge`] over the list, starting from an empty
/// mapping.
pub fn merge_all(values: impl IntoIterator<Item = ConfigValue>) -> ConfigValue {
    values
        .into_iter()
        .fold(ConfigValue::empty_mapping(), merge)
}
