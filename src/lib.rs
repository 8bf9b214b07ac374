//! confstack: multi-format configuration loading
//!
//! Reads YAML, JSON, TOML and INI files into one normalized value model,
//! discovers config files across directories, and deep-merges them in a
//! deterministic order.

pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod logging;
pub mod value;

pub use config::{ConfigLoader, aggregate, discover, load_file, merge};
pub use decode::{FormatSet, FormatTag};
pub use error::{ConfigError, DecodeError, Result};
pub use value::{ConfigDocument, ConfigValue, Mapping};
