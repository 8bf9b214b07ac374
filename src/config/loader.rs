//! Single-file loading and the directory-based [`ConfigLoader`].

use super::aggregate::aggregate;
use super::discovery::{SearchDirs, SourceSet, discover};
use crate::decode::{FormatSet, FormatTag};
use crate::error::{ConfigError, Result};
use crate::value::ConfigDocument;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Environment variable holding the search directories (platform path-list
/// syntax, e.g. `a:b` on Unix).
pub const DIRS_ENV: &str = "CONFSTACK_DIRS";

/// Directory under the user config dir searched when nothing else is given.
pub const APP_DIR: &str = "confstack";

/// Load one config file, choosing the decoder from its extension.
///
/// Fails with [`ConfigError::NotFound`] unless `path` is an existing regular
/// file, then with [`ConfigError::UnsupportedFormat`] unless the extension
/// (compared case-insensitively) is a recognized one.
pub fn load_file(path: impl AsRef<Path>) -> Result<ConfigDocument> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(not_found(path));
    }

    let Some(format) = FormatTag::from_path(path) else {
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        error!("Unsupported config file format '{}' for {:?}", extension, path);
        return Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    };

    read_and_decode(path, format)
}

/// Load one config file with an explicit format, ignoring its extension.
pub fn load_file_as(path: impl AsRef<Path>, format: FormatTag) -> Result<ConfigDocument> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(not_found(path));
    }

    read_and_decode(path, format)
}

/// One full read, then decode. Nothing is cached.
fn read_and_decode(path: &Path, format: FormatTag) -> Result<ConfigDocument> {
    debug!(path = %path.display(), %format, "Loading config file");

    let raw = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            not_found(path)
        } else {
            error!("Failed to read config file {:?}: {}", path, source);
            ConfigError::io(path, source)
        }
    })?;

    format.decoder().decode(&raw).map_err(|source| {
        error!("Failed to read {:?} {} file: {}", path, format, source);
        ConfigError::Decode {
            path: path.to_path_buf(),
            format,
            source,
        }
    })
}

fn not_found(path: &Path) -> ConfigError {
    error!("Config file not found: {:?}", path);
    ConfigError::NotFound {
        path: path.to_path_buf(),
    }
}

/// Loads and merges every config file found in a set of directories.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dirs: SearchDirs,
    formats: FormatSet,
}

impl ConfigLoader {
    /// Search `dirs` for the default formats (YAML, JSON, TOML).
    pub fn new(dirs: impl Into<SearchDirs>) -> Self {
        Self {
            dirs: dirs.into(),
            formats: FormatSet::default(),
        }
    }

    /// Search directories from `CONFSTACK_DIRS`, falling back to
    /// `<user config dir>/confstack`.
    pub fn from_env() -> Self {
        Self::new(search_dirs_from_env())
    }

    /// Restrict or widen the formats considered.
    pub fn with_formats(mut self, formats: FormatSet) -> Self {
        self.formats = formats;
        self
    }

    pub fn dirs(&self) -> &SearchDirs {
        &self.dirs
    }

    pub fn formats(&self) -> &FormatSet {
        &self.formats
    }

    /// List the files that [`load`](Self::load) would merge, in merge order.
    pub fn discover(&self) -> Result<SourceSet> {
        discover(self.dirs.clone(), &self.formats)
    }

    /// Discover, load and deep-merge all config files.
    pub fn load(&self) -> Result<ConfigDocument> {
        aggregate(self.dirs.clone(), &self.formats)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::from_env()
    }
}

fn search_dirs_from_env() -> SearchDirs {
    match std::env::var_os(DIRS_ENV) {
        Some(value) if !value.is_empty() => std::env::split_paths(&value).collect(),
        _ => dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .into_iter()
            .collect::<Vec<PathBuf>>()
            .into(),
    }
}
