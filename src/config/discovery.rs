//! Config file discovery across search directories.
//!
//! Each directory contributes its immediate children whose names match an
//! allowed format's extension glob (`*.yaml`, `*.yml`, `*.json`, `*.toml`,
//! `*.ini`, `*.cfg`). Matching mirrors shell globbing: case-sensitive, and
//! hidden entries are not matched. The combined list is sorted by the raw
//! bytes of the full path, which fixes the merge order.

use crate::decode::FormatSet;
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories to search, in the order given.
///
/// Built from a single path or a list of paths. Relative entries are
/// resolved against the current working directory at discovery time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDirs(Vec<PathBuf>);

impl SearchDirs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.0.push(dir.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }
}

impl From<&str> for SearchDirs {
    fn from(dir: &str) -> Self {
        Self(vec![PathBuf::from(dir)])
    }
}

impl From<String> for SearchDirs {
    fn from(dir: String) -> Self {
        Self(vec![PathBuf::from(dir)])
    }
}

impl From<&Path> for SearchDirs {
    fn from(dir: &Path) -> Self {
        Self(vec![dir.to_path_buf()])
    }
}

impl From<PathBuf> for SearchDirs {
    fn from(dir: PathBuf) -> Self {
        Self(vec![dir])
    }
}

impl From<&PathBuf> for SearchDirs {
    fn from(dir: &PathBuf) -> Self {
        Self(vec![dir.clone()])
    }
}

impl From<Vec<PathBuf>> for SearchDirs {
    fn from(dirs: Vec<PathBuf>) -> Self {
        Self(dirs)
    }
}

impl From<&[PathBuf]> for SearchDirs {
    fn from(dirs: &[PathBuf]) -> Self {
        Self(dirs.to_vec())
    }
}

impl From<Vec<&str>> for SearchDirs {
    fn from(dirs: Vec<&str>) -> Self {
        dirs.into_iter().map(PathBuf::from).collect()
    }
}

impl<const N: usize> From<[&str; N]> for SearchDirs {
    fn from(dirs: [&str; N]) -> Self {
        dirs.into_iter().map(PathBuf::from).collect()
    }
}

impl<const N: usize> From<[PathBuf; N]> for SearchDirs {
    fn from(dirs: [PathBuf; N]) -> Self {
        Self(dirs.into())
    }
}

impl<const N: usize> From<[&Path; N]> for SearchDirs {
    fn from(dirs: [&Path; N]) -> Self {
        dirs.into_iter().map(Path::to_path_buf).collect()
    }
}

impl FromIterator<PathBuf> for SearchDirs {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Ordered, absolute config file paths selected for aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet(Vec<PathBuf>);

impl SourceSet {
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.0.iter()
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.0
    }
}

impl<'a> IntoIterator for &'a SourceSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for SourceSet {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Find config files of the allowed formats in each directory.
///
/// Directories that do not exist contribute nothing. The result is sorted by
/// full path bytes and free of duplicates, so the same directory contents
/// always produce the same list.
pub fn discover(dirs: impl Into<SearchDirs>, formats: &FormatSet) -> Result<SourceSet> {
    let dirs = dirs.into();
    let cwd = if dirs.iter().any(|dir| dir.is_relative()) {
        Some(std::env::current_dir().map_err(|e| ConfigError::io(".", e))?)
    } else {
        None
    };
    let mut paths: Vec<PathBuf> = Vec::new();

    for dir in dirs.iter() {
        let dir = match &cwd {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir.to_path_buf(),
        };

        if !dir.is_dir() {
            debug!("No config directory at {:?}, skipping", dir);
            continue;
        }

        collect_matches(&dir, formats, &mut paths)?;
    }

    paths.sort_by(|a, b| {
        a.as_os_str()
            .as_encoded_bytes()
            .cmp(b.as_os_str().as_encoded_bytes())
    });
    paths.dedup();

    debug!("Discovered {} config file(s) for formats [{}]", paths.len(), formats);
    Ok(SourceSet(paths))
}

/// Push the regular files in `dir` whose names match an allowed extension.
fn collect_matches(dir: &Path, formats: &FormatSet, paths: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::io(dir, e))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        let Some((_, extension)) = name.rsplit_once('.') else {
            continue;
        };
        if !formats
            .iter()
            .any(|format| format.extensions().contains(&extension))
        {
            continue;
        }

        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }

    Ok(())
}
