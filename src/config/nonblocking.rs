//! Async adapters for tokio hosts.
//!
//! Loading is bounded, blocking file I/O. These wrappers run the synchronous
//! operations on tokio's blocking pool as a single unit, with the same
//! ordering and failure behavior.

use super::aggregate::aggregate;
use super::discovery::SearchDirs;
use super::loader::load_file;
use crate::decode::FormatSet;
use crate::error::{ConfigError, Result};
use crate::value::ConfigDocument;
use std::path::PathBuf;

/// [`load_file`] on the blocking pool.
pub async fn load_file_async(path: impl Into<PathBuf>) -> Result<ConfigDocument> {
    let path = path.into();
    run_blocking(move || load_file(&path)).await
}

/// [`aggregate`] on the blocking pool.
pub async fn aggregate_async(
    dirs: impl Into<SearchDirs>,
    formats: FormatSet,
) -> Result<ConfigDocument> {
    let dirs = dirs.into();
    run_blocking(move || aggregate(dirs, &formats)).await
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ConfigError::Task(e.to_string()))?
}
