//! Aggregation: discover, load and fold into one document.

use super::discovery::{SearchDirs, SourceSet, discover};
use super::loader::load_file;
use super::merge::merge_documents;
use crate::decode::FormatSet;
use crate::error::Result;
use crate::value::ConfigDocument;
use tracing::{debug, trace};

/// Discover config files in `dirs` and deep-merge them in path order.
///
/// Any load failure aborts the whole aggregation; no partial result is
/// returned. Directories that do not exist yield an empty document.
pub fn aggregate(dirs: impl Into<SearchDirs>, formats: &FormatSet) -> Result<ConfigDocument> {
    let sources = discover(dirs, formats)?;
    aggregate_sources(&sources)
}

/// Load and deep-merge an already discovered source set, in its order.
pub fn aggregate_sources(sources: &SourceSet) -> Result<ConfigDocument> {
    debug!("Aggregating {} config file(s)", sources.len());

    let mut result = ConfigDocument::new();
    for path in sources {
        let document = load_file(path)?;
        trace!("Merging {:?} ({} top-level keys)", path, document.len());
        result = merge_documents(result, document);
    }

    Ok(result)
}
