//! Configuration loading and merging.
//!
//! Builds one composite configuration from many files:
//! 1. **Discovery** - list config files in the search directories, sorted by
//!    full path
//! 2. **Loading** - decode each file with the decoder for its extension
//! 3. **Merging** - fold the documents together in discovery order
//!
//! ## Merge Strategy
//! - Mappings: deep merge key by key, later files win on conflicts
//! - Sequences: replaced entirely by the later file, never concatenated
//! - Scalars and null: the later file's value wins
//!
//! Because the order is the sorted path order, `10-base.yaml` is always
//! overridden by `20-local.yaml`, whatever order the filesystem lists them in.
//!
//! ## Environment Variables
//! - `CONFSTACK_DIRS` - Search directories for [`ConfigLoader::from_env`]
//!   (default: `<user config dir>/confstack`)

mod aggregate;
mod discovery;
mod loader;
mod merge;
pub mod nonblocking;

pub use aggregate::{aggregate, aggregate_sources};
pub use discovery::{SearchDirs, SourceSet, discover};
pub use loader::{APP_DIR, ConfigLoader, DIRS_ENV, load_file, load_file_as};
pub use merge::{merge, merge_all, merge_documents};
pub use nonblocking::{aggregate_async, load_file_async};
