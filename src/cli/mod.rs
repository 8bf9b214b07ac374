//! CLI command definitions for confstack
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use crate::decode::{FormatSet, FormatTag};
use crate::logging::LogTarget;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Load, discover and merge configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: LogTarget,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a single config file and print it as JSON
    Load(LoadArgs),

    /// List the config files a merge would read, in merge order
    Discover(DirsArgs),

    /// Deep-merge every config file in the directories and print the result as JSON
    Merge(DirsArgs),
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Config file to load
    pub file: PathBuf,

    /// Decode as this format instead of guessing from the extension
    #[arg(long = "as", value_name = "FORMAT")]
    pub format: Option<FormatTag>,
}

#[derive(Args, Debug)]
pub struct DirsArgs {
    /// Directories to search (default: $CONFSTACK_DIRS, then the user config dir)
    pub dirs: Vec<PathBuf>,

    /// Comma-separated formats to include, or "all"
    #[arg(short, long, default_value = "yaml,json,toml")]
    pub formats: FormatSet,
}
