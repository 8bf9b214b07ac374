//! confstack command-line tool
//!
//! Inspects what the library would load: a single decoded file, the ordered
//! list of discovered files, or the deep-merged result.

use anyhow::Result;
use clap::Parser;
use confstack::cli::{Cli, Command, DirsArgs, LoadArgs};
use confstack::config::{ConfigLoader, load_file, load_file_as};
use confstack::error::{ConfigError, ErrorReport};
use confstack::logging::init_logging;
use std::process::ExitCode;
use tracing::debug;

/// What a subcommand produced.
enum Output {
    Document(confstack::ConfigDocument),
    Paths(confstack::config::SourceSet),
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log, cli.verbose)?;

    let outcome = match cli.command {
        Command::Load(args) => run_load(args).map(Output::Document),
        Command::Discover(args) => loader_for(args).discover().map(Output::Paths),
        Command::Merge(args) => loader_for(args).load().map(Output::Document),
    };

    match outcome {
        Ok(Output::Document(document)) => {
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(ExitCode::SUCCESS)
        }
        Ok(Output::Paths(sources)) => {
            for path in &sources {
                println!("{}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string_pretty(&ErrorReport::from(&err))?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn loader_for(args: DirsArgs) -> ConfigLoader {
    let loader = if args.dirs.is_empty() {
        ConfigLoader::from_env()
    } else {
        ConfigLoader::new(args.dirs)
    };
    debug!("Search directories: {:?}", loader.dirs());
    loader.with_formats(args.formats)
}

fn run_load(args: LoadArgs) -> Result<confstack::ConfigDocument, ConfigError> {
    match args.format {
        Some(format) => load_file_as(&args.file, format),
        None => load_file(&args.file),
    }
}
