use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, ColorChoice, CommandFactory, FromArgMatches, Parser};

use crate::models::CommandRequest;

/// Source of the commands to run
pub trait ArgumentSource {
    fn parse_args(&self, argv: &[OsString]) -> Result<Vec<CommandRequest>>;
}

/// Command-line flags
///
/// Both flags may repeat and mix; commands run in the order given.
#[derive(Debug, Parser)]
#[command(
    name = "mailing-list",
    version,
    about = "Import mailing-list entries from CSV files or clear the store"
)]
pub struct Cli {
    /// Import entries from a CSV file with `Email,Name` columns
    #[arg(long = "import", value_name = "PATH", action = ArgAction::Append)]
    pub imports: Vec<PathBuf>,

    /// Delete every stored entry
    #[arg(
        long = "delete",
        value_name = "SCOPE",
        num_args = 0..=1,
        default_missing_value = "all",
        value_parser = ["all"],
        action = ArgAction::Append
    )]
    pub deletes: Vec<String>,
}

impl Cli {
    fn command_without_color() -> clap::Command {
        Cli::command().color(ColorChoice::Never)
    }
}

/// Parses `--import <PATH>` and `--delete` with clap
#[derive(Debug, Default, Clone, Copy)]
pub struct ClapArguments;

impl ArgumentSource for ClapArguments {
    fn parse_args(&self, argv: &[OsString]) -> Result<Vec<CommandRequest>> {
        let matches = Cli::command_without_color()
            .try_get_matches_from(argv)
            .map_err(|err| {
                let summary = clap_summary(&err);
                anyhow::Error::new(err).context(summary)
            })?;
        let cli = Cli::from_arg_matches(&matches).context("Failed to read parsed arguments")?;

        let import_indices = matches.indices_of("imports").into_iter().flatten();
        let delete_indices = matches.indices_of("deletes").into_iter().flatten();

        let mut ordered: Vec<(usize, CommandRequest)> = import_indices
            .zip(cli.imports)
            .map(|(index, path)| (index, CommandRequest::Import(path)))
            .chain(delete_indices.map(|index| (index, CommandRequest::Delete)))
            .collect();
        ordered.sort_by_key(|(index, _)| *index);

        if ordered.is_empty() {
            bail!("no command given; expected --import <PATH> or --delete");
        }

        Ok(ordered.into_iter().map(|(_, request)| request).collect())
    }
}

/// First line of a clap error without its `error: ` prefix
///
/// The full rendering, usage included, stays in the error chain.
fn clap_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("invalid arguments");
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}

/// Print help or version and exit if either was requested
///
/// Runs before the pipeline so `--help` is not reported as a parsing failure.
pub fn exit_on_informational(argv: &[OsString]) {
    if let Err(err) = Cli::command().try_get_matches_from(argv) {
        if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            err.exit();
        }
    }
}
