pub mod cli;
pub mod config;
pub mod csv_reader;
pub mod error;
pub mod models;
pub mod outcome;
pub mod pipeline;
pub mod report;
pub mod step;
pub mod store;

use std::ffi::OsString;
use std::io::Write;

use cli::ArgumentSource;
use config::ConfigSource;
use csv_reader::EntryReader;
use pipeline::{run_commands, Pipeline};
use report::{ErrorLog, Reporter};
use store::MailingListStore;

/// Run the commands in `argv` and report the result to `out` and `log`
///
/// Returns the process exit status.
pub fn run<W: Write>(
    argv: &[OsString],
    arguments: &dyn ArgumentSource,
    config: &dyn ConfigSource,
    reader: &dyn EntryReader,
    store: &dyn MailingListStore,
    out: W,
    log: ErrorLog,
) -> u8 {
    let pipeline = Pipeline::new(config, reader, store);
    let outcome = run_commands(argv, arguments, &pipeline);

    Reporter::new(out, log).report(&outcome)
}
