use std::env;
use std::io;
use std::process::ExitCode;

use mailing_list::cli::{self, ClapArguments};
use mailing_list::config::TomlConfig;
use mailing_list::csv_reader::CsvEntryReader;
use mailing_list::report::ErrorLog;
use mailing_list::store::SqliteStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log to stderr; stdout carries the report.
///
/// Level comes from `RUST_LOG`, defaulting to warnings only.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mailing_list=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let argv: Vec<_> = env::args_os().collect();
    cli::exit_on_informational(&argv);

    let config = TomlConfig::from_env();
    tracing::debug!(config = %config.path().display(), "starting");

    let status = mailing_list::run(
        &argv,
        &ClapArguments,
        &config,
        &CsvEntryReader,
        &SqliteStore,
        io::stdout().lock(),
        ErrorLog::default(),
    );

    ExitCode::from(status)
}
