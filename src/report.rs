use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::error::DomainError;
use crate::outcome::Outcome;

/// Durable error log, relative to the working directory
pub const DEFAULT_LOG_PATH: &str = "mailing-list-errors.log";

pub const SUCCESS_EXIT_CODE: u8 = 0;

/// Exit status for any failure, whatever its kind
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Append-only log of failures
///
/// One record per line: `[timestamp] [ERROR] [kind] <cause detail>`. The file
/// is opened, written and closed for each record.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, error: &DomainError) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", log_record(error))?;
        file.flush()
    }
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

/// Format one log line (without the trailing newline)
pub fn log_record(error: &DomainError) -> String {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    // Keep each record on one line.
    let detail = error.cause().description().replace(['\r', '\n'], " ");
    format!("[{timestamp}] [ERROR] [{}] {detail}", error.kind())
}

/// User-facing message for an error
pub fn user_message(error: &DomainError) -> String {
    match error {
        DomainError::StoreUpdate(_) => "FAILURE: Could not update the mailing list store".to_string(),
        DomainError::FileAccess(_) => "FAILURE: Could not read the input file".to_string(),
        DomainError::ArgumentParsing(cause) => {
            // One report line per error.
            let message = cause.message().replace(['\r', '\n'], " ");
            format!("FAILURE: Could not parse arguments: {}", message.trim())
        }
        DomainError::Configuration(_) => "FAILURE: Could not load the configuration".to_string(),
    }
}

/// Reports the final outcome to the user and the error log
pub struct Reporter<W: Write> {
    out: W,
    log: ErrorLog,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, log: ErrorLog) -> Self {
        Self { out, log }
    }

    /// Print and log the outcome, returning the process exit status
    ///
    /// Neither a failing log nor a failing output stream changes the result.
    pub fn report(&mut self, outcome: &Outcome<()>) -> u8 {
        match outcome {
            Ok(()) => {
                self.print("SUCCESS");
                SUCCESS_EXIT_CODE
            }
            Err(failures) => {
                for error in failures {
                    self.print(&user_message(error));
                    if let Err(err) = self.log.append(error) {
                        debug!(path = %self.log.path().display(), error = %err, "could not write error log");
                    }
                }
                FAILURE_EXIT_CODE
            }
        }
    }

    fn print(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{line}") {
            debug!(error = %err, "could not write report");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
