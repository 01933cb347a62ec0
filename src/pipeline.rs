use std::ffi::OsString;
use std::path::Path;

use tracing::{debug, info};

use crate::cli::ArgumentSource;
use crate::config::{ConfigSource, ConnectionTarget};
use crate::csv_reader::EntryReader;
use crate::error::DomainError;
use crate::models::{CommandRequest, MailingListEntry};
use crate::outcome::{self, Failures, Outcome};
use crate::step::try_run;
use crate::store::MailingListStore;

/// Runs single commands against the external collaborators
///
/// Each command is a fail-fast chain of steps: the first failing step ends the
/// command and later steps are never called.
pub struct Pipeline<'a> {
    config: &'a dyn ConfigSource,
    reader: &'a dyn EntryReader,
    store: &'a dyn MailingListStore,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a dyn ConfigSource,
        reader: &'a dyn EntryReader,
        store: &'a dyn MailingListStore,
    ) -> Self {
        Self {
            config,
            reader,
            store,
        }
    }

    /// Run one command
    pub fn run(&self, request: &CommandRequest) -> Outcome<()> {
        let result = match request {
            CommandRequest::Import(path) => self.import(path),
            CommandRequest::Delete => self.delete(),
        };
        if result.is_ok() {
            info!(command = ?request, "command completed");
        }
        result.map_err(Failures::from)
    }

    fn import(&self, path: &Path) -> Result<(), DomainError> {
        self.resolve_config()
            .and_then(|target| self.read_entries(path).map(|entries| (target, entries)))
            .and_then(|(target, entries)| self.insert_all(&target, &entries))
    }

    fn delete(&self) -> Result<(), DomainError> {
        self.resolve_config()
            .and_then(|target| self.delete_all(&target))
    }

    // Resolved again for every command; a failure here only affects the
    // command being run.
    fn resolve_config(&self) -> Result<ConnectionTarget, DomainError> {
        debug!("resolving configuration");
        try_run(|| self.config.read_config(), DomainError::Configuration)
    }

    fn read_entries(&self, path: &Path) -> Result<Vec<MailingListEntry>, DomainError> {
        debug!(path = %path.display(), "reading entries");
        try_run(|| self.reader.read_entries(path), DomainError::FileAccess)
    }

    fn insert_all(
        &self,
        target: &ConnectionTarget,
        entries: &[MailingListEntry],
    ) -> Result<(), DomainError> {
        debug!(
            database = %target.database.display(),
            count = entries.len(),
            "inserting entries"
        );
        try_run(|| self.store.insert_all(target, entries), DomainError::StoreUpdate)
    }

    fn delete_all(&self, target: &ConnectionTarget) -> Result<(), DomainError> {
        debug!(database = %target.database.display(), "deleting all entries");
        try_run(|| self.store.delete_all(target), DomainError::StoreUpdate)
    }
}

/// Parse the command line and run every requested command
///
/// A parsing failure stops everything and is the only error returned.
/// Otherwise every command runs, in order, even after another one failed, and
/// the failures of all of them are returned together.
pub fn run_commands(
    argv: &[OsString],
    arguments: &dyn ArgumentSource,
    pipeline: &Pipeline<'_>,
) -> Outcome<()> {
    let requests = try_run(|| arguments.parse_args(argv), DomainError::ArgumentParsing)?;
    debug!(count = requests.len(), "running commands");

    outcome::collect(requests.iter().map(|request| pipeline.run(request))).map(|_| ())
}
