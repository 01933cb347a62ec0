use std::cell::{Cell, RefCell};
use std::fs;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::config::ConnectionTarget;
use crate::models::{Email, MailingListEntry, Name};

/// Data store holding the mailing list
///
/// Both operations are all-or-nothing: a failed call leaves the store as it
/// was before the call. The connection target is passed on every call so an
/// implementation never holds global connection state.
///
/// # Example
///
/// ```
/// use mailing_list::config::ConnectionTarget;
/// use mailing_list::models::{Email, MailingListEntry, Name};
/// use mailing_list::store::{InMemoryStore, MailingListStore};
///
/// let store = InMemoryStore::new();
/// let target = ConnectionTarget::new("memory");
///
/// let entry = MailingListEntry::new(Email::new("a@x.com"), Name::new("A"));
/// store.insert_all(&target, &[entry.clone()]).unwrap();
/// assert_eq!(store.entries(), vec![entry]);
///
/// store.delete_all(&target).unwrap();
/// assert!(store.entries().is_empty());
/// ```
pub trait MailingListStore {
    /// Insert every entry, in order, in a single unit
    fn insert_all(&self, target: &ConnectionTarget, entries: &[MailingListEntry]) -> Result<()>;

    /// Remove every stored entry
    fn delete_all(&self, target: &ConnectionTarget) -> Result<()>;
}

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS mailing_list (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    name  TEXT NOT NULL
)";

/// SQLite-backed store
///
/// Opens a connection to `target.database` per call and creates the
/// `mailing_list` table on first use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteStore;

impl SqliteStore {
    fn connect(target: &ConnectionTarget) -> Result<Connection> {
        if let Some(parent) = target.database.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
            }
        }

        let conn = Connection::open(&target.database).with_context(|| {
            format!("Failed to open database '{}'", target.database.display())
        })?;
        conn.execute(CREATE_TABLE, [])
            .context("Failed to create mailing_list table")?;
        Ok(conn)
    }

    /// Read back every stored entry in insertion order
    pub fn entries(&self, target: &ConnectionTarget) -> Result<Vec<MailingListEntry>> {
        let conn = Self::connect(target)?;
        let mut stmt = conn.prepare("SELECT email, name FROM mailing_list ORDER BY id")?;
        let rows = stmt.query_map([], entry_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read mailing_list rows")
    }
}

/// Column values for an `INSERT`, in `(email, name)` order
fn entry_to_row(entry: &MailingListEntry) -> (&str, &str) {
    (entry.email().as_str(), entry.name().as_str())
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<MailingListEntry> {
    let email: String = row.get(0)?;
    let name: String = row.get(1)?;
    Ok(MailingListEntry::new(Email::new(email), Name::new(name)))
}

impl MailingListStore for SqliteStore {
    fn insert_all(&self, target: &ConnectionTarget, entries: &[MailingListEntry]) -> Result<()> {
        let mut conn = Self::connect(target)?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO mailing_list (email, name) VALUES (?1, ?2)")?;
            for entry in entries {
                let (email, name) = entry_to_row(entry);
                stmt.execute(params![email, name])
                    .with_context(|| format!("Failed to insert entry for '{email}'"))?;
            }
        }
        // Dropping an uncommitted transaction rolls it back.
        tx.commit().context("Failed to commit import")?;
        Ok(())
    }

    fn delete_all(&self, target: &ConnectionTarget) -> Result<()> {
        let conn = Self::connect(target)?;
        conn.execute("DELETE FROM mailing_list", [])
            .context("Failed to delete mailing list entries")?;
        Ok(())
    }
}

/// In-memory test double for the store
///
/// Counts calls so tests can check which operations ran, and can be told to
/// fail every call.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RefCell<Vec<MailingListEntry>>,
    insert_calls: Cell<usize>,
    delete_calls: Cell<usize>,
    failure: Option<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<MailingListEntry> {
        self.entries.borrow().clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.get()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.get()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

impl MailingListStore for InMemoryStore {
    fn insert_all(&self, _target: &ConnectionTarget, entries: &[MailingListEntry]) -> Result<()> {
        self.insert_calls.set(self.insert_calls.get() + 1);
        self.check()?;
        self.entries.borrow_mut().extend_from_slice(entries);
        Ok(())
    }

    fn delete_all(&self, _target: &ConnectionTarget) -> Result<()> {
        self.delete_calls.set(self.delete_calls.get() + 1);
        self.check()?;
        self.entries.borrow_mut().clear();
        Ok(())
    }
}
