#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use mailing_list::cli::ArgumentSource;
use mailing_list::config::{ConfigSource, ConnectionTarget};
use mailing_list::csv_reader::EntryReader;
use mailing_list::models::{CommandRequest, Email, MailingListEntry, Name};

/// Helper to create an entry from plain strings
pub fn make_entry(email: &str, name: &str) -> MailingListEntry {
    MailingListEntry::new(Email::new(email), Name::new(name))
}

/// Build an argv vector with the program name prepended
pub fn argv(args: &[&str]) -> Vec<OsString> {
    std::iter::once("mailing-list")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

/// Write a TOML configuration pointing at `database` and return its path
pub fn write_config(dir: &Path, database: &str) -> PathBuf {
    let path = dir.join("mailing-list.toml");
    fs::write(&path, format!("[store]\ndatabase = \"{}\"\n", database)).unwrap();
    path
}

/// Read the error log, one record per element
pub fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|contents| contents.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Configuration source that counts calls and fails on chosen calls (1-based)
pub struct FakeConfig {
    target: ConnectionTarget,
    fail_on: Vec<usize>,
    message: String,
    calls: Cell<usize>,
}

impl FakeConfig {
    pub fn ok() -> Self {
        Self::failing_on(&[], "")
    }

    pub fn failing(message: &str) -> Self {
        Self::failing_on(&(1..=64).collect::<Vec<_>>(), message)
    }

    pub fn failing_on(calls: &[usize], message: &str) -> Self {
        Self {
            target: ConnectionTarget::new("memory.db"),
            fail_on: calls.to_vec(),
            message: message.to_string(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ConfigSource for FakeConfig {
    fn read_config(&self) -> Result<ConnectionTarget> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if self.fail_on.contains(&call) {
            Err(anyhow!("{}", self.message))
        } else {
            Ok(self.target.clone())
        }
    }
}

/// Entry reader serving files from memory
#[derive(Default)]
pub struct FakeReader {
    files: HashMap<PathBuf, Vec<MailingListEntry>>,
    calls: Cell<usize>,
}

impl FakeReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, entries: Vec<MailingListEntry>) -> Self {
        self.files.insert(PathBuf::from(path), entries);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl EntryReader for FakeReader {
    fn read_entries(&self, path: &Path) -> Result<Vec<MailingListEntry>> {
        self.calls.set(self.calls.get() + 1);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("Failed to open input file '{}'", path.display()))
    }
}

/// Argument source returning fixed requests, or failing
pub struct FakeArguments {
    requests: Option<Vec<CommandRequest>>,
    calls: Cell<usize>,
}

impl FakeArguments {
    pub fn returning(requests: Vec<CommandRequest>) -> Self {
        Self {
            requests: Some(requests),
            calls: Cell::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            requests: None,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ArgumentSource for FakeArguments {
    fn parse_args(&self, _argv: &[OsString]) -> Result<Vec<CommandRequest>> {
        self.calls.set(self.calls.get() + 1);
        self.requests
            .clone()
            .ok_or_else(|| anyhow!("unrecognized command"))
    }
}

/// Reader that panics, standing in for a collaborator bug
pub struct PanickingReader;

impl EntryReader for PanickingReader {
    fn read_entries(&self, _path: &Path) -> Result<Vec<MailingListEntry>> {
        panic!("reader bug")
    }
}

pub fn import(path: &str) -> CommandRequest {
    CommandRequest::Import(PathBuf::from(path))
}
