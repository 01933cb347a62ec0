use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::models::{Email, MailingListEntry, Name};

/// Column order of the input file
pub const CSV_HEADERS: [&str; 2] = ["Email", "Name"];

/// Source of entries to import
pub trait EntryReader {
    fn read_entries(&self, path: &Path) -> Result<Vec<MailingListEntry>>;
}

/// Reads `Email,Name` CSV files from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvEntryReader;

impl EntryReader for CsvEntryReader {
    fn read_entries(&self, path: &Path) -> Result<Vec<MailingListEntry>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file '{}'", path.display()))?;
        parse_entries(file).with_context(|| format!("Failed to read entries from '{}'", path.display()))
    }
}

/// CSV record as it appears on disk
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Name")]
    name: String,
}

impl From<CsvRow> for MailingListEntry {
    fn from(row: CsvRow) -> Self {
        MailingListEntry::new(Email::new(row.email), Name::new(row.name))
    }
}

/// Parse `Email,Name` records from any reader, keeping file order
///
/// The header must be exactly `Email,Name` and every record must have two
/// fields; anything else fails the whole read.
pub fn parse_entries<R: Read>(reader: R) -> Result<Vec<MailingListEntry>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().context("Missing CSV header row")?;
    ensure!(
        headers.iter().eq(CSV_HEADERS),
        "Expected CSV header '{}', found '{}'",
        CSV_HEADERS.join(","),
        headers.iter().collect::<Vec<_>>().join(",")
    );

    let mut entries = Vec::new();
    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let row = result.with_context(|| format!("Malformed row at line {}", index + 2))?;
        entries.push(MailingListEntry::from(row));
    }

    Ok(entries)
}
