use std::path::PathBuf;

/// One command requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    /// Import every row of a CSV file into the store
    Import(PathBuf),
    /// Remove every entry from the store
    Delete,
}
