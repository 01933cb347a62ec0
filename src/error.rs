use std::fmt;

use thiserror::Error;

/// Failure surfaces a command can fail on.
///
/// The set is closed: every failure the pipeline reports is one of these four,
/// and no kind is ever derived from another.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("store update failed: {0}")]
    StoreUpdate(Cause),

    #[error("file access failed: {0}")]
    FileAccess(Cause),

    #[error("argument parsing failed: {0}")]
    ArgumentParsing(Cause),

    #[error("configuration failed: {0}")]
    Configuration(Cause),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::StoreUpdate(_) => ErrorKind::StoreUpdate,
            DomainError::FileAccess(_) => ErrorKind::FileAccess,
            DomainError::ArgumentParsing(_) => ErrorKind::ArgumentParsing,
            DomainError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    pub fn cause(&self) -> &Cause {
        match self {
            DomainError::StoreUpdate(cause)
            | DomainError::FileAccess(cause)
            | DomainError::ArgumentParsing(cause)
            | DomainError::Configuration(cause) => cause,
        }
    }
}

/// Discriminant of a [`DomainError`], used in reports and log records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StoreUpdate,
    FileAccess,
    ArgumentParsing,
    Configuration,
}

impl ErrorKind {
    /// Name written to the durable log
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::StoreUpdate => "StoreUpdateFailure",
            ErrorKind::FileAccess => "FileAccessFailure",
            ErrorKind::ArgumentParsing => "ArgumentParsingFailure",
            ErrorKind::Configuration => "ConfigurationFailure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque description of the fault behind a [`DomainError`]
///
/// `message` is the fault's own text, kept verbatim. `detail` holds the full
/// error chain when the fault wrapped other errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    message: String,
    detail: Option<String>,
}

impl Cause {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Full description: the error chain if there is one, otherwise the message
    pub fn description(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.message)
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<anyhow::Error> for Cause {
    fn from(err: anyhow::Error) -> Self {
        let cause = Cause::new(err.to_string());
        if err.chain().count() > 1 {
            cause.with_detail(format!("{err:#}"))
        } else {
            cause
        }
    }
}
