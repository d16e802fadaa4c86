//! Centralised error types used across the crate.

use std::{fmt, io, path::PathBuf};

use crate::core::color::ColorError;

/// Rejected user input. Never fatal: the menu re-prompts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("`{0}` is not a whole number")]
    NotANumber(String),
    #[error("score {0} is outside 1-10")]
    OutOfRange(i64),
}

/// Why a single CSV record could not become a `MoodEntry`.
#[derive(Debug)]
pub enum ParseErrorKind {
    Io(io::Error),
    InvalidUtf8,
    UnterminatedQuote,
    MissingColumn(&'static str),
    BadScore(String),
    BadTimestamp(String),
}

/// Per-record parse failure, tagged with the line the record starts on.
#[derive(Debug)]
pub struct ParseCsvError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseCsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::Io(e) => write!(f, "I/O error on line {}: {}", self.line, e),
            ParseErrorKind::InvalidUtf8 => write!(f, "line {}: not valid UTF-8", self.line),
            ParseErrorKind::UnterminatedQuote => {
                write!(f, "line {}: quoted field never closed", self.line)
            }
            ParseErrorKind::MissingColumn(col) => {
                write!(f, "line {}: missing `{}` column", self.line, col)
            }
            ParseErrorKind::BadScore(text) => {
                write!(f, "line {}: invalid score '{}'", self.line, text)
            }
            ParseErrorKind::BadTimestamp(text) => {
                write!(f, "line {}: invalid timestamp '{}'", self.line, text)
            }
        }
    }
}
impl std::error::Error for ParseCsvError {}

/// Failures of the CSV log itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: ParseCsvError,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Aggregation argument faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("window must cover at least one day, got {0}")]
    NonPositiveWindow(i64),
    #[error("window of {0} days exceeds the 36500 day limit")]
    WindowTooLarge(i64),
}

/// Chart export failures.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The exporter was not compiled in.
    #[error("{0} export is not available in this build")]
    Unavailable(&'static str),
    #[error("no data to export")]
    EmptyData,
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("chart rendering failed: {0}")]
    Render(String),
}

/// Precise configuration faults.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid colour: {0}")]
    Color(#[from] ColorError),
    #[error("data directory path is empty")]
    EmptyDataDir,
}

/// Top-level error type bubbled up by public APIs.
#[derive(Debug, thiserror::Error)]
pub enum MoodError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}
