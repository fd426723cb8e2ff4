use std::path::PathBuf;

use thiserror::Error;

use super::model::Dimension;

// ---------------------------------------------------------------------------
// Load-time failures
// ---------------------------------------------------------------------------

/// Fatal errors raised while loading the case table or the county boundaries.
///
/// None of these are retryable: the dashboard cannot render anything without
/// both inputs, so startup stops on the first one.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("{}: {issue}", .path.display())]
    Format { path: PathBuf, issue: FormatIssue },

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What exactly is wrong with a file that exists but cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum FormatIssue {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("boundary collection has no features")]
    NoFeatures,

    #[error("no boundary feature carries a 'NAME' or 'name' property")]
    NoNameKey,

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    /// `row` counts data rows from 1 in every format; a CSV header is not a row.
    #[error("row {row}: {detail}")]
    BadRow { row: usize, detail: String },

    #[error("{0}")]
    Malformed(String),
}

impl DataError {
    pub fn format(path: impl Into<PathBuf>, issue: FormatIssue) -> Self {
        DataError::Format {
            path: path.into(),
            issue,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        Self::format(path, FormatIssue::Malformed(detail.to_string()))
    }

    /// The missing column, when this is a missing-column format error.
    pub fn missing_column(&self) -> Option<&'static str> {
        match self {
            DataError::Format {
                issue: FormatIssue::MissingColumn(col),
                ..
            } => Some(col),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection failures
// ---------------------------------------------------------------------------

/// A filter value that does not occur in the dataset's vocabulary.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("{dimension} '{value}' does not occur in the dataset")]
    OutOfVocabulary { dimension: Dimension, value: String },

    #[error("year '{0}' is not a number")]
    BadYear(String),
}
