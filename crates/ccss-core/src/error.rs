//! Input errors: anything that makes a run abort before output is written.

use std::path::PathBuf;

pub type Result<T, E = CcssError> = std::result::Result<T, E>;

/// Fatal errors raised while reading or shaping input data.
///
/// Row-level problems are never reported through this type; they are
/// collected as [`crate::diagnostics::Diagnostic`] values instead.
#[derive(Debug, thiserror::Error)]
pub enum CcssError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV file is empty or has no header")]
    MissingHeader,
    #[error("CSV file must contain {} column(s); missing: {}", required.join(", "), missing.join(", "))]
    MissingColumns {
        required: Vec<String>,
        missing: Vec<String>,
    },
    #[error("CSV header has {found} columns; expected exactly {expected}")]
    HeaderWidth { expected: usize, found: usize },
    #[error("CSV file contains only a header row")]
    EmptyTable,
    #[error("line {line}: row has {found} fields but the header has {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("document does not contain a '{0}' list or the list is empty")]
    MissingRootKey(String),
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error("record {index} contains field '{field}' not present in the header")]
    UnexpectedField { index: usize, field: String },
}

impl CcssError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
