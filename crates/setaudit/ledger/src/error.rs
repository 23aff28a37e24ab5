use std::path::PathBuf;

use thiserror::Error;

/// Result type for ledger persistence.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by ledger persistence.
///
/// Identity rejections and undecodable rows are filtered during load and never
/// appear here.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LedgerError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        LedgerError::Csv(err.to_string())
    }
}
