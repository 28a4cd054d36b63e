//! Error types.
//!
//! Every failure in this crate is recoverable: the caller retries with
//! corrected input. There is no fatal error class.

use crate::import::RowError;
use crate::models::RecordId;
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by stores, the scheduler, imports, and settings I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A field failed syntactic validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A catalog entry with the same (part, setup, machine) already exists.
    #[error("entry already exists (id {existing_id})")]
    DuplicateEntry { existing_id: RecordId },

    /// No record with the given id.
    #[error("record {id} not found")]
    NotFound { id: RecordId },

    /// Scheduler re-check of an invariant the validator should have enforced.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Strict bulk load rejected the whole batch.
    #[error("import rejected: {} row(s) failed", errors.len())]
    ImportRejected { errors: Vec<RowError> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}
