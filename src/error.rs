use std::path::PathBuf;

use crate::apriori::ItemId;

/// Failures raised by a transaction store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("failed to encode query parameter: {message}")]
    Encoding { message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite { message: e.to_string() }
    }
}

/// Errors surfaced to callers of the mining and cleaning entry points.
///
/// Nothing is recovered locally: every variant aborts the operation in progress.
#[derive(Debug, thiserror::Error)]
pub enum MiningError {
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("item {item_id} has no catalog entry")]
    NotFound { item_id: ItemId },

    #[error("invalid selection {input:?}: enter 1 for cleaning data or 2 for itemset mining")]
    InvalidSelection { input: String },

    #[error("failed to read cleaning script {}: {source}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MiningError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        MiningError::InvalidConfig { reason: reason.into() }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type MiningResult<T> = Result<T, MiningError>;
