/*
    errors.rs - Error types for the data access layer

    Every variant is fatal for the operation that hit it: nothing is retried
    and no partial write is attempted afterwards.
*/

use crate::model::InviteError;
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored value could not be decoded
    #[error("Corrupted data under key {key:?}: {source}")]
    Corrupted {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Sequential code generator ran out of 3-digit values
    #[error("Invite code generation failed: {0}")]
    CodeGeneration(#[from] InviteError),
}

pub type StoreResult<T> = Result<T, StoreError>;
