//! User-facing error taxonomy

use crate::data::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    /// Missing or malformed input; the user can correct and resubmit
    #[error("{0}")]
    Validation(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    Credential,

    /// Username already registered
    #[error("Username already exists: {0}")]
    Conflict(String),

    /// Unknown or already used invite code
    #[error("Invalid or already used invite code: {0}")]
    InvalidInvite(String),

    /// Used invite codes are permanent
    #[error("Invite code {0} has been used and cannot be deleted")]
    InviteLocked(String),

    /// Target record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Session missing or lacking the required role
    #[error("Permission denied: {0}")]
    Unauthorized(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Storage failed; the operation was aborted
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),
}

impl PortalError {
    /// Whether the error came from storage rather than from user input
    pub fn is_fatal(&self) -> bool {
        matches!(self, PortalError::Store(_) | PortalError::PasswordHash(_))
    }
}

pub type PortalResult<T> = Result<T, PortalError>;
