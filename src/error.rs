use thiserror::Error;

/// Errors produced by the store and the roster service.
#[derive(Debug, Error)]
pub enum RosterError {
    /// A required field is missing or malformed, or a reference does not resolve.
    #[error("{0}")]
    Validation(String),

    /// Neither the admin secret nor a known cleaner name was supplied.
    #[error("Invalid name")]
    InvalidCredentials,

    /// A unique field already holds the given value.
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("schema migration failed: {0:#}")]
    Schema(#[from] anyhow::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl RosterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Whether the error was caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidCredentials | Self::Conflict(_)
        )
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
