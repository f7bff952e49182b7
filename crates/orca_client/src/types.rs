use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use orca_core::{StateStore, ValidationError};
use thiserror::Error;

/// Store shared between the scheduler, the mutation coordinator and the UI.
pub type SharedStore = Arc<Mutex<StateStore>>;

pub fn shared_store(store: StateStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Locks the store, recovering from a listener that panicked mid-update.
pub fn lock_store(store: &SharedStore) -> MutexGuard<'_, StateStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.kind, FailureKind::Transport | FailureKind::Timeout)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(FailureKind::Validation, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Request could not be sent or the connection dropped.
    Transport,
    Timeout,
    /// Response received with a non-success status; the message is the status text.
    HttpStatus(u16),
    /// Success status but the body is not a valid status document.
    Decode,
    /// Rejected locally before any request was made.
    Validation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::Validation => write!(f, "validation error"),
        }
    }
}
