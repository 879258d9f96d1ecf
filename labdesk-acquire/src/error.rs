//! Error types for the acquisition engine.

use labdesk_model::ValidationError;
use labdesk_types::ItemKey;
use thiserror::Error;

/// Result type for acquisition operations.
pub type AcquireResult<T> = Result<T, AcquireError>;

/// Errors that can occur in acquisition operations. All are recoverable by
/// the caller; none should end the session.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// A required field is missing or malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A provider call failed.
    #[error("network error: {0}")]
    Network(String),

    /// A provider refused the request. Sending it again will not help.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The identity is already present in the owning collection.
    #[error("{key} is already in {collection}")]
    Conflict { collection: String, key: ItemKey },

    /// A provider call did not answer within the configured timeout.
    #[error("operation timed out")]
    Timeout,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AcquireError {
    /// Whether re-issuing the same action may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not be reached or failed internally.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the request.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<ProviderError> for AcquireError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(reason) => Self::Network(reason),
            ProviderError::Rejected(reason) => Self::Rejected(reason),
        }
    }
}
