//! Error taxonomy of the link core.
//!
//! | Kind                    | Raised by                          | Retry           |
//! |-------------------------|------------------------------------|-----------------|
//! | `InvalidInput`          | [`LinkError::InvalidInput`]        | no              |
//! | `RandomnessUnavailable` | [`CreationError`]                  | whole call      |
//! | `CacheWriteFailed`      | [`StoreError`] / [`CreationError`] | whole call      |
//! | `DurableStoreFailure`   | [`StoreError`] / [`LinkError`]     | caller decides  |
//! | `LinkNotFound`          | [`LinkError::LinkNotFound`]        | no              |
//! | `CreationFailed`        | [`LinkError::CreationFailed`]      | per cause       |

use crate::domain::repositories::RepositoryError;
use crate::infrastructure::cache::CacheError;
use crate::utils::code_generator::CodeGenError;

/// Failures of the two-tier write path.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cache write failed: {0}")]
    CacheWriteFailed(#[source] CacheError),

    #[error("durable store failure: {0}")]
    DurableStoreFailure(#[source] RepositoryError),
}

/// Cause of a failed link creation.
#[derive(Debug, thiserror::Error)]
pub enum CreationError {
    #[error(transparent)]
    RandomnessUnavailable(#[from] CodeGenError),

    #[error("cache write failed: {0}")]
    CacheWriteFailed(#[source] CacheError),

    #[error("durable store failure: {0}")]
    DurableStoreFailure(#[source] RepositoryError),
}

impl From<StoreError> for CreationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CacheWriteFailed(e) => Self::CacheWriteFailed(e),
            StoreError::DurableStoreFailure(e) => Self::DurableStoreFailure(e),
        }
    }
}

/// Errors surfaced by [`crate::application::services::LinkService`].
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to create link: {0}")]
    CreationFailed(#[from] CreationError),

    #[error("durable store failure: {0}")]
    DurableStoreFailure(#[from] RepositoryError),

    #[error("link not found: {0}")]
    LinkNotFound(String),
}

impl LinkError {
    /// Returns true when retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CreationFailed(_) | Self::DurableStoreFailure(_)
        )
    }
}
