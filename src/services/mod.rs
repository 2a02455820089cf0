pub mod auth;
pub mod candidate;
pub mod dashboard;
pub mod feedback;
pub mod interview;
pub mod interviewer;
pub mod notification;
pub mod organisation;
pub mod user;

#[cfg(test)]
mod tests;

use crate::models::interview::{LifecycleError, UnknownResult};
use crate::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => ServiceError::NotFound("Resource not found".to_string()),
            RepositoryError::Duplicate => {
                ServiceError::AlreadyExists("Resource already exists".to_string())
            }
            RepositoryError::VersionConflict { .. } => ServiceError::Conflict(
                "Resource was modified by another request, reload and retry".to_string(),
            ),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<LifecycleError> for ServiceError {
    fn from(error: LifecycleError) -> Self {
        ServiceError::Conflict(error.to_string())
    }
}

impl From<UnknownResult> for ServiceError {
    fn from(error: UnknownResult) -> Self {
        ServiceError::InvalidArgument(error.to_string())
    }
}

pub(crate) fn not_found(kind: &str, id: &str) -> ServiceError {
    ServiceError::NotFound(format!("{} not found with id: {}", kind, id))
}
