//! Error type shared by every use case.
//!
//! Repository failures that the caller caused (missing rows, duplicates,
//! malformed input) are lifted into their own variants so the API layer can
//! map them without looking inside `RepositoryError`.

use thiserror::Error;

use crate::application::ports::{HashError, RepositoryError};
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    BadInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for UseCaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => UseCaseError::NotFound(msg),
            RepositoryError::Duplicate(msg) => UseCaseError::Duplicate(msg),
            RepositoryError::BadInput(msg) => UseCaseError::BadInput(msg),
            other => UseCaseError::Repository(other),
        }
    }
}

impl From<DomainError> for UseCaseError {
    fn from(err: DomainError) -> Self {
        UseCaseError::BadInput(err.to_string())
    }
}

impl From<HashError> for UseCaseError {
    fn from(err: HashError) -> Self {
        UseCaseError::Internal(err.to_string())
    }
}
