use thiserror::Error;

use crate::catalog::validation::ValidationErrors;
use crate::recipes::RemoteFetchError;
use crate::storage::SlotError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(ValidationErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage write failed: {0}")]
    StorageWrite(#[from] SlotError),
    #[error("remote fetch failed: {0}")]
    RemoteFetch(#[from] RemoteFetchError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ValidationErrors> for ServiceError {
    fn from(e: ValidationErrors) -> Self { Self::Validation(e) }
}
