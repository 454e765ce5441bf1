use crate::types::DbId;

/// Domain-level failures raised by the grading and progress rules.
///
/// Every foreseeable condition (bad input, missing row, insufficient rank) has
/// its own variant so the HTTP layer can map it to a specific status. Only
/// [`CoreError::Store`] and [`CoreError::Internal`] are unexpected.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] crate::grading::StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
