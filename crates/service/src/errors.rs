use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("payment error: {0}")]
    Payment(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Invalid lifecycle transition, reported as a conflict.
    pub fn bad_transition(entity: &str, from: &str, to: &str) -> Self {
        Self::Conflict(format!("{} cannot move from '{}' to '{}'", entity, from, to))
    }
}
