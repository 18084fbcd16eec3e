use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input outside configured bounds; the message names the first failing field.
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid category selected")]
    InvalidCategory,
    #[error("image too large ({size} bytes, max {max})")]
    ImageTooLarge { size: usize, max: usize },
    #[error("unsupported image format; use JPG, PNG, GIF, or WebP")]
    UnsupportedImageFormat,
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Missing, or present but owned by someone else.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::UniqueViolation(msg) => ServiceError::Conflict(msg),
            ModelError::ForeignKeyViolation(msg) | ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { ServiceError::from(ModelError::from(e)) }
}
