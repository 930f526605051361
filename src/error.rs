//! Error types for the API.
//!
//! Errors are converted to GraphQL request errors for API clients: the
//! response stays HTTP 200 with an `errors` list, and each error carries a
//! machine-readable `code` extension. No failure here aborts the serving
//! process.

use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::content::ContentError;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Content validation, input-choice or storage-integrity failure.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Stable error code exposed in the GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "INTERNAL",
            AppError::Content(ContentError::Validation(_)) => "VALIDATION",
            AppError::Content(ContentError::VariantRequired) => "VARIANT_REQUIRED",
            AppError::Content(ContentError::AmbiguousVariant) => "AMBIGUOUS_VARIANT",
            AppError::Content(ContentError::Corrupt(_)) => "CORRUPT_CONTENT",
            AppError::NotFound(_) => "NOT_FOUND",
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}
