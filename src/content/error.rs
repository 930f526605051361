//! Error types for the content subsystem.
//!
//! All of these are per-request failures: the caller gets a structured error
//! and the serving process keeps running.

use std::fmt;

use thiserror::Error;

/// A single offending field inside a content payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field that failed validation, reported together so the caller can
/// fix the whole payload in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Failures of the content model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// A required field is missing, has the wrong type, or fails a nested
    /// check. Lists every offending field.
    #[error("invalid content: {0}")]
    Validation(FieldErrors),

    /// The exclusive-choice input selected no variant.
    #[error("content input must select one of text, image or link")]
    VariantRequired,

    /// The exclusive-choice input selected more than one variant.
    #[error("content input must select exactly one of text, image or link")]
    AmbiguousVariant,

    /// Stored content failed re-validation on read. Non-retryable; indicates
    /// a data-integrity problem rather than bad caller input.
    #[error("corrupt stored content: {0}")]
    Corrupt(String),
}

impl ContentError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        ContentError::Validation(FieldErrors(errors))
    }

    /// The offending fields, empty for non-validation errors.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ContentError::Validation(FieldErrors(errors)) => errors,
            _ => &[],
        }
    }
}
