//! Error types shared across the workspace

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors raised by the shared types
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Invalid compound id {0}: compound ids start at 1")]
    InvalidCompoundId(i64),

    #[error("Failed to parse compound id '{0}'")]
    ParseCompoundId(String),
}
