//! Convenience result type alias for davstore.

use crate::error::AppError;

/// A specialized `Result` type for davstore operations.
pub type AppResult<T> = Result<T, AppError>;
