//! Convenience result type alias for A-Drive.

use crate::error::AppError;

/// A specialized `Result` type for A-Drive operations.
pub type AppResult<T> = Result<T, AppError>;
