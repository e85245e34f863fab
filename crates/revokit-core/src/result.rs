//! Convenience result type alias for Revokit.

use crate::error::AppError;

/// A specialized `Result` type for Revokit operations.
pub type AppResult<T> = Result<T, AppError>;
