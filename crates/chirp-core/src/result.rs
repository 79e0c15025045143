//! Convenience result type alias for Chirp.

use crate::error::AppError;

/// A specialized `Result` type for Chirp operations.
pub type AppResult<T> = Result<T, AppError>;
