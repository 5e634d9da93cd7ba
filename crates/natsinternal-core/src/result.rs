//! Convenience result type alias for NATSInternal.

use crate::error::AppError;

/// A specialized `Result` type for NATSInternal operations.
pub type AppResult<T> = Result<T, AppError>;
