//! Result type aliases for Userbook.

use crate::UserbookError;

/// A specialized `Result` type for Userbook operations.
pub type UserbookResult<T> = Result<T, UserbookError>;
