//! Registry error types.

use thiserror::Error;

/// Errors raised at the handle boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Handle does not name a live instance.
    #[error("unknown instance handle {0}")]
    UnknownHandle(u32),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
