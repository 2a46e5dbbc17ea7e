//! Reporting of violated IR contracts.

/// Result type for operations that can detect an internal inconsistency
/// and hand it back instead of aborting.
///
/// `Err` means a pass broke an IR contract: a compiler bug, never a
/// problem with the user's design. User-facing problems go through the
/// diagnostic sink and the operation still returns `Ok` with a
/// best-effort value.
pub type VoltaResult<T> = Result<T, InternalError>;

/// A violated IR contract.
#[derive(Debug, thiserror::Error)]
#[error("internal compiler error: {0}")]
pub struct InternalError(String);

impl InternalError {
    /// Wraps a description of the violated contract.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the description of the violated contract.
    pub fn message(&self) -> &str {
        &self.0
    }
}
