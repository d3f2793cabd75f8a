//! Crate-local error type.

use thiserror::Error;

/// Errors the core can report.
///
/// Body and joint construction through [`crate::world`]'s rapier2d backend is
/// infallible today (the builders return values, not `Result`), so
/// [`CoreError::WorldConstruction`] can never actually be produced. It stays
/// in the enum so the public API's error shape doesn't change if a future
/// backend swap introduces a fallible construction path.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to construct physics world: {0}")]
    WorldConstruction(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
