//! Cross-cutting error types for DTL.
//!
//! Domain-specific errors (`DatabaseError`, `ArtifactError`, ...) live in their
//! own crates. `CoreError` covers failures detectable from a payload alone.

use thiserror::Error;

/// Payload validation failure.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A payload failed validation before any write was attempted.
    #[error("Validation error: {0}")]
    Validation(String),
}

