//! Failures of a single remote generation call.
//!
//! These never leave the crate: [`crate::GenerationClient`] logs them and
//! substitutes a stub response.

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("response carried no choices")]
    NoChoices,
}
