use dtl_db::error::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Segmentation needs the library's full text.
    #[error("library {library_id} has no full_text to segment")]
    MissingSourceText { library_id: i64 },
}

impl ArtifactError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        match self {
            Self::Database(err) => err.is_not_found(),
            Self::MissingSourceText { .. } => false,
        }
    }
}
