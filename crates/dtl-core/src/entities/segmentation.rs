use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SuggestionStatus;

/// A unit proposed by the segmentation pass, awaiting promotion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SegmentationSuggestion {
    pub id: i64,
    pub library_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub legal_text: String,
    pub legal_reference: String,
    pub created_by: Option<i64>,
    pub status: SuggestionStatus,
    pub created_at: DateTime<Utc>,
}
