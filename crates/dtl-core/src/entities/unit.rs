use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A segment of legislation mapped to one executable law function.
///
/// Units are listed by `position` within their library, ties broken by id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Unit {
    pub id: i64,
    pub library_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner_user_id: Option<i64>,
    pub version: String,
    /// Verbatim excerpt of the library's full text.
    pub legal_text: String,
    /// Pinpoint citation for `legal_text`.
    pub legal_reference: String,
    pub source_url: Option<String>,
    pub classification: Option<serde_json::Value>,
    pub status: String,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
