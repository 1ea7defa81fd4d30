use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named piece of legislation. Owns its units, segmentation suggestions,
/// and sync history; deleting it removes all of them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Library {
    pub id: i64,
    pub law_name: String,
    pub law_identifier: String,
    pub jurisdiction: String,
    pub version: String,
    pub effective_date: Option<NaiveDate>,
    /// Free-form workflow label, `"Draft"` when not supplied.
    pub status: String,
    pub authoritative_source_url: Option<String>,
    pub repository_url: Option<String>,
    pub repository_branch: Option<String>,
    /// The entire source legal text.
    pub full_text: String,
    /// Id of the creating user.
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
