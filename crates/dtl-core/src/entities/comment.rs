use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A reviewer or author remark on a unit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub unit_id: i64,
    pub author_id: i64,
    pub role: String,
    pub comment: String,
    pub comment_type: Option<String>,
    pub created_at: DateTime<Utc>,
}
