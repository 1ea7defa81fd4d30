use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SyncStatus;

/// Audit record of a repository synchronization attempt for a library.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SyncEvent {
    pub id: i64,
    pub library_id: i64,
    pub repository_url: String,
    pub branch: String,
    pub commit_id: Option<String>,
    pub message: Option<String>,
    pub status: SyncStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
