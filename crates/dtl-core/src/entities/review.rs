use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ReviewStatus;

/// Review workflow state of a unit. Created lazily as `Pending` on first read.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Review {
    pub status: ReviewStatus,
    pub approved_version: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub last_comment: Option<String>,
}

impl Review {
    /// A review that has never been acted upon.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            status: ReviewStatus::Pending,
            approved_version: None,
            approved_at: None,
            last_comment: None,
        }
    }
}
