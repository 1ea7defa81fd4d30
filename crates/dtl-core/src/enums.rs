//! Status enums for DTL workflow records.
//!
//! Values are serialized with the human-readable labels the UI displays
//! (`"Revision Requested"`, `"Not Run"`), which are also the strings stored
//! in SQL. Library and unit `status` columns stay free-form strings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ReviewStatus
// ---------------------------------------------------------------------------

/// Review workflow state of a unit.
///
/// ```text
/// Pending ──approve──────────▶ Approved
///    │                            │  ▲
///    └──request_revision──▶ Revision Requested
/// ```
///
/// Both actions are unconditional: any state may move to either target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ReviewStatus {
    Pending,
    Approved,
    #[serde(rename = "Revision Requested")]
    RevisionRequested,
}

impl ReviewStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::RevisionRequested => "Revision Requested",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TestResult
// ---------------------------------------------------------------------------

/// Outcome recorded on a test case and on each of its runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TestResult {
    #[serde(rename = "Not Run")]
    NotRun,
    Pass,
    Fail,
}

impl TestResult {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRun => "Not Run",
            Self::Pass => "Pass",
            Self::Fail => "Fail",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SuggestionStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a segmentation suggestion.
///
/// ```text
/// Proposed → Accepted (promoted to a unit)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SuggestionStatus {
    Proposed,
    Accepted,
}

impl SuggestionStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Proposed => &[Self::Accepted],
            Self::Accepted => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "Proposed",
            Self::Accepted => "Accepted",
        }
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SyncStatus
// ---------------------------------------------------------------------------

/// Status of a repository synchronization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SyncStatus {
    Started,
    Completed,
    Failed,
}

impl SyncStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "Started",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
