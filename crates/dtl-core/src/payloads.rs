//! Request payloads accepted by the Resource API.
//!
//! Creation payloads carry the same defaults the HTTP surface documents
//! (`status = "Draft"`, `role = "Viewer"`, `position = 0`). Partial updates
//! live next to their repositories in `dtl-db`.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_STATUS: &str = "Draft";
pub const DEFAULT_COMMENT_ROLE: &str = "Viewer";

/// Deserialize a present field as `Some`, including an explicit `null`.
///
/// Used with `#[serde(default, deserialize_with = "deserialize_some")]` on
/// `Option<Option<T>>` so an omitted field (`None`) differs from a cleared one
/// (`Some(None)`).
///
/// # Errors
///
/// Propagates the inner deserializer's error.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

fn default_role() -> String {
    DEFAULT_COMMENT_ROLE.to_string()
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewUser {
    pub external_id: String,
    pub display_name: String,
    pub email: String,
}

impl NewUser {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if any field is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("external_id", &self.external_id)?;
        require("display_name", &self.display_name)?;
        require("email", &self.email)
    }
}

// ---------------------------------------------------------------------------
// Libraries and units
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewLibrary {
    pub law_name: String,
    pub law_identifier: String,
    pub jurisdiction: String,
    pub version: String,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub authoritative_source_url: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub repository_branch: Option<String>,
    pub full_text: String,
    /// Id of an existing user.
    pub created_by: i64,
}

impl NewLibrary {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the law name or identifier is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("law_name", &self.law_name)?;
        require("law_identifier", &self.law_identifier)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewUnit {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_user_id: Option<i64>,
    pub version: String,
    pub legal_text: String,
    pub legal_reference: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub classification: Option<serde_json::Value>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub position: i64,
}

impl NewUnit {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the title is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("title", &self.title)
    }
}

/// A segmentation suggestion before it is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewSuggestion {
    pub title: String,
    pub description: Option<String>,
    pub legal_text: String,
    pub legal_reference: String,
}

// ---------------------------------------------------------------------------
// Tests, comments, review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTestCase {
    pub name: String,
    pub input: serde_json::Value,
    pub expected_output: serde_json::Value,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewComment {
    pub comment: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub comment_type: Option<String>,
    pub author_id: i64,
}

/// Optional body for the approve / request-revision actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewPayload {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub approved_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        field: Option<Option<String>>,
    }

    #[test]
    fn deserialize_some_distinguishes_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let cleared: Patch = serde_json::from_str(r#"{"field": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"field": "x"}"#).unwrap();
        assert_eq!(absent.field, None);
        assert_eq!(cleared.field, Some(None));
        assert_eq!(set.field, Some(Some("x".to_string())));
    }

    #[test]
    fn new_unit_defaults() {
        let unit: NewUnit = serde_json::from_value(serde_json::json!({
            "title": "Eligibility",
            "version": "1.0",
            "legal_text": "Section 1",
            "legal_reference": "§1",
        }))
        .unwrap();
        assert_eq!(unit.status, "Draft");
        assert_eq!(unit.position, 0);
        assert_eq!(unit.classification, None);
    }

    #[test]
    fn new_comment_role_defaults_to_viewer() {
        let comment: NewComment =
            serde_json::from_str(r#"{"comment": "ok", "author_id": 1}"#).unwrap();
        assert_eq!(comment.role, "Viewer");
    }

    #[test]
    fn blank_fields_fail_validation() {
        let user = NewUser {
            external_id: "  ".into(),
            display_name: "A".into(),
            email: "a@example.com".into(),
        };
        assert!(matches!(user.validate(), Err(CoreError::Validation(_))));
    }
}
