//! Library update builder.

use chrono::NaiveDate;
use dtl_core::payloads::deserialize_some;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub effective_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub authoritative_source_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub repository_branch: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
}

pub struct LibraryUpdateBuilder(LibraryUpdate);

impl LibraryUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(LibraryUpdate::default())
    }

    #[must_use]
    pub fn law_name(mut self, law_name: impl Into<String>) -> Self {
        self.0.law_name = Some(law_name.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.0.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn effective_date(mut self, effective_date: Option<NaiveDate>) -> Self {
        self.0.effective_date = Some(effective_date);
        self
    }

    #[must_use]
    pub fn repository(mut self, url: Option<String>, branch: Option<String>) -> Self {
        self.0.repository_url = Some(url);
        self.0.repository_branch = Some(branch);
        self
    }

    #[must_use]
    pub fn full_text(mut self, full_text: impl Into<String>) -> Self {
        self.0.full_text = Some(full_text.into());
        self
    }

    #[must_use]
    pub fn build(self) -> LibraryUpdate {
        self.0
    }
}

impl Default for LibraryUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
