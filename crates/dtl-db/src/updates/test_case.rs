//! Test case update builder.

use dtl_core::payloads::deserialize_some;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCaseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<serde_json::Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

pub struct TestCaseUpdateBuilder(TestCaseUpdate);

impl TestCaseUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TestCaseUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn input(mut self, input: serde_json::Value) -> Self {
        self.0.input = Some(input);
        self
    }

    #[must_use]
    pub fn expected_output(mut self, expected_output: serde_json::Value) -> Self {
        self.0.expected_output = Some(expected_output);
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn build(self) -> TestCaseUpdate {
        self.0
    }
}

impl Default for TestCaseUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
