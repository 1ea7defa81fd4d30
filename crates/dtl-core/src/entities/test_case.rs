use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TestResult;

/// A named input / expected-output pair attached to a unit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestCase {
    pub id: i64,
    pub unit_id: i64,
    pub name: String,
    pub input: serde_json::Value,
    pub expected_output: serde_json::Value,
    pub description: Option<String>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_result: Option<TestResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry in a test's execution history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestRun {
    pub id: i64,
    pub test_id: i64,
    pub executed_at: DateTime<Utc>,
    pub result: TestResult,
    pub actual_output: Option<serde_json::Value>,
    pub notes: Option<String>,
}
