//! Response envelopes for composite operations.
//!
//! Plain entity reads return the entity structs directly; these types cover
//! endpoints whose JSON shape combines several records.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Configuration, Interface, Library, Logic, Ontology, TestCase, Unit};
use crate::enums::TestResult;

/// Result of the combined generate-all operation: every stored artifact plus
/// the raw model text it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GenerateAllResponse {
    pub ontology: Ontology,
    pub ontology_raw: String,
    pub interface: Interface,
    pub interface_raw: String,
    pub configuration: Configuration,
    pub configuration_raw: String,
    pub tests: Vec<TestCase>,
    pub tests_raw: String,
    pub logic: Logic,
    pub logic_raw: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestRunOutcome {
    pub test_id: i64,
    pub result: TestResult,
}

/// Response from running a unit's tests.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunTestsResponse {
    pub results: Vec<TestRunOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TraceabilityEntry {
    pub unit_id: i64,
    pub legal_reference: String,
}

/// Library-wide summary: units, status counts, interfaces, and citations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OverviewSnapshot {
    pub library: Library,
    pub units: Vec<Unit>,
    pub status_counts: BTreeMap<String, u64>,
    pub interface_surface: Vec<Interface>,
    pub traceability: Vec<TraceabilityEntry>,
}

/// Response from a (stubbed) repository sync.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SyncResponse {
    pub repository_url: String,
    pub branch: String,
    pub commit_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub llm_configured: bool,
}
