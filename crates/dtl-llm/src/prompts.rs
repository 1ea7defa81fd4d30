//! Prompt templates, one per artifact kind.
//!
//! Templates are plain data: each fixes the JSON shape the model must return
//! and carries `{placeholder}` slots that [`PromptTemplate::render`] fills.
//! The builder functions truncate embedded legal text to the per-kind limit
//! before rendering.

use std::sync::LazyLock;

use dtl_core::text::truncate_chars;
use regex::{Captures, Regex};

/// Legal text budget for the ontology prompt.
pub const ONTOLOGY_TEXT_LIMIT: usize = 2000;
/// Legal text budget for interface, configuration, and test prompts.
pub const ARTIFACT_TEXT_LIMIT: usize = 1500;
/// Legal text budget for the logic prompt.
pub const LOGIC_TEXT_LIMIT: usize = 1200;
/// Full-text budget for library segmentation.
pub const SEGMENTATION_TEXT_LIMIT: usize = 20_000;

static SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("slot pattern is valid"));

/// A named template with `{slot}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub version: u32,
    pub body: &'static str,
}

impl PromptTemplate {
    /// Substitute each `{key}` with its value in a single pass over the
    /// body; inserted values are never rescanned. Unknown slots are left as is.
    #[must_use]
    pub fn render(&self, slots: &[(&str, &str)]) -> String {
        SLOT.replace_all(self.body, |caps: &Captures<'_>| {
            slots
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| (*value).to_string())
        })
        .into_owned()
    }
}

pub const ONTOLOGY: PromptTemplate = PromptTemplate {
    name: "ontology",
    version: 1,
    body: "You are a knowledge engineer building an OWL ontology that defines the key terms of \
the legal text below.\n\
Respond with a JSON object holding one key, `ontology_owl` (string).\n\
`ontology_owl` must be valid, self-consistent OWL containing only semantic definitions of the \
law's key terms. Keep identifiers stable.\n\
Title: {title}\n\
Legal reference: {legal_reference}\n\
Legal text:\n{legal_text}",
};

pub const CONFIGURATION: PromptTemplate = PromptTemplate {
    name: "configuration",
    version: 1,
    body: "You are writing an OWL configuration snippet that captures the measurable parameters \
and thresholds in the legal text below.\n\
Respond with a JSON object holding one key, `configuration_owl` (string).\n\
`configuration_owl` must be valid, self-consistent OWL containing only parameters and thresholds, \
with stable identifiers and explicit data types.\n\
Title: {title}\n\
Legal text:\n{legal_text}",
};

pub const INTERFACE: PromptTemplate = PromptTemplate {
    name: "interface",
    version: 1,
    body: "Design the call interface of an executable function implementing the legal rule below.\n\
Respond with a JSON object with these keys:\n\
- function_name: short snake_case name.\n\
- inputs: array of objects with name, type, description.\n\
- outputs: array of objects with the same fields.\n\
- mcp_spec: optional MCP/tool specification object; include a human-readable `hint` string.\n\
Every value must be JSON-serializable.\n\
Title: {title}\n\
Legal text:\n{legal_text}",
};

pub const TESTS: PromptTemplate = PromptTemplate {
    name: "tests",
    version: 1,
    body: "Propose test cases that validate an implementation of the legal rule below.\n\
Respond with a JSON object holding one key, `tests`: an array of objects with\n\
name (string), input (object), expected_output (object), description (string).\n\
Use clear names and minimal, valid JSON structures.\n\
Title: {title}\n\
Legal text:\n{legal_text}",
};

pub const LOGIC: PromptTemplate = PromptTemplate {
    name: "logic",
    version: 1,
    body: "Translate the legal rule below into executable program logic.\n\
Respond with a JSON object with keys `language` (string, always 'Python') and `code` (string).\n\
The code must be valid Python, open with comments summarising the legal reasoning, and implement \
the rule. Do not add other keys or any prose outside the JSON object.\n\
Title: {title}\n\
Legal text:\n{legal_text}",
};

pub const SEGMENTATION: PromptTemplate = PromptTemplate {
    name: "segmentation",
    version: 1,
    body: "Split the law below into high-level Digital Twin Law functions.\n\
Respond with one JSON object holding the key `segments`. Every segment must have:\n\
- title: a short, precise functional name\n\
- description: a concise explanation of the legal function\n\
- legal_text: a verbatim excerpt that is a continuous substring of the text below\n\
- legal_reference: a pinpoint citation\n\
Law: {law_name} ({law_identifier})\n\
Full text:\n{full_text}",
};

#[must_use]
pub fn ontology(title: &str, legal_reference: &str, legal_text: &str) -> String {
    ONTOLOGY.render(&[
        ("title", title),
        ("legal_reference", legal_reference),
        ("legal_text", truncate_chars(legal_text, ONTOLOGY_TEXT_LIMIT)),
    ])
}

#[must_use]
pub fn configuration(title: &str, legal_text: &str) -> String {
    CONFIGURATION.render(&[
        ("title", title),
        ("legal_text", truncate_chars(legal_text, ARTIFACT_TEXT_LIMIT)),
    ])
}

#[must_use]
pub fn interface(title: &str, legal_text: &str) -> String {
    INTERFACE.render(&[
        ("title", title),
        ("legal_text", truncate_chars(legal_text, ARTIFACT_TEXT_LIMIT)),
    ])
}

#[must_use]
pub fn tests(title: &str, legal_text: &str) -> String {
    TESTS.render(&[
        ("title", title),
        ("legal_text", truncate_chars(legal_text, ARTIFACT_TEXT_LIMIT)),
    ])
}

#[must_use]
pub fn logic(title: &str, legal_text: &str) -> String {
    LOGIC.render(&[
        ("title", title),
        ("legal_text", truncate_chars(legal_text, LOGIC_TEXT_LIMIT)),
    ])
}

#[must_use]
pub fn segmentation(law_name: &str, law_identifier: &str, full_text: &str) -> String {
    SEGMENTATION.render(&[
        ("law_name", law_name),
        ("law_identifier", law_identifier),
        ("full_text", truncate_chars(full_text, SEGMENTATION_TEXT_LIMIT)),
    ])
}
