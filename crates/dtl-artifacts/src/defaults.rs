//! Defaulting policy: turn `(raw text, extracted JSON)` into stored values.
//!
//! A field from the model is used only when it is present (not null, not an
//! empty string, array, or object). Anything else falls back to the raw
//! response text or a synthetic value derived from it, so the result never
//! has an empty required field as long as `raw` is non-empty.

use serde_json::{Map, Value, json};

use dtl_core::entities::{Configuration, DEFAULT_LOGIC_LANGUAGE, Interface, Logic, Ontology};
use dtl_core::payloads::{NewSuggestion, NewTestCase};
use dtl_core::text::truncate_chars;
use dtl_llm::JsonExtraction;
use dtl_llm::extract::{present, present_str};

/// Most segmentation suggestions kept from one response.
pub const MAX_SEGMENTS: usize = 5;

pub const SEGMENT_PLACEHOLDER: &str = "No suggestion returned by the model";
pub const AUTO_REFERENCE: &str = "Auto";
pub const SEGMENTATION_FALLBACK_TITLE: &str = "Segmentation unavailable";
pub const TEST_FALLBACK_NAME: &str = "LLM Proposed Test";

const DESCRIPTION_CHARS: usize = 255;
const DESCRIPTOR_CHARS: usize = 200;
const HINT_CHARS: usize = 200;
const TEST_HINT_CHARS: usize = 80;
const TEST_FALLBACK_CHARS: usize = 120;
const FULL_TEXT_FALLBACK_CHARS: usize = 500;

fn string_or(map: Option<&Map<String, Value>>, key: &str, fallback: &str) -> String {
    map.and_then(|m| present_str(m, key))
        .unwrap_or(fallback)
        .to_string()
}

/// Object entries of the array under `key`, with their 1-based position in
/// the whole array (non-object entries still count).
fn object_entries<'a>(
    parsed: &'a JsonExtraction,
    key: &str,
) -> impl Iterator<Item = (usize, &'a Map<String, Value>)> {
    parsed
        .as_object()
        .and_then(|map| map.get(key))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .enumerate()
        .filter_map(|(idx, entry)| entry.as_object().map(|obj| (idx + 1, obj)))
}

#[must_use]
pub fn ontology(raw: &str, parsed: &JsonExtraction) -> Ontology {
    Ontology {
        ontology_owl: string_or(parsed.as_object(), "ontology_owl", raw),
        raw_response: Some(raw.to_string()),
    }
}

#[must_use]
pub fn configuration(raw: &str, parsed: &JsonExtraction) -> Configuration {
    Configuration {
        configuration_owl: string_or(parsed.as_object(), "configuration_owl", raw),
    }
}

/// Interface fields; `function_name` falls back to the unit's title.
#[must_use]
pub fn interface(raw: &str, parsed: &JsonExtraction, unit_title: &str) -> Interface {
    let map = parsed.as_object();
    let descriptors = |key: &str, name: &str| -> Vec<Value> {
        map.and_then(|m| present(m, key))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_else(|| {
                vec![json!({
                    "name": name,
                    "description": truncate_chars(raw, DESCRIPTOR_CHARS),
                })]
            })
    };

    // A supplied spec is kept even when null; only a missing key is defaulted.
    let mcp_spec = map
        .and_then(|m| m.get("mcp_spec"))
        .map_or_else(|| json!({ "hint": raw }), Clone::clone);

    Interface {
        function_name: string_or(map, "function_name", unit_title),
        inputs: descriptors("inputs", "input"),
        outputs: descriptors("outputs", "result"),
        mcp_spec: Some(mcp_spec),
    }
}

/// Logic code, prefixed with a one-line comment quoting the response.
#[must_use]
pub fn logic(raw: &str, parsed: &JsonExtraction) -> Logic {
    let map = parsed.as_object();
    let code = map.and_then(|m| present_str(m, "code")).unwrap_or(raw);
    let hint = truncate_chars(raw, HINT_CHARS).replace(['\r', '\n'], " ");
    Logic {
        language: string_or(map, "language", DEFAULT_LOGIC_LANGUAGE),
        code: format!("# LLM Hint: {hint}\n{code}"),
    }
}

/// Test cases from a `tests` array, or one fallback case if none are usable.
#[must_use]
pub fn tests(raw: &str, parsed: &JsonExtraction) -> Vec<NewTestCase> {
    let description = truncate_chars(raw, DESCRIPTION_CHARS);
    let hint = truncate_chars(raw, TEST_HINT_CHARS);

    let cases: Vec<NewTestCase> = object_entries(parsed, "tests")
        .map(|(n, entry)| NewTestCase {
            name: present_str(entry, "name").map_or_else(|| format!("LLM Test {n}"), str::to_string),
            input: present(entry, "input")
                .cloned()
                .unwrap_or_else(|| json!({ "hint": hint })),
            expected_output: present(entry, "expected_output")
                .cloned()
                .unwrap_or_else(|| json!({ "expected": hint })),
            description: Some(string_or(Some(entry), "description", description)),
        })
        .collect();

    if !cases.is_empty() {
        return cases;
    }

    let preview = truncate_chars(raw, TEST_FALLBACK_CHARS);
    vec![NewTestCase {
        name: TEST_FALLBACK_NAME.to_string(),
        input: json!({ "prompt": preview }),
        expected_output: json!({ "expected": preview }),
        description: Some(description.to_string()),
    }]
}

/// Up to [`MAX_SEGMENTS`] suggestions from a `segments` array, or a single
/// fallback quoting the start of `full_text`.
#[must_use]
pub fn segments(raw: &str, parsed: &JsonExtraction, full_text: &str) -> Vec<NewSuggestion> {
    let suggestions: Vec<NewSuggestion> = object_entries(parsed, "segments")
        .take(MAX_SEGMENTS)
        .map(|(n, entry)| NewSuggestion {
            title: present_str(entry, "title").map_or_else(|| format!("Segment {n}"), str::to_string),
            description: Some(string_or(Some(entry), "description", SEGMENT_PLACEHOLDER)),
            legal_text: string_or(Some(entry), "legal_text", SEGMENT_PLACEHOLDER),
            legal_reference: string_or(Some(entry), "legal_reference", AUTO_REFERENCE),
        })
        .collect();

    if !suggestions.is_empty() {
        return suggestions;
    }

    vec![NewSuggestion {
        title: SEGMENTATION_FALLBACK_TITLE.to_string(),
        description: Some(truncate_chars(raw, DESCRIPTION_CHARS).to_string()),
        legal_text: truncate_chars(full_text, FULL_TEXT_FALLBACK_CHARS).to_string(),
        legal_reference: AUTO_REFERENCE.to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtl_llm::extract_json;
    use pretty_assertions::assert_eq;

    const STUB: &str = "[stubbed LLM response for prompt: You are a knowledge engineer...]";

    #[test]
    fn ontology_prefers_model_field() {
        let raw = r#"{"ontology_owl": "<owl/>"}"#;
        let value = ontology(raw, &extract_json(raw));
        assert_eq!(value.ontology_owl, "<owl/>");
        assert_eq!(value.raw_response.as_deref(), Some(raw));
    }

    #[test]
    fn ontology_empty_field_falls_back_to_raw() {
        let raw = r#"{"ontology_owl": ""}"#;
        assert_eq!(ontology(raw, &extract_json(raw)).ontology_owl, raw);
    }

    #[test]
    fn configuration_from_fenced_block() {
        let raw = "Sure.\n```json\n{\"configuration_owl\": \"<cfg/>\"}\n```";
        assert_eq!(configuration(raw, &extract_json(raw)).configuration_owl, "<cfg/>");
    }

    #[test]
    fn interface_stub_defaults() {
        let value = interface(STUB, &extract_json(STUB), "Eligibility");
        assert_eq!(value.function_name, "Eligibility");
        assert_eq!(value.inputs, vec![json!({"name": "input", "description": STUB})]);
        assert_eq!(value.outputs, vec![json!({"name": "result", "description": STUB})]);
        assert_eq!(value.mcp_spec, Some(json!({"hint": STUB})));
    }

    #[test]
    fn interface_keeps_supplied_fields() {
        let raw = r#"{
            "function_name": "is_eligible",
            "inputs": [{"name": "income", "type": "number"}],
            "outputs": [],
            "mcp_spec": null
        }"#;
        let value = interface(raw, &extract_json(raw), "Eligibility");
        assert_eq!(value.function_name, "is_eligible");
        assert_eq!(value.inputs, vec![json!({"name": "income", "type": "number"})]);
        assert_eq!(value.outputs[0]["name"], "result");
        assert_eq!(value.mcp_spec, Some(Value::Null));
    }

    #[test]
    fn interface_descriptor_is_truncated() {
        let raw = "ä".repeat(400);
        let value = interface(&raw, &JsonExtraction::NotFound, "t");
        let description = value.inputs[0]["description"].as_str().unwrap();
        assert_eq!(description.chars().count(), 200);
    }

    #[test]
    fn logic_prefixes_hint_line() {
        let raw = r#"{"language": "Python", "code": "def f():\n    return 1"}"#;
        let value = logic(raw, &extract_json(raw));
        assert_eq!(value.language, "Python");
        let mut lines = value.code.lines();
        assert!(lines.next().unwrap().starts_with("# LLM Hint: {"));
        assert_eq!(lines.next(), Some("def f():"));
    }

    #[test]
    fn logic_stub_uses_raw_as_code() {
        let value = logic(STUB, &JsonExtraction::NotFound);
        assert_eq!(value.language, "Python");
        assert_eq!(value.code, format!("# LLM Hint: {STUB}\n{STUB}"));
    }

    #[test]
    fn tests_default_each_field_independently() {
        let raw = r#"{"tests": [
            {"name": "low income", "input": {"income": 500}, "expected_output": {"eligible": true}},
            "not an object",
            {"description": "d"}
        ]}"#;
        let cases = tests(raw, &extract_json(raw));
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].name, "low income");
        assert_eq!(cases[0].input, json!({"income": 500}));
        assert_eq!(cases[0].description.as_deref(), Some(truncate_chars(raw, 255)));
        assert_eq!(cases[1].name, "LLM Test 3");
        assert_eq!(cases[1].input, json!({"hint": truncate_chars(raw, 80)}));
        assert_eq!(cases[1].expected_output, json!({"expected": truncate_chars(raw, 80)}));
        assert_eq!(cases[1].description.as_deref(), Some("d"));
    }

    #[test]
    fn tests_fallback_on_stub() {
        let cases = tests(STUB, &extract_json(STUB));
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "LLM Proposed Test");
        assert_eq!(cases[0].input, json!({"prompt": STUB}));
        assert_eq!(cases[0].expected_output, json!({"expected": STUB}));
    }

    #[test]
    fn tests_fallback_on_empty_array() {
        let raw = r#"{"tests": []}"#;
        assert_eq!(tests(raw, &extract_json(raw))[0].name, "LLM Proposed Test");
    }

    #[test]
    fn segments_capped_in_order() {
        let entries: Vec<Value> = (1..=7)
            .map(|i| json!({"title": format!("S{i}"), "legal_text": "t", "legal_reference": format!("§{i}")}))
            .collect();
        let raw = json!({"segments": entries}).to_string();
        let suggestions = segments(&raw, &extract_json(&raw), "full");
        let titles: Vec<&str> = suggestions.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["S1", "S2", "S3", "S4", "S5"]);
        assert_eq!(suggestions[0].description.as_deref(), Some(SEGMENT_PLACEHOLDER));
    }

    #[test]
    fn segment_fields_default() {
        let raw = r#"{"segments": [{}]}"#;
        let suggestion = &segments(raw, &extract_json(raw), "full")[0];
        assert_eq!(suggestion.title, "Segment 1");
        assert_eq!(suggestion.legal_text, SEGMENT_PLACEHOLDER);
        assert_eq!(suggestion.legal_reference, "Auto");
    }

    #[test]
    fn default_titles_number_by_array_position() {
        let raw = r#"{"segments": ["prose", {}, 7, {"title": "Named"}, {}]}"#;
        let titles: Vec<String> = segments(raw, &extract_json(raw), "full")
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Segment 2", "Named", "Segment 5"]);

        let raw = r#"{"tests": ["prose", {}, {"name": "Named"}]}"#;
        let names: Vec<String> = tests(raw, &extract_json(raw))
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["LLM Test 2", "Named"]);
    }

    #[test]
    fn segments_fallback_quotes_full_text() {
        let full_text = "x".repeat(900);
        let suggestions = segments(STUB, &JsonExtraction::NotFound, &full_text);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, SEGMENTATION_FALLBACK_TITLE);
        assert_eq!(suggestions[0].legal_text.len(), 500);
        assert_eq!(suggestions[0].description.as_deref(), Some(STUB));
    }

    #[test]
    fn stub_never_yields_empty_required_fields() {
        let parsed = extract_json(STUB);
        assert!(!ontology(STUB, &parsed).ontology_owl.is_empty());
        assert!(!configuration(STUB, &parsed).configuration_owl.is_empty());
        let iface = interface(STUB, &parsed, "Unit");
        assert!(!iface.function_name.is_empty() && !iface.inputs.is_empty());
        assert!(!logic(STUB, &parsed).code.is_empty());
        assert!(!tests(STUB, &parsed).is_empty());
        assert!(!segments(STUB, &parsed, "text").is_empty());
    }
}
