//! Orchestrator behaviour against a real libSQL database and a scripted
//! generator.

use std::collections::VecDeque;
use std::sync::Mutex;

use dtl_artifacts::{ArtifactError, Orchestrator};
use dtl_config::LlmConfig;
use dtl_core::entities::{Library, Unit};
use dtl_core::payloads::{NewLibrary, NewTestCase, NewUnit};
use dtl_db::DtlDb;
use dtl_db::service::DtlService;
use dtl_llm::{GenerationClient, STUB_PREFIX, TextGenerator};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

/// Replays canned responses in order and records every prompt.
#[derive(Default)]
struct ScriptedGenerator {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            prompts: Mutex::default(),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    async fn generate_text(&self, prompt: &str) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses.lock().unwrap().pop_front().unwrap_or_default()
    }
}

struct Fixture {
    _dir: TempDir,
    _db: DtlDb,
    svc: DtlService,
    library: Library,
    unit: Unit,
}

async fn fixture(full_text: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dtl.db");
    let db = DtlDb::open_local(path.to_str().unwrap()).await.unwrap();
    let svc = db.connect().await.unwrap();
    let user = svc.bootstrap_default_user().await.unwrap();

    let library = svc
        .create_library(&NewLibrary {
            law_name: "Housing Benefit Act".into(),
            law_identifier: "HBA-2024".into(),
            jurisdiction: "DE".into(),
            version: "2024.1".into(),
            effective_date: None,
            status: "Draft".into(),
            authoritative_source_url: None,
            repository_url: None,
            repository_branch: None,
            full_text: full_text.into(),
            created_by: user.id,
        })
        .await
        .unwrap();
    let unit = svc
        .create_unit(
            library.id,
            &NewUnit {
                title: "Eligibility".into(),
                description: None,
                owner_user_id: None,
                version: "1.0".into(),
                legal_text: "A household with income below 1000 is eligible.".into(),
                legal_reference: "§1".into(),
                source_url: None,
                classification: None,
                status: "Draft".into(),
                position: 0,
            },
        )
        .await
        .unwrap();

    Fixture {
        _dir: dir,
        _db: db,
        svc,
        library,
        unit,
    }
}

fn old_test(name: &str) -> NewTestCase {
    NewTestCase {
        name: name.into(),
        input: json!({}),
        expected_output: json!({}),
        description: None,
    }
}

#[tokio::test]
async fn generate_all_runs_in_order_and_replaces_tests() {
    let fx = fixture("§1 text").await;
    fx.svc
        .insert_tests(fx.unit.id, &[old_test("a"), old_test("b"), old_test("c")])
        .await
        .unwrap();

    let generator = ScriptedGenerator::new([
        json!({"ontology_owl": "<owl/>"}).to_string(),
        json!({"function_name": "is_eligible", "inputs": [{"name": "income"}], "outputs": [{"name": "eligible"}]}).to_string(),
        json!({"configuration_owl": "<cfg/>"}).to_string(),
        json!({"tests": [{"name": "low"}, {"name": "high"}]}).to_string(),
        "```json\n{\"language\": \"Python\", \"code\": \"def is_eligible(income):\\n    return income < 1000\"}\n```".to_string(),
    ]);
    let orchestrator = Orchestrator::new(generator);

    let result = orchestrator
        .generate_all(&fx.svc, fx.library.id, fx.unit.id)
        .await
        .unwrap();

    assert_eq!(result.ontology.ontology_owl, "<owl/>");
    assert_eq!(result.interface.function_name, "is_eligible");
    assert_eq!(result.configuration.configuration_owl, "<cfg/>");
    assert!(result.logic.code.ends_with("return income < 1000"));
    assert_eq!(result.tests.len(), 2);

    let names: Vec<String> = fx
        .svc
        .list_tests(fx.unit.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["low", "high"]);

    let prompts = orchestrator.generator().prompts();
    assert_eq!(prompts.len(), 5);
    for (prompt, key) in prompts.iter().zip([
        "`ontology_owl`",
        "function_name",
        "`configuration_owl`",
        "`tests`",
        "`code`",
    ]) {
        assert!(prompt.contains(key), "expected {key} in {prompt}");
    }
}

#[tokio::test]
async fn generate_all_with_unconfigured_client_stores_stub_artifacts() {
    let fx = fixture("§1 text").await;
    let orchestrator = Orchestrator::new(GenerationClient::new(LlmConfig::default()).unwrap());

    let result = orchestrator
        .generate_all(&fx.svc, fx.library.id, fx.unit.id)
        .await
        .unwrap();

    assert!(result.ontology_raw.starts_with(STUB_PREFIX));
    assert_eq!(result.ontology.ontology_owl, result.ontology_raw);
    assert_eq!(result.interface.function_name, "Eligibility");
    assert!(!result.interface.inputs.is_empty());
    assert!(!result.configuration.configuration_owl.is_empty());
    assert_eq!(result.tests.len(), 1);
    assert_eq!(result.tests[0].name, "LLM Proposed Test");
    assert_eq!(result.logic.language, "Python");

    assert_eq!(
        fx.svc.get_ontology(fx.unit.id).await.unwrap(),
        Some(result.ontology)
    );
    assert_eq!(
        fx.svc.get_logic(fx.unit.id).await.unwrap(),
        Some(result.logic)
    );
}

#[tokio::test]
async fn segmentation_keeps_first_five_in_order() {
    let fx = fixture("§1 ... §7").await;
    let segments: Vec<_> = (1..=7)
        .map(|i| json!({"title": format!("Rule {i}"), "description": "d", "legal_text": "t", "legal_reference": format!("§{i}")}))
        .collect();
    let orchestrator =
        Orchestrator::new(ScriptedGenerator::new([json!({"segments": segments}).to_string()]));

    let created = orchestrator
        .segment_library(&fx.svc, fx.library.id)
        .await
        .unwrap();
    assert_eq!(created.len(), 5);

    let stored: Vec<String> = fx
        .svc
        .list_suggestions(fx.library.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(stored, vec!["Rule 1", "Rule 2", "Rule 3", "Rule 4", "Rule 5"]);

    let prompt = &orchestrator.generator().prompts()[0];
    assert!(prompt.contains("Law: Housing Benefit Act (HBA-2024)"));
}

#[tokio::test]
async fn segmentation_is_append_only_with_fallback() {
    let fx = fixture("§1 A household with income below 1000 is eligible.").await;
    let orchestrator = Orchestrator::new(ScriptedGenerator::new(["no json", "still none"]));

    orchestrator.segment_library(&fx.svc, fx.library.id).await.unwrap();
    let second = orchestrator
        .segment_library(&fx.svc, fx.library.id)
        .await
        .unwrap();

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].title, "Segmentation unavailable");
    assert_eq!(second[0].description.as_deref(), Some("still none"));
    assert_eq!(second[0].legal_text, fx.library.full_text);
    assert_eq!(fx.svc.list_suggestions(fx.library.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn segmentation_requires_full_text() {
    let fx = fixture("   ").await;
    let orchestrator = Orchestrator::new(ScriptedGenerator::default());

    let err = orchestrator
        .segment_library(&fx.svc, fx.library.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ArtifactError::MissingSourceText { .. }), "{err}");
    assert!(orchestrator.generator().prompts().is_empty());
}

#[tokio::test]
async fn single_test_generation_appends() {
    let fx = fixture("§1 text").await;
    fx.svc.insert_tests(fx.unit.id, &[old_test("kept")]).await.unwrap();
    let orchestrator = Orchestrator::new(ScriptedGenerator::new([
        json!({"tests": [{"name": "new", "input": {"income": 10}}]}).to_string(),
    ]));

    let created = orchestrator
        .generate_tests(&fx.svc, fx.library.id, fx.unit.id)
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].input, json!({"income": 10}));
    assert_eq!(fx.svc.list_tests(fx.unit.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn generate_is_an_upsert() {
    let fx = fixture("§1 text").await;
    let orchestrator = Orchestrator::new(ScriptedGenerator::new([
        "Here:\n```json\n{\"ontology_owl\": \"first\"}\n```",
        "{\"ontology_owl\": \"second\"}",
    ]));

    let first = orchestrator
        .generate_ontology(&fx.svc, fx.library.id, fx.unit.id)
        .await
        .unwrap();
    assert_eq!(first.ontology_owl, "first");

    orchestrator
        .generate_ontology(&fx.svc, fx.library.id, fx.unit.id)
        .await
        .unwrap();
    let stored = fx.svc.get_ontology(fx.unit.id).await.unwrap().unwrap();
    assert_eq!(stored.ontology_owl, "second");
    assert_eq!(stored.raw_response.as_deref(), Some("{\"ontology_owl\": \"second\"}"));
}

#[tokio::test]
async fn interface_configuration_and_logic_generate() {
    let fx = fixture("§1 text").await;
    let orchestrator = Orchestrator::new(ScriptedGenerator::new([
        "plain interface text",
        "{\"configuration_owl\": \"<cfg/>\"}",
        "{\"code\": \"pass\"}",
    ]));

    let interface = orchestrator
        .generate_interface(&fx.svc, fx.library.id, fx.unit.id)
        .await
        .unwrap();
    assert_eq!(interface.function_name, "Eligibility");
    assert_eq!(interface.mcp_spec, Some(json!({"hint": "plain interface text"})));

    let configuration = orchestrator
        .generate_configuration(&fx.svc, fx.library.id, fx.unit.id)
        .await
        .unwrap();
    assert_eq!(configuration.configuration_owl, "<cfg/>");

    let logic = orchestrator
        .generate_logic(&fx.svc, fx.library.id, fx.unit.id)
        .await
        .unwrap();
    assert_eq!(logic.language, "Python");
    assert_eq!(logic.code, "# LLM Hint: {\"code\": \"pass\"}\npass");
}

#[tokio::test]
async fn unit_in_another_library_is_not_found() {
    let fx = fixture("§1 text").await;
    let orchestrator = Orchestrator::new(ScriptedGenerator::default());

    let err = orchestrator
        .generate_all(&fx.svc, fx.library.id + 1, fx.unit.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(orchestrator.generator().prompts().is_empty());
}
