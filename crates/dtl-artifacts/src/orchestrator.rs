//! Per-artifact generation, library segmentation, and generate-all.

use dtl_core::entities::{
    Configuration, Interface, Logic, Ontology, SegmentationSuggestion, TestCase,
};
use dtl_core::responses::GenerateAllResponse;
use dtl_db::repos::generation::GeneratedArtifacts;
use dtl_db::service::DtlService;
use dtl_llm::{JsonExtraction, TextGenerator, is_stub_response, prompts};

use crate::defaults;
use crate::error::ArtifactError;

/// Drives a [`TextGenerator`] to produce and persist artifacts.
///
/// Holds no connection; each call takes the request's [`DtlService`].
pub struct Orchestrator<G> {
    generator: G,
}

impl<G: TextGenerator> Orchestrator<G> {
    pub const fn new(generator: G) -> Self {
        Self { generator }
    }

    pub const fn generator(&self) -> &G {
        &self.generator
    }

    async fn ask(&self, kind: &'static str, unit_id: i64, prompt: &str) -> (String, JsonExtraction) {
        let (raw, parsed) = self.generator.generate_structured(prompt).await;
        tracing::debug!(
            kind,
            unit_id,
            stub = is_stub_response(&raw),
            parsed = parsed.is_found(),
            "generation response"
        );
        (raw, parsed)
    }

    /// # Errors
    ///
    /// Not-found if the unit is not in the library; store errors otherwise.
    pub async fn generate_ontology(
        &self,
        svc: &DtlService,
        library_id: i64,
        unit_id: i64,
    ) -> Result<Ontology, ArtifactError> {
        let unit = svc.get_unit(library_id, unit_id).await?;
        let prompt = prompts::ontology(&unit.title, &unit.legal_reference, &unit.legal_text);
        let (raw, parsed) = self.ask("ontology", unit.id, &prompt).await;
        Ok(svc
            .save_ontology(unit.id, &defaults::ontology(&raw, &parsed))
            .await?)
    }

    /// # Errors
    ///
    /// Not-found if the unit is not in the library; store errors otherwise.
    pub async fn generate_interface(
        &self,
        svc: &DtlService,
        library_id: i64,
        unit_id: i64,
    ) -> Result<Interface, ArtifactError> {
        let unit = svc.get_unit(library_id, unit_id).await?;
        let prompt = prompts::interface(&unit.title, &unit.legal_text);
        let (raw, parsed) = self.ask("interface", unit.id, &prompt).await;
        Ok(svc
            .save_interface(unit.id, &defaults::interface(&raw, &parsed, &unit.title))
            .await?)
    }

    /// # Errors
    ///
    /// Not-found if the unit is not in the library; store errors otherwise.
    pub async fn generate_configuration(
        &self,
        svc: &DtlService,
        library_id: i64,
        unit_id: i64,
    ) -> Result<Configuration, ArtifactError> {
        let unit = svc.get_unit(library_id, unit_id).await?;
        let prompt = prompts::configuration(&unit.title, &unit.legal_text);
        let (raw, parsed) = self.ask("configuration", unit.id, &prompt).await;
        Ok(svc
            .save_configuration(unit.id, &defaults::configuration(&raw, &parsed))
            .await?)
    }

    /// # Errors
    ///
    /// Not-found if the unit is not in the library; store errors otherwise.
    pub async fn generate_logic(
        &self,
        svc: &DtlService,
        library_id: i64,
        unit_id: i64,
    ) -> Result<Logic, ArtifactError> {
        let unit = svc.get_unit(library_id, unit_id).await?;
        let prompt = prompts::logic(&unit.title, &unit.legal_text);
        let (raw, parsed) = self.ask("logic", unit.id, &prompt).await;
        Ok(svc.save_logic(unit.id, &defaults::logic(&raw, &parsed)).await?)
    }

    /// Generate test cases and append them to the unit's existing tests.
    ///
    /// # Errors
    ///
    /// Not-found if the unit is not in the library; store errors otherwise.
    pub async fn generate_tests(
        &self,
        svc: &DtlService,
        library_id: i64,
        unit_id: i64,
    ) -> Result<Vec<TestCase>, ArtifactError> {
        let unit = svc.get_unit(library_id, unit_id).await?;
        let prompt = prompts::tests(&unit.title, &unit.legal_text);
        let (raw, parsed) = self.ask("tests", unit.id, &prompt).await;
        Ok(svc
            .insert_tests(unit.id, &defaults::tests(&raw, &parsed))
            .await?)
    }

    /// Propose units for a library from its full text. Existing suggestions
    /// are kept.
    ///
    /// # Errors
    ///
    /// [`ArtifactError::MissingSourceText`] if the library has no full text;
    /// not-found if the library does not exist.
    pub async fn segment_library(
        &self,
        svc: &DtlService,
        library_id: i64,
    ) -> Result<Vec<SegmentationSuggestion>, ArtifactError> {
        let library = svc.get_library(library_id).await?;
        if library.full_text.trim().is_empty() {
            return Err(ArtifactError::MissingSourceText { library_id });
        }

        let prompt = prompts::segmentation(
            &library.law_name,
            &library.law_identifier,
            &library.full_text,
        );
        let (raw, parsed) = self.generator.generate_structured(&prompt).await;
        let proposals = defaults::segments(&raw, &parsed, &library.full_text);
        tracing::info!(
            library_id,
            proposals = proposals.len(),
            stub = is_stub_response(&raw),
            "segmented library"
        );
        Ok(svc.insert_suggestions(library_id, &proposals).await?)
    }

    /// Generate every artifact for a unit, in the order ontology, interface,
    /// configuration, tests, logic, then store them together.
    ///
    /// Singleton artifacts are overwritten. The unit's tests are replaced by
    /// the generated set.
    ///
    /// # Errors
    ///
    /// Not-found if the unit is not in the library; store errors otherwise.
    /// Nothing is written if the store rejects any part.
    pub async fn generate_all(
        &self,
        svc: &DtlService,
        library_id: i64,
        unit_id: i64,
    ) -> Result<GenerateAllResponse, ArtifactError> {
        let unit = svc.get_unit(library_id, unit_id).await?;

        let prompt = prompts::ontology(&unit.title, &unit.legal_reference, &unit.legal_text);
        let (ontology_raw, parsed) = self.ask("ontology", unit.id, &prompt).await;
        let ontology = defaults::ontology(&ontology_raw, &parsed);

        let prompt = prompts::interface(&unit.title, &unit.legal_text);
        let (interface_raw, parsed) = self.ask("interface", unit.id, &prompt).await;
        let interface = defaults::interface(&interface_raw, &parsed, &unit.title);

        let prompt = prompts::configuration(&unit.title, &unit.legal_text);
        let (configuration_raw, parsed) = self.ask("configuration", unit.id, &prompt).await;
        let configuration = defaults::configuration(&configuration_raw, &parsed);

        let prompt = prompts::tests(&unit.title, &unit.legal_text);
        let (tests_raw, parsed) = self.ask("tests", unit.id, &prompt).await;
        let tests = defaults::tests(&tests_raw, &parsed);

        let prompt = prompts::logic(&unit.title, &unit.legal_text);
        let (logic_raw, parsed) = self.ask("logic", unit.id, &prompt).await;
        let logic = defaults::logic(&logic_raw, &parsed);

        let stored = svc
            .apply_generation(
                unit.id,
                &GeneratedArtifacts {
                    ontology,
                    interface,
                    configuration,
                    tests,
                    logic,
                },
            )
            .await?;

        tracing::info!(unit_id = unit.id, tests = stored.tests.len(), "generated all artifacts");
        Ok(GenerateAllResponse {
            ontology: stored.ontology,
            ontology_raw,
            interface: stored.interface,
            interface_raw,
            configuration: stored.configuration,
            configuration_raw,
            tests: stored.tests,
            tests_raw,
            logic: stored.logic,
            logic_raw,
        })
    }
}
