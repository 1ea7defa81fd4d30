//! Transactional application of a full generation pass to one unit.
//!
//! Singleton artifacts are upserted; the unit's tests are deleted and
//! replaced by the newly generated set. Either everything commits or nothing
//! does.

use chrono::Utc;

use dtl_core::entities::{Configuration, Interface, Logic, Ontology, TestCase};
use dtl_core::payloads::NewTestCase;

use crate::error::DatabaseError;
use crate::repos::configuration::upsert_configuration;
use crate::repos::interface::upsert_interface;
use crate::repos::logic::upsert_logic;
use crate::repos::ontology::upsert_ontology;
use crate::repos::test_case::{delete_tests_for_unit, insert_test};
use crate::service::DtlService;

/// Every artifact produced by one generate-all pass, ready to persist.
#[derive(Debug, Clone)]
pub struct GeneratedArtifacts {
    pub ontology: Ontology,
    pub interface: Interface,
    pub configuration: Configuration,
    pub tests: Vec<NewTestCase>,
    pub logic: Logic,
}

/// The values actually stored by [`DtlService::apply_generation`].
#[derive(Debug, Clone)]
pub struct StoredArtifacts {
    pub ontology: Ontology,
    pub interface: Interface,
    pub configuration: Configuration,
    pub tests: Vec<TestCase>,
    pub logic: Logic,
}

impl DtlService {
    pub async fn apply_generation(
        &self,
        unit_id: i64,
        generated: &GeneratedArtifacts,
    ) -> Result<StoredArtifacts, DatabaseError> {
        let tx = self.conn().transaction().await?;

        let ontology = upsert_ontology(&tx, unit_id, &generated.ontology).await?;
        let interface = upsert_interface(&tx, unit_id, &generated.interface).await?;
        let configuration = upsert_configuration(&tx, unit_id, &generated.configuration).await?;

        let removed = delete_tests_for_unit(&tx, unit_id).await?;
        let now = Utc::now();
        let mut tests = Vec::with_capacity(generated.tests.len());
        for new in &generated.tests {
            tests.push(insert_test(&tx, unit_id, new, now).await?);
        }

        let logic = upsert_logic(&tx, unit_id, &generated.logic).await?;
        tx.commit().await?;

        tracing::debug!(
            unit_id,
            removed_tests = removed,
            new_tests = tests.len(),
            "applied generated artifacts"
        );
        Ok(StoredArtifacts {
            ontology,
            interface,
            configuration,
            tests,
            logic,
        })
    }
}
