//! Ontology repository: at most one row per unit.

use chrono::Utc;

use dtl_core::entities::Ontology;

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::service::DtlService;

fn row_to_ontology(row: &libsql::Row) -> Result<Ontology, DatabaseError> {
    Ok(Ontology {
        ontology_owl: row.get(0)?,
        raw_response: get_opt_string(row, 1)?,
    })
}

/// Create or overwrite the unit's ontology. Returns the stored value.
pub(crate) async fn upsert_ontology(
    conn: &libsql::Connection,
    unit_id: i64,
    ontology: &Ontology,
) -> Result<Ontology, DatabaseError> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO unit_ontology (unit_id, ontology_owl, raw_response, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(unit_id) DO UPDATE SET
             ontology_owl = excluded.ontology_owl,
             raw_response = excluded.raw_response,
             updated_at = excluded.updated_at",
        libsql::params![
            unit_id,
            ontology.ontology_owl.as_str(),
            ontology.raw_response.as_deref(),
            now
        ],
    )
    .await?;
    Ok(ontology.clone())
}

impl DtlService {
    pub async fn get_ontology(&self, unit_id: i64) -> Result<Option<Ontology>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT ontology_owl, raw_response FROM unit_ontology WHERE unit_id = ?1",
                [unit_id],
            )
            .await?;
        rows.next().await?.map(|row| row_to_ontology(&row)).transpose()
    }

    /// Save a caller-supplied ontology. A missing `raw_response` defaults to
    /// the OWL text itself.
    pub async fn save_ontology(
        &self,
        unit_id: i64,
        ontology: &Ontology,
    ) -> Result<Ontology, DatabaseError> {
        let stored = Ontology {
            ontology_owl: ontology.ontology_owl.clone(),
            raw_response: Some(
                ontology
                    .raw_response
                    .clone()
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| ontology.ontology_owl.clone()),
            ),
        };
        upsert_ontology(self.conn(), unit_id, &stored).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{seed_unit, test_service};
    use dtl_core::entities::Ontology;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn absent_until_saved() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;
        assert_eq!(svc.get_ontology(unit.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_is_idempotent_single_row() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;
        let payload = Ontology {
            ontology_owl: "<owl:Class rdf:about=\"#Household\"/>".into(),
            raw_response: None,
        };

        let first = svc.save_ontology(unit.id, &payload).await.unwrap();
        let second = svc.save_ontology(unit.id, &payload).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.raw_response.as_deref(), Some(payload.ontology_owl.as_str()));
        assert_eq!(svc.get_ontology(unit.id).await.unwrap(), Some(first));

        let mut rows = svc
            .conn()
            .query("SELECT COUNT(*) FROM unit_ontology WHERE unit_id = ?1", [unit.id])
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn save_overwrites_in_place() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;
        for owl in ["<v1/>", "<v2/>"] {
            svc.save_ontology(
                unit.id,
                &Ontology {
                    ontology_owl: owl.into(),
                    raw_response: Some("raw".into()),
                },
            )
            .await
            .unwrap();
        }
        let stored = svc.get_ontology(unit.id).await.unwrap().unwrap();
        assert_eq!(stored.ontology_owl, "<v2/>");
        assert_eq!(stored.raw_response.as_deref(), Some("raw"));
    }
}
