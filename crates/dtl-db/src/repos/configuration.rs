//! Configuration repository: at most one row per unit.

use chrono::Utc;

use dtl_core::entities::Configuration;

use crate::error::DatabaseError;
use crate::service::DtlService;

/// Create or overwrite the unit's configuration. Returns the stored value.
pub(crate) async fn upsert_configuration(
    conn: &libsql::Connection,
    unit_id: i64,
    configuration: &Configuration,
) -> Result<Configuration, DatabaseError> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO unit_configuration (unit_id, configuration_owl, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)
         ON CONFLICT(unit_id) DO UPDATE SET
             configuration_owl = excluded.configuration_owl,
             updated_at = excluded.updated_at",
        libsql::params![unit_id, configuration.configuration_owl.as_str(), now],
    )
    .await?;
    Ok(configuration.clone())
}

impl DtlService {
    pub async fn get_configuration(
        &self,
        unit_id: i64,
    ) -> Result<Option<Configuration>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT configuration_owl FROM unit_configuration WHERE unit_id = ?1",
                [unit_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(Configuration {
                configuration_owl: row.get(0)?,
            })),
            None => Ok(None),
        }
    }

    pub async fn save_configuration(
        &self,
        unit_id: i64,
        configuration: &Configuration,
    ) -> Result<Configuration, DatabaseError> {
        upsert_configuration(self.conn(), unit_id, configuration).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{seed_unit, test_service};
    use dtl_core::entities::Configuration;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn save_then_get() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;
        assert_eq!(svc.get_configuration(unit.id).await.unwrap(), None);

        let cfg = Configuration {
            configuration_owl: "<owl:DatatypeProperty rdf:about=\"#incomeLimit\"/>".into(),
        };
        assert_eq!(svc.save_configuration(unit.id, &cfg).await.unwrap(), cfg);
        assert_eq!(svc.get_configuration(unit.id).await.unwrap(), Some(cfg));
    }
}
