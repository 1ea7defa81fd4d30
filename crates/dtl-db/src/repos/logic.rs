//! Logic repository: at most one row per unit.

use chrono::Utc;

use dtl_core::entities::Logic;

use crate::error::DatabaseError;
use crate::service::DtlService;

/// Create or overwrite the unit's logic. Returns the stored value.
pub(crate) async fn upsert_logic(
    conn: &libsql::Connection,
    unit_id: i64,
    logic: &Logic,
) -> Result<Logic, DatabaseError> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO unit_logic (unit_id, language, code, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(unit_id) DO UPDATE SET
             language = excluded.language,
             code = excluded.code,
             updated_at = excluded.updated_at",
        libsql::params![unit_id, logic.language.as_str(), logic.code.as_str(), now],
    )
    .await?;
    Ok(logic.clone())
}

impl DtlService {
    pub async fn get_logic(&self, unit_id: i64) -> Result<Option<Logic>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT language, code FROM unit_logic WHERE unit_id = ?1",
                [unit_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(Logic {
                language: row.get(0)?,
                code: row.get(1)?,
            })),
            None => Ok(None),
        }
    }

    pub async fn save_logic(&self, unit_id: i64, logic: &Logic) -> Result<Logic, DatabaseError> {
        upsert_logic(self.conn(), unit_id, logic).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{seed_unit, test_service};
    use dtl_core::entities::Logic;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn save_overwrites_language_and_code() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;

        svc.save_logic(
            unit.id,
            &Logic {
                language: "Python".into(),
                code: "pass".into(),
            },
        )
        .await
        .unwrap();
        let next = Logic {
            language: "TypeScript".into(),
            code: "export const eligible = () => true;".into(),
        };
        svc.save_logic(unit.id, &next).await.unwrap();

        assert_eq!(svc.get_logic(unit.id).await.unwrap(), Some(next));
    }
}
