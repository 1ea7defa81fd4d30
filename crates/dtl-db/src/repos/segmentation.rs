//! Segmentation suggestion repository: batch insert, listing, promotion.

use chrono::Utc;

use dtl_core::entities::{SegmentationSuggestion, Unit};
use dtl_core::enums::SuggestionStatus;
use dtl_core::payloads::{DEFAULT_STATUS, NewSuggestion, NewUnit};

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, get_opt_string, parse_datetime, parse_enum};
use crate::repos::unit::{count_units, insert_unit};
use crate::service::DtlService;

const SELECT_COLS: &str = "id, library_id, title, description, legal_text, legal_reference, \
     created_by, status, created_at";

/// Version assigned to units promoted from a suggestion.
pub const PROMOTED_UNIT_VERSION: &str = "1.0";

fn row_to_suggestion(row: &libsql::Row) -> Result<SegmentationSuggestion, DatabaseError> {
    Ok(SegmentationSuggestion {
        id: row.get(0)?,
        library_id: row.get(1)?,
        title: row.get(2)?,
        description: get_opt_string(row, 3)?,
        legal_text: row.get(4)?,
        legal_reference: row.get(5)?,
        created_by: row.get::<Option<i64>>(6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

/// Move a suggestion from `Proposed` to `Accepted`. Returns `false` when it
/// was not `Proposed` at write time (e.g. a concurrent promote got there first).
pub(crate) async fn claim_suggestion(
    conn: &libsql::Connection,
    library_id: i64,
    suggestion_id: i64,
) -> Result<bool, DatabaseError> {
    let updated = conn
        .execute(
            "UPDATE segmentation_suggestions SET status = ?1
             WHERE id = ?2 AND library_id = ?3 AND status = ?4",
            libsql::params![
                SuggestionStatus::Accepted.as_str(),
                suggestion_id,
                library_id,
                SuggestionStatus::Proposed.as_str()
            ],
        )
        .await?;
    Ok(updated == 1)
}

impl DtlService {
    /// Persist suggestions in input order, all in one transaction. Existing
    /// suggestions are never removed.
    pub async fn insert_suggestions(
        &self,
        library_id: i64,
        suggestions: &[NewSuggestion],
    ) -> Result<Vec<SegmentationSuggestion>, DatabaseError> {
        let now = Utc::now();
        let tx = self.conn().transaction().await?;
        let mut created = Vec::with_capacity(suggestions.len());
        for new in suggestions {
            tx.execute(
                "INSERT INTO segmentation_suggestions (library_id, title, description,
                     legal_text, legal_reference, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    library_id,
                    new.title.as_str(),
                    new.description.as_deref(),
                    new.legal_text.as_str(),
                    new.legal_reference.as_str(),
                    SuggestionStatus::Proposed.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;
            created.push(SegmentationSuggestion {
                id: tx.last_insert_rowid(),
                library_id,
                title: new.title.clone(),
                description: new.description.clone(),
                legal_text: new.legal_text.clone(),
                legal_reference: new.legal_reference.clone(),
                created_by: None,
                status: SuggestionStatus::Proposed,
                created_at: now,
            });
        }
        tx.commit().await?;
        Ok(created)
    }

    pub async fn list_suggestions(
        &self,
        library_id: i64,
    ) -> Result<Vec<SegmentationSuggestion>, DatabaseError> {
        self.get_library(library_id).await?;
        let rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM segmentation_suggestions WHERE library_id = ?1
                     ORDER BY id"
                ),
                [library_id],
            )
            .await?;
        collect_rows(rows, row_to_suggestion).await
    }

    pub async fn get_suggestion(
        &self,
        library_id: i64,
        suggestion_id: i64,
    ) -> Result<SegmentationSuggestion, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM segmentation_suggestions
                     WHERE id = ?1 AND library_id = ?2"
                ),
                libsql::params![suggestion_id, library_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("suggestion", suggestion_id))?;
        row_to_suggestion(&row)
    }

    /// Turn a proposed suggestion into a unit appended at the end of the
    /// library, and mark the suggestion accepted.
    pub async fn promote_suggestion(
        &self,
        library_id: i64,
        suggestion_id: i64,
    ) -> Result<Unit, DatabaseError> {
        let suggestion = self.get_suggestion(library_id, suggestion_id).await?;
        if !suggestion
            .status
            .can_transition_to(SuggestionStatus::Accepted)
        {
            return Err(DatabaseError::InvalidState(format!(
                "suggestion {suggestion_id} is already {}",
                suggestion.status
            )));
        }

        let tx = self.conn().transaction().await?;
        if !claim_suggestion(&tx, library_id, suggestion_id).await? {
            tx.rollback().await?;
            return Err(DatabaseError::InvalidState(format!(
                "suggestion {suggestion_id} is no longer {}",
                SuggestionStatus::Proposed
            )));
        }

        let position = count_units(&tx, library_id).await?;
        let unit = insert_unit(
            &tx,
            library_id,
            &NewUnit {
                title: suggestion.title,
                description: suggestion.description,
                owner_user_id: None,
                version: PROMOTED_UNIT_VERSION.to_string(),
                legal_text: suggestion.legal_text,
                legal_reference: suggestion.legal_reference,
                source_url: None,
                classification: None,
                status: DEFAULT_STATUS.to_string(),
                position,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(library_id, suggestion_id, unit_id = unit.id, "promoted suggestion");
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DatabaseError;
    use crate::test_support::helpers::{new_unit, seed_library, test_service};
    use super::claim_suggestion;
    use crate::service::DtlService;
    use dtl_core::enums::SuggestionStatus;
    use dtl_core::payloads::NewSuggestion;
    use pretty_assertions::assert_eq;

    fn suggestion(title: &str) -> NewSuggestion {
        NewSuggestion {
            title: title.into(),
            description: Some("d".into()),
            legal_text: "text".into(),
            legal_reference: "§2".into(),
        }
    }

    #[tokio::test]
    async fn insert_is_append_only() {
        let (_env, svc) = test_service().await;
        let library = seed_library(&svc).await;

        svc.insert_suggestions(library.id, &[suggestion("a"), suggestion("b")])
            .await
            .unwrap();
        svc.insert_suggestions(library.id, &[suggestion("c")])
            .await
            .unwrap();

        let titles: Vec<String> = svc
            .list_suggestions(library.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn promote_appends_unit_and_accepts() {
        let (_env, svc) = test_service().await;
        let library = seed_library(&svc).await;
        svc.create_unit(library.id, &new_unit("Existing", 0)).await.unwrap();
        let created = svc
            .insert_suggestions(library.id, &[suggestion("Benefit amount")])
            .await
            .unwrap();

        let unit = svc
            .promote_suggestion(library.id, created[0].id)
            .await
            .unwrap();
        assert_eq!(unit.title, "Benefit amount");
        assert_eq!(unit.version, "1.0");
        assert_eq!(unit.position, 1);
        assert_eq!(unit.legal_reference, "§2");

        let stored = svc.get_suggestion(library.id, created[0].id).await.unwrap();
        assert_eq!(stored.status, SuggestionStatus::Accepted);

        let err = svc
            .promote_suggestion(library.id, created[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)), "{err}");
        assert_eq!(svc.list_units(library.id, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn claim_succeeds_once() {
        let (env, svc) = test_service().await;
        let library = seed_library(&svc).await;
        let created = svc
            .insert_suggestions(library.id, &[suggestion("Benefit amount")])
            .await
            .unwrap();
        let suggestion_id = created[0].id;

        let other: DtlService = env.db.connect().await.unwrap();
        assert!(claim_suggestion(other.conn(), library.id, suggestion_id).await.unwrap());
        assert!(!claim_suggestion(svc.conn(), library.id, suggestion_id).await.unwrap());
        assert!(!claim_suggestion(svc.conn(), library.id + 1, suggestion_id).await.unwrap());
        assert_eq!(
            svc.get_suggestion(library.id, suggestion_id).await.unwrap().status,
            SuggestionStatus::Accepted
        );
    }

    #[tokio::test]
    async fn promote_after_another_connection_accepted_adds_no_unit() {
        let (env, svc) = test_service().await;
        let library = seed_library(&svc).await;
        let created = svc
            .insert_suggestions(library.id, &[suggestion("Benefit amount")])
            .await
            .unwrap();

        let other: DtlService = env.db.connect().await.unwrap();
        other.promote_suggestion(library.id, created[0].id).await.unwrap();

        let err = svc
            .promote_suggestion(library.id, created[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)), "{err}");
        assert_eq!(svc.list_units(library.id, None).await.unwrap().len(), 1);
    }
}
