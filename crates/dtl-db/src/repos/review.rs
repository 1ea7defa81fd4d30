//! Review repository: lazily-created workflow state per unit.
//!
//! `approve` and `request_revision` are unconditional setters; neither checks
//! the current status.

use chrono::Utc;

use dtl_core::entities::{Review, Unit};
use dtl_core::enums::ReviewStatus;
use dtl_core::payloads::ReviewPayload;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_enum, parse_optional_datetime};
use crate::service::DtlService;

fn row_to_review(row: &libsql::Row) -> Result<Review, DatabaseError> {
    Ok(Review {
        status: parse_enum(&row.get::<String>(0)?)?,
        approved_version: get_opt_string(row, 1)?,
        approved_at: parse_optional_datetime(get_opt_string(row, 2)?.as_deref())?,
        last_comment: get_opt_string(row, 3)?,
    })
}

impl DtlService {
    async fn fetch_review(&self, unit_id: i64) -> Result<Review, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT status, approved_version, approved_at, last_comment
                 FROM unit_reviews WHERE unit_id = ?1",
                [unit_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_review(&row)
    }

    /// Read the unit's review, creating a `Pending` one on first access.
    pub async fn get_or_create_review(&self, unit_id: i64) -> Result<Review, DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO unit_reviews (unit_id, status, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(unit_id) DO NOTHING",
                libsql::params![
                    unit_id,
                    ReviewStatus::Pending.as_str(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        self.fetch_review(unit_id).await
    }

    /// Mark the unit approved. The approved version comes from the payload,
    /// falling back to the unit's current version; `last_comment` becomes the
    /// payload comment (cleared when absent).
    pub async fn approve_unit(
        &self,
        unit: &Unit,
        payload: &ReviewPayload,
    ) -> Result<Review, DatabaseError> {
        let now = Utc::now();
        let version = payload
            .approved_version
            .clone()
            .unwrap_or_else(|| unit.version.clone());
        self.conn()
            .execute(
                "INSERT INTO unit_reviews (unit_id, status, approved_version, approved_at,
                     last_comment, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?4)
                 ON CONFLICT(unit_id) DO UPDATE SET
                     status = excluded.status,
                     approved_version = excluded.approved_version,
                     approved_at = excluded.approved_at,
                     last_comment = excluded.last_comment,
                     updated_at = excluded.updated_at",
                libsql::params![
                    unit.id,
                    ReviewStatus::Approved.as_str(),
                    version,
                    now.to_rfc3339(),
                    payload.comment.as_deref()
                ],
            )
            .await?;
        tracing::debug!(unit_id = unit.id, "unit approved");
        self.fetch_review(unit.id).await
    }

    /// Request a revision. Prior approval fields are left untouched.
    pub async fn request_revision(
        &self,
        unit_id: i64,
        payload: &ReviewPayload,
    ) -> Result<Review, DatabaseError> {
        self.conn()
            .execute(
                "INSERT INTO unit_reviews (unit_id, status, last_comment, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(unit_id) DO UPDATE SET
                     status = excluded.status,
                     last_comment = excluded.last_comment,
                     updated_at = excluded.updated_at",
                libsql::params![
                    unit_id,
                    ReviewStatus::RevisionRequested.as_str(),
                    payload.comment.as_deref(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        self.fetch_review(unit_id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::{seed_unit, test_service};
    use dtl_core::enums::ReviewStatus;
    use dtl_core::payloads::ReviewPayload;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_read_creates_pending() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;

        let review = svc.get_or_create_review(unit.id).await.unwrap();
        assert_eq!(review.status, ReviewStatus::Pending);
        assert_eq!(review.approved_at, None);

        // Second read returns the same row rather than resetting it.
        svc.request_revision(unit.id, &ReviewPayload::default())
            .await
            .unwrap();
        let again = svc.get_or_create_review(unit.id).await.unwrap();
        assert_eq!(again.status, ReviewStatus::RevisionRequested);
    }

    #[tokio::test]
    async fn approve_then_request_revision_keeps_approval_fields() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;
        svc.get_or_create_review(unit.id).await.unwrap();

        let approved = svc
            .approve_unit(&unit, &ReviewPayload::default())
            .await
            .unwrap();
        assert_eq!(approved.status, ReviewStatus::Approved);
        assert_eq!(approved.approved_version.as_deref(), Some("1.0"));
        assert!(approved.approved_at.is_some());
        assert_eq!(approved.last_comment, None);

        let revised = svc
            .request_revision(
                unit.id,
                &ReviewPayload {
                    comment: Some("needs evidence".into()),
                    approved_version: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(revised.status, ReviewStatus::RevisionRequested);
        assert_eq!(revised.last_comment.as_deref(), Some("needs evidence"));
        assert_eq!(revised.approved_version, approved.approved_version);
        assert_eq!(revised.approved_at, approved.approved_at);
    }

    #[tokio::test]
    async fn approve_without_prior_read_creates_review() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;

        let approved = svc
            .approve_unit(
                &unit,
                &ReviewPayload {
                    comment: Some("ship it".into()),
                    approved_version: Some("2.0".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(approved.approved_version.as_deref(), Some("2.0"));
        assert_eq!(approved.last_comment.as_deref(), Some("ship it"));
    }

    #[tokio::test]
    async fn approved_may_be_approved_again() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;
        let first = svc
            .approve_unit(&unit, &ReviewPayload::default())
            .await
            .unwrap();
        let second = svc
            .approve_unit(&unit, &ReviewPayload::default())
            .await
            .unwrap();
        assert_eq!(second.status, ReviewStatus::Approved);
        assert!(second.approved_at >= first.approved_at);
    }
}
