//! Sync event repository. Synchronization itself is stubbed: an attempt is
//! recorded as immediately completed with a placeholder commit.

use chrono::Utc;

use dtl_core::entities::SyncEvent;
use dtl_core::enums::SyncStatus;
use dtl_core::responses::SyncResponse;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::DtlService;

const SELECT_COLS: &str =
    "id, library_id, repository_url, branch, commit_id, message, status, created_at, completed_at";

pub const STUB_COMMIT_ID: &str = "stub";
pub const STUB_SYNC_MESSAGE: &str = "Sync placeholder";

fn row_to_sync_event(row: &libsql::Row) -> Result<SyncEvent, DatabaseError> {
    Ok(SyncEvent {
        id: row.get(0)?,
        library_id: row.get(1)?,
        repository_url: row.get(2)?,
        branch: row.get(3)?,
        commit_id: get_opt_string(row, 4)?,
        message: get_opt_string(row, 5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        completed_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
    })
}

impl DtlService {
    /// Record a sync of the library's linked repository.
    ///
    /// Fails validation if the library has no repository URL or branch.
    pub async fn sync_library(&self, library_id: i64) -> Result<SyncResponse, DatabaseError> {
        let library = self.get_library(library_id).await?;
        let (Some(repository_url), Some(branch)) =
            (library.repository_url, library.repository_branch)
        else {
            return Err(DatabaseError::Validation(
                "repository not configured".to_string(),
            ));
        };

        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO sync_events (library_id, repository_url, branch, commit_id, message,
                     status, created_at, completed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                libsql::params![
                    library_id,
                    repository_url.as_str(),
                    branch.as_str(),
                    STUB_COMMIT_ID,
                    STUB_SYNC_MESSAGE,
                    SyncStatus::Completed.as_str(),
                    now
                ],
            )
            .await?;

        tracing::info!(library_id, %repository_url, %branch, "recorded stub repository sync");
        Ok(SyncResponse {
            repository_url,
            branch,
            commit_id: Some(STUB_COMMIT_ID.to_string()),
        })
    }

    /// Sync history of a library, newest first.
    pub async fn list_sync_events(&self, library_id: i64) -> Result<Vec<SyncEvent>, DatabaseError> {
        self.get_library(library_id).await?;
        let rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM sync_events WHERE library_id = ?1
                     ORDER BY id DESC"
                ),
                [library_id],
            )
            .await?;
        collect_rows(rows, row_to_sync_event).await
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DatabaseError;
    use crate::test_support::helpers::{seed_library, test_service};
    use crate::updates::library::LibraryUpdateBuilder;
    use dtl_core::enums::SyncStatus;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn sync_requires_repository() {
        let (_env, svc) = test_service().await;
        let library = seed_library(&svc).await;
        let err = svc.sync_library(library.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)), "{err}");
        assert!(svc.list_sync_events(library.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sync_records_completed_stub_event() {
        let (_env, svc) = test_service().await;
        let library = seed_library(&svc).await;
        let update = LibraryUpdateBuilder::new()
            .repository(Some("https://git.example.org/hba".into()), Some("main".into()))
            .build();
        svc.update_library(library.id, &update).await.unwrap();

        let response = svc.sync_library(library.id).await.unwrap();
        assert_eq!(response.commit_id.as_deref(), Some("stub"));
        assert_eq!(response.branch, "main");

        let events = svc.list_sync_events(library.id).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, SyncStatus::Completed);
        assert_eq!(events[0].message.as_deref(), Some("Sync placeholder"));
        assert!(events[0].completed_at.is_some());
    }
}
