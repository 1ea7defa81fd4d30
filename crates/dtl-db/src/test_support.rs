//! Shared test utilities for dtl-db tests.

pub(crate) mod helpers {
    use dtl_core::entities::{Library, Unit, User};
    use dtl_core::payloads::{NewLibrary, NewUnit};
    use tempfile::TempDir;

    use crate::DtlDb;
    use crate::service::DtlService;

    /// A database in a temp directory. Keep it alive for the test's duration.
    pub struct TestEnv {
        pub dir: TempDir,
        pub path: String,
        pub db: DtlDb,
    }

    pub async fn test_db() -> TestEnv {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dtl.db").to_string_lossy().into_owned();
        let db = DtlDb::open_local(&path).await.unwrap();
        TestEnv {
            dir,
            path,
            db,
        }
    }

    /// A connected service plus the env that owns its database file.
    pub async fn test_service() -> (TestEnv, DtlService) {
        let env = test_db().await;
        let svc = env.db.connect().await.unwrap();
        (env, svc)
    }

    pub async fn seed_user(svc: &DtlService) -> User {
        svc.bootstrap_default_user().await.unwrap()
    }

    pub fn new_library(created_by: i64) -> NewLibrary {
        NewLibrary {
            law_name: "Housing Benefit Act".into(),
            law_identifier: "HBA-2024".into(),
            jurisdiction: "DE".into(),
            version: "2024.1".into(),
            effective_date: None,
            status: "Draft".into(),
            authoritative_source_url: None,
            repository_url: None,
            repository_branch: None,
            full_text: "§1 Eligibility. A household with income below 1000 is eligible.".into(),
            created_by,
        }
    }

    pub fn new_unit(title: &str, position: i64) -> NewUnit {
        NewUnit {
            title: title.into(),
            description: None,
            owner_user_id: None,
            version: "1.0".into(),
            legal_text: "A household with income below 1000 is eligible.".into(),
            legal_reference: "§1".into(),
            source_url: None,
            classification: None,
            status: "Draft".into(),
            position,
        }
    }

    pub async fn seed_library(svc: &DtlService) -> Library {
        let user = seed_user(svc).await;
        svc.create_library(&new_library(user.id)).await.unwrap()
    }

    /// Seed a user, a library, and one unit in it.
    pub async fn seed_unit(svc: &DtlService) -> (Library, Unit) {
        let library = seed_library(svc).await;
        let unit = svc
            .create_unit(library.id, &new_unit("Eligibility", 0))
            .await
            .unwrap();
        (library, unit)
    }
}
