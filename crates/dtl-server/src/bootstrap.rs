use anyhow::Context;

use dtl_config::{DatabaseConfig, DtlConfig};
use dtl_db::DtlDb;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(bind: Option<&str>, database: Option<&str>) -> anyhow::Result<DtlConfig> {
    let mut config = DtlConfig::load_with_dotenv().context("failed to load configuration")?;
    if let Some(bind) = bind {
        config.server.bind = bind.to_string();
    }
    if let Some(url) = database {
        config.database.url = url.to_string();
    }
    if !config.llm.is_configured() {
        tracing::warn!("text generation is not configured; generate endpoints return stub output");
    }
    Ok(config)
}

/// Open the database (applying the schema) and ensure a default user exists.
pub async fn open_database(config: &DatabaseConfig) -> anyhow::Result<DtlDb> {
    let db = DtlDb::open(config)
        .await
        .with_context(|| format!("failed to open database at {}", config.url))?;
    let svc = db.connect().await.context("failed to connect to database")?;
    let user = svc
        .bootstrap_default_user()
        .await
        .context("failed to bootstrap default user")?;
    tracing::debug!(user_id = user.id, external_id = %user.external_id, "default user ready");
    Ok(db)
}
