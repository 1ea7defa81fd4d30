//! Unit repository: CRUD scoped to the owning library.

use chrono::Utc;

use dtl_core::entities::Unit;
use dtl_core::payloads::NewUnit;

use crate::error::DatabaseError;
use crate::helpers::{
    collect_rows, get_opt_string, parse_datetime, parse_optional_json, to_optional_json_text,
};
use crate::service::DtlService;
use crate::updates::SetClauses;
use crate::updates::unit::UnitUpdate;

const SELECT_COLS: &str = "id, library_id, title, description, owner_user_id, version, \
     legal_text, legal_reference, source_url, classification, status, position, created_at, \
     updated_at";

fn row_to_unit(row: &libsql::Row) -> Result<Unit, DatabaseError> {
    Ok(Unit {
        id: row.get(0)?,
        library_id: row.get(1)?,
        title: row.get(2)?,
        description: get_opt_string(row, 3)?,
        owner_user_id: row.get::<Option<i64>>(4)?,
        version: row.get(5)?,
        legal_text: row.get(6)?,
        legal_reference: row.get(7)?,
        source_url: get_opt_string(row, 8)?,
        classification: parse_optional_json(get_opt_string(row, 9)?.as_deref())?,
        status: row.get(10)?,
        position: row.get(11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

pub(crate) async fn insert_unit(
    conn: &libsql::Connection,
    library_id: i64,
    new: &NewUnit,
) -> Result<Unit, DatabaseError> {
    let now = Utc::now();
    let classification = to_optional_json_text(new.classification.as_ref())?;
    conn.execute(
        "INSERT INTO units (library_id, title, description, owner_user_id, version, legal_text,
             legal_reference, source_url, classification, status, position, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        libsql::params![
            library_id,
            new.title.as_str(),
            new.description.as_deref(),
            new.owner_user_id,
            new.version.as_str(),
            new.legal_text.as_str(),
            new.legal_reference.as_str(),
            new.source_url.as_deref(),
            classification,
            new.status.as_str(),
            new.position,
            now.to_rfc3339(),
            now.to_rfc3339()
        ],
    )
    .await?;

    Ok(Unit {
        id: conn.last_insert_rowid(),
        library_id,
        title: new.title.clone(),
        description: new.description.clone(),
        owner_user_id: new.owner_user_id,
        version: new.version.clone(),
        legal_text: new.legal_text.clone(),
        legal_reference: new.legal_reference.clone(),
        source_url: new.source_url.clone(),
        classification: new.classification.clone().filter(|v| !v.is_null()),
        status: new.status.clone(),
        position: new.position,
        created_at: now,
        updated_at: now,
    })
}

pub(crate) async fn count_units(
    conn: &libsql::Connection,
    library_id: i64,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query("SELECT COUNT(*) FROM units WHERE library_id = ?1", [library_id])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get(0)?)
}

impl DtlService {
    /// Units of a library in display order (`position`, then id), optionally
    /// filtered by a case-insensitive substring of the title.
    pub async fn list_units(
        &self,
        library_id: i64,
        search: Option<&str>,
    ) -> Result<Vec<Unit>, DatabaseError> {
        self.get_library(library_id).await?;

        let rows = match search.filter(|s| !s.is_empty()) {
            Some(term) => {
                self.conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM units
                             WHERE library_id = ?1 AND title LIKE '%' || ?2 || '%'
                             ORDER BY position, id"
                        ),
                        libsql::params![library_id, term],
                    )
                    .await?
            }
            None => {
                self.conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM units WHERE library_id = ?1
                             ORDER BY position, id"
                        ),
                        [library_id],
                    )
                    .await?
            }
        };
        collect_rows(rows, row_to_unit).await
    }

    pub async fn create_unit(&self, library_id: i64, new: &NewUnit) -> Result<Unit, DatabaseError> {
        new.validate()?;
        self.get_library(library_id).await?;
        insert_unit(self.conn(), library_id, new).await
    }

    /// Fetch a unit that must belong to `library_id`.
    pub async fn get_unit(&self, library_id: i64, unit_id: i64) -> Result<Unit, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM units WHERE id = ?1 AND library_id = ?2"),
                libsql::params![unit_id, library_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("unit", unit_id))?;
        row_to_unit(&row)
    }

    pub async fn update_unit(
        &self,
        library_id: i64,
        unit_id: i64,
        update: &UnitUpdate,
    ) -> Result<Unit, DatabaseError> {
        self.get_unit(library_id, unit_id).await?;

        let mut sets = SetClauses::default();
        if let Some(ref v) = update.title {
            sets.push("title", v.clone());
        }
        if let Some(ref v) = update.description {
            sets.push_nullable("description", v.clone());
        }
        if let Some(v) = update.owner_user_id {
            sets.push_nullable("owner_user_id", v);
        }
        if let Some(ref v) = update.version {
            sets.push("version", v.clone());
        }
        if let Some(ref v) = update.legal_text {
            sets.push("legal_text", v.clone());
        }
        if let Some(ref v) = update.legal_reference {
            sets.push("legal_reference", v.clone());
        }
        if let Some(ref v) = update.source_url {
            sets.push_nullable("source_url", v.clone());
        }
        if let Some(ref v) = update.classification {
            sets.push_nullable("classification", to_optional_json_text(v.as_ref())?);
        }
        if let Some(ref v) = update.status {
            sets.push("status", v.clone());
        }
        if let Some(v) = update.position {
            sets.push("position", v);
        }

        if sets.is_empty() {
            return self.get_unit(library_id, unit_id).await;
        }
        sets.push("updated_at", Utc::now().to_rfc3339());

        let (sql, params) = sets.into_statement("units", unit_id);
        self.conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        self.get_unit(library_id, unit_id).await
    }

    /// Delete a unit and, by cascade, its artifacts, tests, and comments.
    pub async fn delete_unit(&self, library_id: i64, unit_id: i64) -> Result<(), DatabaseError> {
        let affected = self
            .conn()
            .execute(
                "DELETE FROM units WHERE id = ?1 AND library_id = ?2",
                libsql::params![unit_id, library_id],
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("unit", unit_id));
        }
        Ok(())
    }
}
