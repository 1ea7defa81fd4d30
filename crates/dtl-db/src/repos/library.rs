//! Library repository: CRUD, search, and the overview snapshot.

use std::collections::BTreeMap;

use chrono::Utc;

use dtl_core::entities::Library;
use dtl_core::payloads::NewLibrary;
use dtl_core::responses::{OverviewSnapshot, TraceabilityEntry};

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, get_opt_string, parse_datetime, parse_optional_date};
use crate::repos::interface::interfaces_for_library;
use crate::repos::user::user_exists;
use crate::service::DtlService;
use crate::updates::SetClauses;
use crate::updates::library::LibraryUpdate;

const SELECT_COLS: &str = "id, law_name, law_identifier, jurisdiction, version, effective_date, \
     status, authoritative_source_url, repository_url, repository_branch, full_text, created_by, \
     created_at, updated_at";

fn row_to_library(row: &libsql::Row) -> Result<Library, DatabaseError> {
    Ok(Library {
        id: row.get(0)?,
        law_name: row.get(1)?,
        law_identifier: row.get(2)?,
        jurisdiction: row.get(3)?,
        version: row.get(4)?,
        effective_date: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        status: row.get(6)?,
        authoritative_source_url: get_opt_string(row, 7)?,
        repository_url: get_opt_string(row, 8)?,
        repository_branch: get_opt_string(row, 9)?,
        full_text: row.get(10)?,
        created_by: row.get(11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
    })
}

impl DtlService {
    /// List libraries, optionally filtered by a case-insensitive substring of
    /// `law_name`.
    pub async fn list_libraries(&self, search: Option<&str>) -> Result<Vec<Library>, DatabaseError> {
        let rows = match search.filter(|s| !s.is_empty()) {
            Some(term) => {
                self.conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM libraries
                             WHERE law_name LIKE '%' || ?1 || '%' ORDER BY id"
                        ),
                        [term],
                    )
                    .await?
            }
            None => {
                self.conn()
                    .query(&format!("SELECT {SELECT_COLS} FROM libraries ORDER BY id"), ())
                    .await?
            }
        };
        collect_rows(rows, row_to_library).await
    }

    /// Create a library. The creator must be an existing user.
    pub async fn create_library(&self, new: &NewLibrary) -> Result<Library, DatabaseError> {
        new.validate()?;
        if !user_exists(self.conn(), new.created_by).await? {
            return Err(DatabaseError::Validation(format!(
                "creator user {} does not exist",
                new.created_by
            )));
        }

        let now = Utc::now();
        self.conn()
            .execute(
                "INSERT INTO libraries (law_name, law_identifier, jurisdiction, version,
                     effective_date, status, authoritative_source_url, repository_url,
                     repository_branch, full_text, created_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                libsql::params![
                    new.law_name.as_str(),
                    new.law_identifier.as_str(),
                    new.jurisdiction.as_str(),
                    new.version.as_str(),
                    new.effective_date.map(|d| d.to_string()),
                    new.status.as_str(),
                    new.authoritative_source_url.as_deref(),
                    new.repository_url.as_deref(),
                    new.repository_branch.as_deref(),
                    new.full_text.as_str(),
                    new.created_by,
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Library {
            id: self.conn().last_insert_rowid(),
            law_name: new.law_name.clone(),
            law_identifier: new.law_identifier.clone(),
            jurisdiction: new.jurisdiction.clone(),
            version: new.version.clone(),
            effective_date: new.effective_date,
            status: new.status.clone(),
            authoritative_source_url: new.authoritative_source_url.clone(),
            repository_url: new.repository_url.clone(),
            repository_branch: new.repository_branch.clone(),
            full_text: new.full_text.clone(),
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_library(&self, id: i64) -> Result<Library, DatabaseError> {
        let mut rows = self
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM libraries WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("library", id))?;
        row_to_library(&row)
    }

    pub async fn update_library(
        &self,
        id: i64,
        update: &LibraryUpdate,
    ) -> Result<Library, DatabaseError> {
        // Surface not-found before attempting the write.
        self.get_library(id).await?;

        let mut sets = SetClauses::default();
        if let Some(ref v) = update.law_name {
            sets.push("law_name", v.clone());
        }
        if let Some(ref v) = update.law_identifier {
            sets.push("law_identifier", v.clone());
        }
        if let Some(ref v) = update.jurisdiction {
            sets.push("jurisdiction", v.clone());
        }
        if let Some(ref v) = update.version {
            sets.push("version", v.clone());
        }
        if let Some(v) = update.effective_date {
            sets.push_nullable("effective_date", v.map(|d| d.to_string()));
        }
        if let Some(ref v) = update.status {
            sets.push("status", v.clone());
        }
        if let Some(ref v) = update.authoritative_source_url {
            sets.push_nullable("authoritative_source_url", v.clone());
        }
        if let Some(ref v) = update.repository_url {
            sets.push_nullable("repository_url", v.clone());
        }
        if let Some(ref v) = update.repository_branch {
            sets.push_nullable("repository_branch", v.clone());
        }
        if let Some(ref v) = update.full_text {
            sets.push("full_text", v.clone());
        }

        if sets.is_empty() {
            return self.get_library(id).await;
        }
        sets.push("updated_at", Utc::now().to_rfc3339());

        let (sql, params) = sets.into_statement("libraries", id);
        self.conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        self.get_library(id).await
    }

    /// Delete a library and, by cascade, everything it owns.
    pub async fn delete_library(&self, id: i64) -> Result<(), DatabaseError> {
        let affected = self
            .conn()
            .execute("DELETE FROM libraries WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("library", id));
        }
        Ok(())
    }

    /// Library-wide summary for dashboards.
    pub async fn library_overview(&self, id: i64) -> Result<OverviewSnapshot, DatabaseError> {
        let library = self.get_library(id).await?;
        let units = self.list_units(id, None).await?;

        let mut status_counts: BTreeMap<String, u64> = BTreeMap::new();
        for unit in &units {
            *status_counts.entry(unit.status.clone()).or_default() += 1;
        }

        let traceability = units
            .iter()
            .map(|u| TraceabilityEntry {
                unit_id: u.id,
                legal_reference: u.legal_reference.clone(),
            })
            .collect();

        let interface_surface = interfaces_for_library(self.conn(), id).await?;

        Ok(OverviewSnapshot {
            library,
            units,
            status_counts,
            interface_surface,
            traceability,
        })
    }
}
