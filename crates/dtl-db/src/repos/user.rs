//! User repository and startup bootstrap.

use chrono::Utc;

use dtl_core::entities::User;
use dtl_core::payloads::NewUser;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, parse_datetime};
use crate::service::DtlService;

const SELECT_COLS: &str = "id, external_id, display_name, email, created_at, updated_at";

/// The account created when the users table is empty at startup.
pub const DEFAULT_USER: (&str, &str, &str) = ("system", "System", "system@example.com");

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        external_id: row.get(1)?,
        display_name: row.get(2)?,
        email: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

async fn insert_user(conn: &libsql::Connection, new: &NewUser) -> Result<User, DatabaseError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO users (external_id, display_name, email, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            new.external_id.as_str(),
            new.display_name.as_str(),
            new.email.as_str(),
            now.to_rfc3339(),
            now.to_rfc3339()
        ],
    )
    .await?;

    Ok(User {
        id: conn.last_insert_rowid(),
        external_id: new.external_id.clone(),
        display_name: new.display_name.clone(),
        email: new.email.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub(crate) async fn user_exists(conn: &libsql::Connection, id: i64) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query("SELECT 1 FROM users WHERE id = ?1", [id])
        .await?;
    Ok(rows.next().await?.is_some())
}

impl DtlService {
    /// Create a user. Duplicate `external_id` or `email` is a validation error.
    pub async fn create_user(&self, new: &NewUser) -> Result<User, DatabaseError> {
        new.validate()?;

        let mut rows = self
            .conn()
            .query(
                "SELECT external_id FROM users WHERE external_id = ?1 OR email = ?2",
                libsql::params![new.external_id.as_str(), new.email.as_str()],
            )
            .await?;
        if let Some(row) = rows.next().await? {
            let existing: String = row.get(0)?;
            let field = if existing == new.external_id {
                "external_id"
            } else {
                "email"
            };
            return Err(DatabaseError::Validation(format!(
                "a user with this {field} already exists"
            )));
        }

        insert_user(self.conn(), new).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        let mut rows = self
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("user", id))?;
        row_to_user(&row)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let rows = self
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users ORDER BY id"), ())
            .await?;
        collect_rows(rows, row_to_user).await
    }

    /// Ensure at least one user exists, creating the `system` account if the
    /// table is empty. The check and insert share one transaction, so
    /// concurrent startups cannot both insert.
    ///
    /// Returns the lowest-id user (existing or newly created).
    pub async fn bootstrap_default_user(&self) -> Result<User, DatabaseError> {
        let tx = self.conn().transaction().await?;

        let mut rows = tx
            .query(
                &format!("SELECT {SELECT_COLS} FROM users ORDER BY id LIMIT 1"),
                (),
            )
            .await?;
        if let Some(row) = rows.next().await? {
            let user = row_to_user(&row)?;
            drop(rows);
            tx.commit().await?;
            return Ok(user);
        }
        drop(rows);

        let (external_id, display_name, email) = DEFAULT_USER;
        let user = insert_user(
            &tx,
            &NewUser {
                external_id: external_id.into(),
                display_name: display_name.into(),
                email: email.into(),
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "created default system user");
        Ok(user)
    }
}
