//! Comment repository.

use chrono::Utc;

use dtl_core::entities::Comment;
use dtl_core::payloads::NewComment;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, get_opt_string, parse_datetime};
use crate::repos::user::user_exists;
use crate::service::DtlService;

const SELECT_COLS: &str = "id, unit_id, author_id, role, comment, comment_type, created_at";

fn row_to_comment(row: &libsql::Row) -> Result<Comment, DatabaseError> {
    Ok(Comment {
        id: row.get(0)?,
        unit_id: row.get(1)?,
        author_id: row.get(2)?,
        role: row.get(3)?,
        comment: row.get(4)?,
        comment_type: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl DtlService {
    /// Comments on a unit in creation order.
    pub async fn list_comments(&self, unit_id: i64) -> Result<Vec<Comment>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM unit_comments WHERE unit_id = ?1
                     ORDER BY created_at, id"
                ),
                [unit_id],
            )
            .await?;
        collect_rows(rows, row_to_comment).await
    }

    /// Add a comment. The author must be an existing user.
    pub async fn add_comment(
        &self,
        unit_id: i64,
        new: &NewComment,
    ) -> Result<Comment, DatabaseError> {
        if !user_exists(self.conn(), new.author_id).await? {
            return Err(DatabaseError::Validation(format!(
                "author user {} does not exist",
                new.author_id
            )));
        }

        let now = Utc::now();
        self.conn()
            .execute(
                "INSERT INTO unit_comments (unit_id, author_id, role, comment, comment_type,
                     created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    unit_id,
                    new.author_id,
                    new.role.as_str(),
                    new.comment.as_str(),
                    new.comment_type.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Comment {
            id: self.conn().last_insert_rowid(),
            unit_id,
            author_id: new.author_id,
            role: new.role.clone(),
            comment: new.comment.clone(),
            comment_type: new.comment_type.clone(),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DatabaseError;
    use crate::test_support::helpers::{seed_unit, test_service};
    use dtl_core::payloads::NewComment;
    use pretty_assertions::assert_eq;

    fn remark(author_id: i64, body: &str) -> NewComment {
        NewComment {
            comment: body.into(),
            role: "Viewer".into(),
            comment_type: None,
            author_id,
        }
    }

    #[tokio::test]
    async fn comments_listed_in_creation_order() {
        let (_env, svc) = test_service().await;
        let (library, unit) = seed_unit(&svc).await;

        for body in ["first", "second", "third"] {
            svc.add_comment(unit.id, &remark(library.created_by, body))
                .await
                .unwrap();
        }
        let bodies: Vec<String> = svc
            .list_comments(unit.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.comment)
            .collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn unknown_author_rejected_before_write() {
        let (_env, svc) = test_service().await;
        let (_, unit) = seed_unit(&svc).await;

        let err = svc.add_comment(unit.id, &remark(404, "hi")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)), "{err}");
        assert!(svc.list_comments(unit.id).await.unwrap().is_empty());
    }
}
