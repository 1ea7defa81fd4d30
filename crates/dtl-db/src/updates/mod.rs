//! Partial-update types for entity mutations.
//!
//! Each update has `Option` fields; only `Some` fields generate SET clauses in
//! the dynamic UPDATE SQL. Nullable columns use `Option<Option<T>>` so a field
//! can be cleared (`Some(None)`) as well as left untouched (`None`). Updates
//! deserialize directly from request bodies and can also be assembled with
//! the builders.

pub mod library;
pub mod test_case;
pub mod unit;

/// Accumulates `column = ?N` fragments and their bound values.
#[derive(Default)]
pub(crate) struct SetClauses {
    sets: Vec<String>,
    params: Vec<libsql::Value>,
}

impl SetClauses {
    pub(crate) fn push(&mut self, column: &str, value: impl Into<libsql::Value>) {
        self.params.push(value.into());
        self.sets.push(format!("{column} = ?{}", self.params.len()));
    }

    pub(crate) fn push_nullable<T: Into<libsql::Value>>(&mut self, column: &str, value: Option<T>) {
        self.push(column, value.map_or(libsql::Value::Null, Into::into));
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Finish as `UPDATE {table} SET ... WHERE id = ?N`.
    pub(crate) fn into_statement(mut self, table: &str, id: i64) -> (String, Vec<libsql::Value>) {
        self.params.push(id.into());
        let sql = format!(
            "UPDATE {table} SET {} WHERE id = ?{}",
            self.sets.join(", "),
            self.params.len()
        );
        (sql, self.params)
    }
}
