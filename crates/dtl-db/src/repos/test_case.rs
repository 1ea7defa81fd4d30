//! Test case repository: CRUD, batch insert, run stamping, run history.

use chrono::{DateTime, Utc};

use dtl_core::entities::{TestCase, TestRun};
use dtl_core::enums::TestResult;
use dtl_core::payloads::NewTestCase;
use dtl_core::responses::{RunTestsResponse, TestRunOutcome};

use crate::error::DatabaseError;
use crate::helpers::{
    collect_rows, get_opt_string, parse_datetime, parse_enum, parse_json, parse_optional_datetime,
    parse_optional_json, to_json_text,
};
use crate::service::DtlService;
use crate::updates::SetClauses;
use crate::updates::test_case::TestCaseUpdate;

const SELECT_COLS: &str = "id, unit_id, name, input, expected_output, description, last_run_at, \
     last_result, created_at, updated_at";

const RUN_COLS: &str = "id, test_id, executed_at, result, actual_output, notes";

/// Note attached to every recorded run until a logic sandbox exists.
pub const NOT_EXECUTED_NOTE: &str = "Execution is not available; the test was not run.";

fn row_to_test(row: &libsql::Row) -> Result<TestCase, DatabaseError> {
    Ok(TestCase {
        id: row.get(0)?,
        unit_id: row.get(1)?,
        name: row.get(2)?,
        input: parse_json(&row.get::<String>(3)?)?,
        expected_output: parse_json(&row.get::<String>(4)?)?,
        description: get_opt_string(row, 5)?,
        last_run_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        last_result: get_opt_string(row, 7)?
            .map(|s| parse_enum(&s))
            .transpose()?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

fn row_to_run(row: &libsql::Row) -> Result<TestRun, DatabaseError> {
    Ok(TestRun {
        id: row.get(0)?,
        test_id: row.get(1)?,
        executed_at: parse_datetime(&row.get::<String>(2)?)?,
        result: parse_enum(&row.get::<String>(3)?)?,
        actual_output: parse_optional_json(get_opt_string(row, 4)?.as_deref())?,
        notes: get_opt_string(row, 5)?,
    })
}

pub(crate) async fn insert_test(
    conn: &libsql::Connection,
    unit_id: i64,
    new: &NewTestCase,
    now: DateTime<Utc>,
) -> Result<TestCase, DatabaseError> {
    conn.execute(
        "INSERT INTO unit_tests (unit_id, name, input, expected_output, description,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        libsql::params![
            unit_id,
            new.name.as_str(),
            to_json_text(&new.input)?,
            to_json_text(&new.expected_output)?,
            new.description.as_deref(),
            now.to_rfc3339()
        ],
    )
    .await?;

    Ok(TestCase {
        id: conn.last_insert_rowid(),
        unit_id,
        name: new.name.clone(),
        input: new.input.clone(),
        expected_output: new.expected_output.clone(),
        description: new.description.clone(),
        last_run_at: None,
        last_result: None,
        created_at: now,
        updated_at: now,
    })
}

pub(crate) async fn delete_tests_for_unit(
    conn: &libsql::Connection,
    unit_id: i64,
) -> Result<u64, DatabaseError> {
    Ok(conn
        .execute("DELETE FROM unit_tests WHERE unit_id = ?1", [unit_id])
        .await?)
}

impl DtlService {
    pub async fn list_tests(&self, unit_id: i64) -> Result<Vec<TestCase>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM unit_tests WHERE unit_id = ?1 ORDER BY id"),
                [unit_id],
            )
            .await?;
        collect_rows(rows, row_to_test).await
    }

    pub async fn create_test(
        &self,
        unit_id: i64,
        new: &NewTestCase,
    ) -> Result<TestCase, DatabaseError> {
        insert_test(self.conn(), unit_id, new, Utc::now()).await
    }

    /// Append several tests in one transaction, preserving input order.
    pub async fn insert_tests(
        &self,
        unit_id: i64,
        tests: &[NewTestCase],
    ) -> Result<Vec<TestCase>, DatabaseError> {
        let tx = self.conn().transaction().await?;
        let now = Utc::now();
        let mut created = Vec::with_capacity(tests.len());
        for new in tests {
            created.push(insert_test(&tx, unit_id, new, now).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Fetch a test that must belong to `unit_id`.
    pub async fn get_test(&self, unit_id: i64, test_id: i64) -> Result<TestCase, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM unit_tests WHERE id = ?1 AND unit_id = ?2"),
                libsql::params![test_id, unit_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("test", test_id))?;
        row_to_test(&row)
    }

    pub async fn update_test(
        &self,
        unit_id: i64,
        test_id: i64,
        update: &TestCaseUpdate,
    ) -> Result<TestCase, DatabaseError> {
        self.get_test(unit_id, test_id).await?;

        let mut sets = SetClauses::default();
        if let Some(ref v) = update.name {
            sets.push("name", v.clone());
        }
        if let Some(ref v) = update.input {
            sets.push("input", to_json_text(v)?);
        }
        if let Some(ref v) = update.expected_output {
            sets.push("expected_output", to_json_text(v)?);
        }
        if let Some(ref v) = update.description {
            sets.push_nullable("description", v.clone());
        }

        if sets.is_empty() {
            return self.get_test(unit_id, test_id).await;
        }
        sets.push("updated_at", Utc::now().to_rfc3339());

        let (sql, params) = sets.into_statement("unit_tests", test_id);
        self.conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        self.get_test(unit_id, test_id).await
    }

    pub async fn delete_test(&self, unit_id: i64, test_id: i64) -> Result<(), DatabaseError> {
        let affected = self
            .conn()
            .execute(
                "DELETE FROM unit_tests WHERE id = ?1 AND unit_id = ?2",
                libsql::params![test_id, unit_id],
            )
            .await?;
        if affected == 0 {
            return Err(DatabaseError::not_found("test", test_id));
        }
        Ok(())
    }

    /// Stamp every test of the unit as run now with a `Not Run` result, and
    /// append a matching entry to each test's run history.
    pub async fn run_tests(&self, unit_id: i64) -> Result<RunTestsResponse, DatabaseError> {
        let tests = self.list_tests(unit_id).await?;
        let now = Utc::now().to_rfc3339();
        let result = TestResult::NotRun;

        let tx = self.conn().transaction().await?;
        let mut results = Vec::with_capacity(tests.len());
        for test in &tests {
            tx.execute(
                "UPDATE unit_tests SET last_run_at = ?1, last_result = ?2, updated_at = ?1
                 WHERE id = ?3",
                libsql::params![now.as_str(), result.as_str(), test.id],
            )
            .await?;
            tx.execute(
                "INSERT INTO test_runs (test_id, executed_at, result, notes)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![test.id, now.as_str(), result.as_str(), NOT_EXECUTED_NOTE],
            )
            .await?;
            results.push(TestRunOutcome {
                test_id: test.id,
                result,
            });
        }
        tx.commit().await?;

        Ok(RunTestsResponse { results })
    }

    /// Run history of one test, newest first.
    pub async fn list_test_runs(
        &self,
        unit_id: i64,
        test_id: i64,
    ) -> Result<Vec<TestRun>, DatabaseError> {
        self.get_test(unit_id, test_id).await?;
        let rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {RUN_COLS} FROM test_runs WHERE test_id = ?1
                     ORDER BY executed_at DESC, id DESC"
                ),
                [test_id],
            )
            .await?;
        collect_rows(rows, row_to_run).await
    }
}
