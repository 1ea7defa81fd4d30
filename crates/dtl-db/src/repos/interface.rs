//! Interface repository: at most one row per unit.

use chrono::Utc;

use dtl_core::entities::Interface;

use crate::error::DatabaseError;
use crate::helpers::{
    collect_rows, get_opt_string, parse_json, parse_optional_json, to_json_text,
    to_optional_json_text,
};
use crate::service::DtlService;

fn row_to_interface(row: &libsql::Row) -> Result<Interface, DatabaseError> {
    Ok(Interface {
        function_name: row.get(0)?,
        inputs: parse_json(&row.get::<String>(1)?)?,
        outputs: parse_json(&row.get::<String>(2)?)?,
        mcp_spec: parse_optional_json(get_opt_string(row, 3)?.as_deref())?,
    })
}

/// Create or overwrite the unit's interface. Returns the stored value.
pub(crate) async fn upsert_interface(
    conn: &libsql::Connection,
    unit_id: i64,
    interface: &Interface,
) -> Result<Interface, DatabaseError> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO unit_interface (unit_id, function_name, inputs, outputs, mcp_spec,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
         ON CONFLICT(unit_id) DO UPDATE SET
             function_name = excluded.function_name,
             inputs = excluded.inputs,
             outputs = excluded.outputs,
             mcp_spec = excluded.mcp_spec,
             updated_at = excluded.updated_at",
        libsql::params![
            unit_id,
            interface.function_name.as_str(),
            to_json_text(&interface.inputs)?,
            to_json_text(&interface.outputs)?,
            to_optional_json_text(interface.mcp_spec.as_ref())?,
            now
        ],
    )
    .await?;

    let mut stored = interface.clone();
    stored.mcp_spec = stored.mcp_spec.filter(|v| !v.is_null());
    Ok(stored)
}

/// Every persisted interface of a library's units, in unit display order.
pub(crate) async fn interfaces_for_library(
    conn: &libsql::Connection,
    library_id: i64,
) -> Result<Vec<Interface>, DatabaseError> {
    let rows = conn
        .query(
            "SELECT i.function_name, i.inputs, i.outputs, i.mcp_spec
             FROM unit_interface i JOIN units u ON u.id = i.unit_id
             WHERE u.library_id = ?1
             ORDER BY u.position, u.id",
            [library_id],
        )
        .await?;
    collect_rows(rows, row_to_interface).await
}

impl DtlService {
    pub async fn get_interface(&self, unit_id: i64) -> Result<Option<Interface>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT function_name, inputs, outputs, mcp_spec FROM unit_interface
                 WHERE unit_id = ?1",
                [unit_id],
            )
            .await?;
        rows.next().await?.map(|row| row_to_interface(&row)).transpose()
    }

    pub async fn save_interface(
        &self,
        unit_id: i64,
        interface: &Interface,
    ) -> Result<Interface, DatabaseError> {
        upsert_interface(self.conn(), unit_id, interface).await
    }
}
