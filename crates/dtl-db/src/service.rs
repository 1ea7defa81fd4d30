//! Request-scoped repository handle.
//!
//! `DtlService` owns one libSQL connection. All repo methods are implemented
//! as `impl DtlService` blocks under `repos/`. Multi-row writes open a
//! transaction on this connection and commit before returning; dropping an
//! uncommitted transaction rolls it back.

/// Repository access over a single connection.
pub struct DtlService {
    conn: libsql::Connection,
}

impl DtlService {
    pub(crate) const fn new(conn: libsql::Connection) -> Self {
        Self { conn }
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
