//! Persisted layout
//!
//! Two tables: a registry mapping document ids to names, and the node table
//! holding every document's value tree in nested-set form. Only two indexes
//! are maintained on the node table: the unique `(doc_id, full_path)` point
//! index and the `(doc_id, lft, rgt)` range index.

use crate::sql::sql_err;
use arbor_core::ArborResult;
use rusqlite::Connection;
use tracing::debug;

/// Version written to `PRAGMA user_version`
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS nodes (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    doc_id    INTEGER NOT NULL REFERENCES documents(id),
    full_path TEXT NOT NULL,
    leaf_name TEXT NOT NULL,
    type      INTEGER NOT NULL,
    value     TEXT,
    lft       INTEGER NOT NULL,
    rgt       INTEGER NOT NULL,
    CHECK (rgt > lft)
);

CREATE UNIQUE INDEX IF NOT EXISTS nodes_by_path ON nodes (doc_id, full_path);
CREATE INDEX IF NOT EXISTS nodes_by_bounds ON nodes (doc_id, lft, rgt);
";

/// Create tables and indexes if they do not exist
pub fn initialize(conn: &Connection) -> ArborResult<()> {
    let version: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(sql_err)?;
    conn.execute_batch(SCHEMA).map_err(sql_err)?;
    if version == 0 {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(sql_err)?;
        debug!(version = SCHEMA_VERSION, "created node schema");
    }
    Ok(())
}
