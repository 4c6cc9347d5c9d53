//! Host store connection utilities.
//!
//! The resolver never writes to the host store, so connections opened here
//! are read-only:
//! - `SQLITE_OPEN_READ_ONLY` at the file level
//! - `query_only = ON` so a stray write fails fast
//! - `busy_timeout = 5s` to ride out host writers holding the lock

pub mod query;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::{path::Path, time::Duration};

/// Busy timeout used for host store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open an existing host store for reading.
///
/// # Errors
///
/// Returns an error if the file does not exist or the connection cannot be
/// configured.
pub fn open_store(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("open host store {}", path.display()))?;

    configure_connection(&conn).context("configure sqlite pragmas")?;
    Ok(conn)
}

/// Create (or reuse) a host store at `path` and install the schema.
///
/// Used by `elmap init-demo` and test fixtures; the resolver itself only
/// ever goes through [`open_store`].
///
/// # Errors
///
/// Returns an error if the parent directory, the database file, or the
/// schema cannot be created.
pub fn create_store(path: &Path, options: schema::SchemaOptions) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create store directory {}", parent.display()))?;
    }

    let conn =
        Connection::open(path).with_context(|| format!("create host store {}", path.display()))?;
    schema::apply(&conn, options).context("apply host schema")?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "query_only", "ON")?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BUSY_TIMEOUT, create_store, open_store, schema::SchemaOptions};
    use tempfile::TempDir;

    fn temp_db_path() -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("host").join("craft.sqlite3");
        (dir, path)
    }

    #[test]
    fn open_store_is_read_only_with_busy_timeout() {
        let (_dir, path) = temp_db_path();
        drop(create_store(&path, SchemaOptions::default()).expect("create store"));

        let conn = open_store(&path).expect("open store");

        let busy_timeout_ms: u64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .expect("query busy_timeout");
        assert_eq!(
            u128::from(busy_timeout_ms),
            DEFAULT_BUSY_TIMEOUT.as_millis()
        );

        let write = conn.execute("INSERT INTO sites (id, handle, name) VALUES (1, 'a', 'A')", []);
        assert!(write.is_err(), "read-only store must reject writes");
    }

    #[test]
    fn open_store_fails_for_missing_file() {
        let (_dir, path) = temp_db_path();
        assert!(open_store(&path).is_err());
    }
}
