//! SQLite storage utilities.
//!
//! The engine only ever reads the taxonomy database, so connections are
//! opened read-only. Fixtures and tests create databases with
//! [`schema::create_schema`].

pub mod dump;
pub mod schema;
pub mod store;

pub use store::SqliteStore;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::{path::Path, time::Duration};

use crate::error::DatabaseNotFound;

/// Busy timeout used for taxonomy DB connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open an existing taxonomy database read-only and apply runtime pragmas.
///
/// # Errors
///
/// Returns an error if the file does not exist or opening/configuring the
/// database fails.
pub fn open(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(DatabaseNotFound {
            path: Some(path.to_path_buf()),
        }
        .into());
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("open taxonomy database {}", path.display()))?;

    configure_connection(&conn).context("configure sqlite pragmas")?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "query_only", "ON")?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BUSY_TIMEOUT, open};
    use crate::db::schema;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn temp_db() -> (TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("functional_use.db");
        let conn = Connection::open(&path).expect("create db");
        schema::create_schema(&conn).expect("create schema");
        (dir, path)
    }

    #[test]
    fn open_sets_busy_timeout_and_query_only() {
        let (_dir, path) = temp_db();
        let conn = open(&path).expect("open db");

        let busy_timeout_ms: u64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .expect("query busy_timeout");
        assert_eq!(
            u128::from(busy_timeout_ms),
            DEFAULT_BUSY_TIMEOUT.as_millis()
        );

        let query_only: i64 = conn
            .pragma_query_value(None, "query_only", |row| row.get(0))
            .expect("query query_only");
        assert_eq!(query_only, 1);
    }

    #[test]
    fn open_refuses_writes() {
        let (_dir, path) = temp_db();
        let conn = open(&path).expect("open db");
        let result = conn.execute(
            "INSERT INTO Classifications (id, classification) VALUES ('func_1', 'Solvents')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = open(&dir.path().join("nope.db")).unwrap_err();
        assert!(err.downcast_ref::<crate::error::DatabaseNotFound>().is_some(), "{err}");
    }
}
