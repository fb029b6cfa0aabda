//! Backend table versioning for the `SQLite` key-value store.
//!
//! This versions the `entries` / `metadata` layout only. The JSON stored under
//! each key is opaque here and never migrated.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The table layout version this build writes.
pub const CURRENT_VERSION: i32 = 1;

const VERSION_KEY: &str = "schema_version";

/// Create the tables if needed and stamp or check the layout version.
///
/// A fresh database is stamped with [`CURRENT_VERSION`]. A database written
/// by a newer build is refused rather than read with the wrong layout.
///
/// # Errors
///
/// Returns an error if the tables cannot be created, the stored version is
/// unreadable, or the version is newer than [`CURRENT_VERSION`].
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match stored_version(conn)? {
        None => {
            debug!("Stamping new database with layout version {}", CURRENT_VERSION);
            conn.execute(
                "INSERT INTO metadata (key, value) VALUES (?1, ?2)",
                (VERSION_KEY, CURRENT_VERSION.to_string()),
            )?;
        }
        Some(version) if version > CURRENT_VERSION => {
            return Err(Error::DatabaseMigration {
                message: format!(
                    "database layout version {version} is newer than supported version {CURRENT_VERSION}"
                ),
            });
        }
        Some(_) => {}
    }

    Ok(())
}

fn stored_version(conn: &Connection) -> Result<Option<i32>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|v| {
            v.parse().map_err(|_| Error::DatabaseMigration {
                message: format!("invalid layout version: {v}"),
            })
        })
        .transpose()
}
