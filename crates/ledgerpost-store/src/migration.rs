//! SQLite schema versions.
//!
//! `MIGRATIONS[n]` takes the schema from version `n` to `n + 1`. Applied
//! versions are recorded in `schema_migrations`; a database that records a
//! version this build does not know is refused.

use rusqlite::{params, Connection};

use ledgerpost_core::now_millis;

use crate::error::{Result, StoreError};

const MIGRATIONS: &[&str] = &[
    // v1: named integer slots and named CBOR chain snapshots.
    r#"
    CREATE TABLE slots (
        key TEXT PRIMARY KEY,
        value INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    );
    CREATE TABLE snapshots (
        name TEXT PRIMARY KEY,
        bytes BLOB NOT NULL,
        saved_at INTEGER NOT NULL
    );
    "#,
];

/// Schema version this build writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`]. A no-op on an up-to-date database.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
    )?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if applied > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "schema version {} is newer than this build's {}",
            applied, CURRENT_VERSION
        )));
    }

    let pending = &MIGRATIONS[applied as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (offset, sql) in pending.iter().enumerate() {
        let version = applied + offset as u32 + 1;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, now_millis()],
        )?;
        tracing::debug!(version, "applied schema migration");
    }
    tx.commit()?;
    Ok(())
}
