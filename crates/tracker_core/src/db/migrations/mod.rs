//! Ordered schema scripts for the tracker database.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per script.
//! - All pending scripts run in one transaction; `user_version` moves with
//!   each script inside it.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// `(version, file name, script)`.
const SCRIPTS: &[(u32, &str, &str)] = &[
    (1, "0001_init.sql", include_str!("0001_init.sql")),
    (2, "0002_settings.sql", include_str!("0002_settings.sql")),
];

/// Schema version a fully migrated tracker database carries.
pub fn latest_version() -> u32 {
    SCRIPTS.last().map_or(0, |(version, _, _)| *version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build.
/// - `Migration` naming the first script that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<_> = SCRIPTS
        .iter()
        .filter(|(version, _, _)| *version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for &&(version, name, sql) in &pending {
        tx.execute_batch(sql)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration {
                version,
                name,
                source,
            })?;
        debug!("event=db_migrate_step module=db status=ok version={version}");
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={supported} steps={}",
        pending.len()
    );
    Ok(())
}
