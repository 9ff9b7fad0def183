//! Ordered schema steps for the schedule store.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - Pending steps and the `user_version` bump commit together or not at all.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, sql)` pairs, applied in order.
const STEPS: &[(u32, &str)] = &[
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_member_order.sql")),
];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    STEPS.iter().map(|(version, _)| *version).max().unwrap_or(0)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `DbError::SchemaTooNew` when the store is ahead of this build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&(u32, &str)> = STEPS.iter().filter(|(version, _)| *version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={found} to={supported}");
    Ok(())
}
