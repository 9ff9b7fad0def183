//! Connection bootstrap.
//!
//! # Invariants
//! - Returned connections enforce foreign keys and have every migration applied.
//! - Each bootstrap logs exactly one `db_open` outcome line with its duration.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the store at `path`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    bootstrap("file", || Connection::open(path))
}

/// Opens a private in-memory store, mostly for tests and previews.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap("memory", Connection::open_in_memory)
}

fn bootstrap(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let outcome = connect().map_err(DbError::from).and_then(|mut conn| {
        prepare(&mut conn)?;
        Ok(conn)
    });
    let elapsed_ms = started_at.elapsed().as_millis();

    match &outcome {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={elapsed_ms} error={err}"
        ),
    }
    outcome
}

fn prepare(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
