use rusqlite::Connection;
use shifty_core::db::migrations::latest_version;
use shifty_core::db::{open_db, open_db_in_memory, DbError};

#[test]
fn in_memory_database_has_full_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "teams");
    assert_table_exists(&conn, "team_members");
    assert_table_exists(&conn, "tasks");
    assert_column_exists(&conn, "team_members", "join_order");
}

#[test]
fn reopening_a_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shifty.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO teams (id, name, invite_code) VALUES ('t1', 'Ward', 'ABC123');",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let teams: i64 = second
        .query_row("SELECT COUNT(*) FROM teams;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(teams, 1);
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn inverted_date_range_is_rejected_by_storage() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO teams (id, name, invite_code) VALUES ('t1', 'Ward', 'ABC123');",
        [],
    )
    .unwrap();

    let result = conn.execute(
        "INSERT INTO tasks (id, team_id, title, date, end_date, category, assigned_to, created_by)
         VALUES ('x', 't1', 'Leave', '2025-06-12', '2025-06-10', 'personal', 'm', 'm');",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert!(exists, "table {table_name} does not exist");
}

fn assert_column_exists(conn: &Connection, table_name: &str, column: &str) {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table_name});"))
        .unwrap();
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(
        columns.iter().any(|name| name == column),
        "column {table_name}.{column} does not exist"
    );
}
