//! Database schema migrations for repairdesk.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use indoc::indoc;
use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current schema version, 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: weekly hours and the slot inventory.
///
/// `(slot_date, start_time)` is unique so that concurrent generators can
/// only ever insert a slot once.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(indoc! {"
        CREATE TABLE IF NOT EXISTS business_hours (
            weekday      INTEGER PRIMARY KEY CHECK (weekday BETWEEN 0 AND 6),
            open_time    TEXT NOT NULL,
            close_time   TEXT NOT NULL,
            break_start  TEXT,
            break_end    TEXT,
            is_active    INTEGER NOT NULL DEFAULT 1,
            updated_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS appointment_slots (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            slot_date    TEXT NOT NULL,
            start_time   TEXT NOT NULL,
            end_time     TEXT NOT NULL,
            status       TEXT NOT NULL DEFAULT 'available',
            created_at   TEXT NOT NULL,
            UNIQUE (slot_date, start_time)
        );

        CREATE INDEX IF NOT EXISTS idx_slots_date_status ON appointment_slots(slot_date, status);
    "})?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: per-date calendar exceptions.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(indoc! {"
        CREATE TABLE IF NOT EXISTS calendar_exceptions (
            exception_date TEXT PRIMARY KEY,
            kind           TEXT NOT NULL CHECK (kind IN ('closed', 'special_hours')),
            open_time      TEXT,
            close_time     TEXT,
            break_start    TEXT,
            break_end      TEXT,
            note           TEXT,
            updated_at     TEXT NOT NULL
        );
    "})?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            > 0
    }

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        assert!(table_exists(&conn, "business_hours"));
        assert!(table_exists(&conn, "appointment_slots"));
        assert!(table_exists(&conn, "calendar_exceptions"));
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn slot_identity_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let insert = "INSERT INTO appointment_slots (slot_date, start_time, end_time, created_at)
                      VALUES ('2025-03-03', '09:00', '09:30', '2025-03-01T00:00:00Z')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }
}
