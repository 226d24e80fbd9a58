//! Database schema migrations for SQLite.
//!
//! Each schema version is reached from its predecessor by one SQL migration.
//! Applied versions are recorded in the `schema_version` table; the newest
//! row is the current version.

use rusqlite::{params, Connection, OptionalExtension};

use reportdb_core::io::{V4, V5};
use reportdb_core::{IoVersion, Schemas, Version};

use crate::error::{Result, StoreError};

/// Every schema version, oldest first, with the interchange version it accepts.
pub const VERSIONS: [(Version, IoVersion); 3] = [
    (Version::new(4, 0), V4),
    (Version::new(4, 1), V4),
    (Version::new(5, 0), V5),
];

/// The schema history as a driver exposes it.
pub fn schemas() -> Schemas {
    VERSIONS.iter().copied().collect()
}

/// Read the current schema version, or `None` for an empty database.
pub fn current(conn: &Connection) -> Result<Option<Version>> {
    let has_table: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if has_table.is_none() {
        return Ok(None);
    }

    let version = conn
        .query_row(
            "SELECT major, minor FROM schema_version ORDER BY major DESC, minor DESC LIMIT 1",
            [],
            |row| Ok(Version::new(row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(version)
}

/// Migrate the database from `from` (`None` = empty) to `target`.
///
/// All steps run in one transaction: either the database ends at `target`
/// or it is left untouched.
pub fn migrate(conn: &mut Connection, from: Option<Version>, target: Version) -> Result<()> {
    if !VERSIONS.iter().any(|(v, _)| *v == target) {
        return Err(StoreError::Migration(format!(
            "unknown schema version: {}",
            target
        )));
    }

    let tx = conn.transaction()?;

    if from.is_none() {
        tx.execute(
            "CREATE TABLE schema_version (
                major INTEGER NOT NULL,
                minor INTEGER NOT NULL,
                applied_at INTEGER NOT NULL,
                PRIMARY KEY (major, minor)
            )",
            [],
        )?;
    }

    for (version, _) in VERSIONS
        .iter()
        .filter(|(v, _)| from.map_or(true, |f| *v > f) && *v <= target)
    {
        apply_migration(&tx, *version)?;

        tx.execute(
            "INSERT INTO schema_version (major, minor, applied_at) VALUES (?1, ?2, ?3)",
            params![version.major, version.minor, now_millis()],
        )?;
        tracing::debug!("applied SQLite schema {}", version);
    }

    tx.commit()?;
    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: Version) -> Result<()> {
    match (version.major, version.minor) {
        (4, 0) => apply_v4_0(conn),
        (4, 1) => apply_v4_1(conn),
        (5, 0) => apply_v5_0(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration 4.0: checkouts, builds and tests.
fn apply_v4_0(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE checkouts (
            id TEXT PRIMARY KEY,
            origin TEXT NOT NULL,
            git_repository_url TEXT,
            git_commit_hash TEXT,
            git_repository_branch TEXT,
            start_time TEXT,
            valid INTEGER                     -- NULL = unknown
        );

        CREATE TABLE builds (
            id TEXT PRIMARY KEY,
            checkout_id TEXT NOT NULL,
            origin TEXT NOT NULL,
            architecture TEXT,
            config_name TEXT,
            compiler TEXT,
            start_time TEXT,
            duration REAL,
            valid INTEGER
        );

        CREATE TABLE tests (
            id TEXT PRIMARY KEY,
            build_id TEXT NOT NULL,
            origin TEXT NOT NULL,
            path TEXT,
            status TEXT,                      -- PASS, FAIL, ERROR, SKIP, ...
            waived INTEGER,
            start_time TEXT,
            duration REAL
        );
        "#,
    )?;
    Ok(())
}

/// Migration 4.1: log excerpts and lookup indexes.
fn apply_v4_1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        ALTER TABLE builds ADD COLUMN log_excerpt TEXT;
        ALTER TABLE tests ADD COLUMN log_excerpt TEXT;

        CREATE INDEX idx_builds_checkout ON builds(checkout_id);
        CREATE INDEX idx_tests_build ON tests(build_id);
        "#,
    )?;
    Ok(())
}

/// Migration 5.0: issues and the incidents linking them to results.
fn apply_v5_0(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE issues (
            id TEXT NOT NULL,
            version INTEGER NOT NULL,
            origin TEXT NOT NULL,
            report_url TEXT,
            report_subject TEXT,
            culprit_code INTEGER,
            culprit_tool INTEGER,
            culprit_harness INTEGER,
            comment TEXT,
            PRIMARY KEY (id, version)
        );

        CREATE TABLE incidents (
            id TEXT PRIMARY KEY,
            origin TEXT NOT NULL,
            issue_id TEXT NOT NULL,
            issue_version INTEGER NOT NULL,
            build_id TEXT,
            test_id TEXT,
            present INTEGER,
            comment TEXT
        );

        CREATE INDEX idx_incidents_issue ON incidents(issue_id, issue_version);
        "#,
    )?;
    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_empty_database_has_no_version() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(current(&conn).unwrap(), None);
    }

    #[test]
    fn test_migration_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn, None, Version::new(4, 0)).unwrap();

        let tables = tables(&conn);
        assert!(tables.contains(&"checkouts".to_string()));
        assert!(tables.contains(&"builds".to_string()));
        assert!(tables.contains(&"tests".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
        assert!(!tables.contains(&"issues".to_string()));
        assert_eq!(current(&conn).unwrap(), Some(Version::new(4, 0)));
    }

    #[test]
    fn test_migration_in_steps() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn, None, Version::new(4, 1)).unwrap();
        migrate(&mut conn, Some(Version::new(4, 1)), Version::new(5, 0)).unwrap();

        let tables = tables(&conn);
        assert!(tables.contains(&"issues".to_string()));
        assert!(tables.contains(&"incidents".to_string()));
        assert_eq!(current(&conn).unwrap(), Some(Version::new(5, 0)));

        let applied: u32 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, 3);
    }

    #[test]
    fn test_unknown_target_leaves_database_untouched() {
        let mut conn = Connection::open_in_memory().unwrap();
        let err = migrate(&mut conn, None, Version::new(4, 2)).unwrap_err();
        assert!(matches!(err, StoreError::Migration(_)));
        assert_eq!(current(&conn).unwrap(), None);
    }
}
