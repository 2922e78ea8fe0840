//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: scan records
    r#"
    CREATE TABLE IF NOT EXISTS food_analyses (
        id                  INTEGER PRIMARY KEY AUTOINCREMENT,
        subject_name        TEXT NOT NULL,
        quality_score       INTEGER,
        quality_state       TEXT,
        descriptive_notes   TEXT,
        recommend           INTEGER NOT NULL DEFAULT 0,
        usage_guidance      TEXT,
        shelf_life_days     INTEGER,
        energy_value        INTEGER,
        nutrition_notes     TEXT,
        benefit_notes       TEXT,
        recommendation_text TEXT,
        storage_guidance    TEXT,
        bonus_text          TEXT,
        raw_fallback        TEXT,

        -- RFC 3339 with the local offset at insert time
        created_at          TEXT NOT NULL,
        -- Unix milliseconds, for ordering and window queries
        created_ts          INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_food_analyses_created_ts ON food_analyses(created_ts);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
