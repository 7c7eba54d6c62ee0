//! Schema migrations
//!
//! Forward-only, versioned migrations applied at pool startup. The applied
//! version lives in a single-row `schema_version` table; anything below
//! `SCHEMA_VERSION` is brought up to date in order.
//!
//! There is no automatic rollback. A failed migration leaves the recorded
//! version untouched, so after repairing the database by hand the next start
//! re-runs the failed step.
//!
//! To add a migration: bump `SCHEMA_VERSION`, write the next `migrate_vX`
//! function and wire it into `run_migrations`.

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Bring the schema up to `SCHEMA_VERSION`
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            from_version = current_version,
            to_version = SCHEMA_VERSION,
            "Applying schema migrations"
        );

        if current_version < 1 {
            if let Err(e) = migrate_v1(conn) {
                error!(version = 1, error = %e, "Migration V001 (locations and observations) failed");
                return Err(e);
            }
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Schema migrations applied");
    } else {
        debug!(version = current_version, "Schema already current");
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    // First run: the bookkeeping table itself does not exist yet
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
        [],
    )?;

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Record the applied version, keeping the table at a single row
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration to version 1: Locations and their cached observations
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: Locations and observations");

    conn.execute_batch(
        "
        -- Registered locations
        CREATE TABLE IF NOT EXISTS locations (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            created_at TEXT NOT NULL
        );

        -- One cached hourly series per location
        CREATE TABLE IF NOT EXISTS observations (
            location_id TEXT PRIMARY KEY,
            data TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (location_id) REFERENCES locations(id) ON DELETE CASCADE
        );

        -- Indexes
        CREATE INDEX IF NOT EXISTS idx_locations_name ON locations(name);
        CREATE INDEX IF NOT EXISTS idx_observations_updated ON observations(updated_at);
        ",
    )?;

    Ok(())
}
