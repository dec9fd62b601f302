//! Schema for the weights and sites tables.
#![forbid(unsafe_code)]

use chrono::Utc;
use rusqlite::{Connection, Transaction};
use sitescore_core::Weights;

use crate::SiteRegistryError;

/// Initialise the site registry schema inside an existing SQLite database.
///
/// Creates `analysis_parameters` and `sites` when missing and seeds any
/// absent weight with its default value. Existing rows are left untouched,
/// so the call is idempotent. Schema changes to existing tables are not
/// attempted.
///
/// # Errors
/// Returns [`SiteRegistryError::Schema`] naming the step that failed.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use sitescore_store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
///
/// let weights: i64 = conn
///     .query_row("SELECT COUNT(*) FROM analysis_parameters", [], |row| row.get(0))
///     .expect("count weights");
/// assert_eq!(weights, 5);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SiteRegistryError> {
    let transaction = connection
        .transaction()
        .map_err(|source| SiteRegistryError::Schema {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    seed_default_weights(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SiteRegistryError::Schema {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SiteRegistryError> {
    run_step(
        transaction,
        "create analysis_parameters",
        "CREATE TABLE IF NOT EXISTS analysis_parameters (
            parameter_name TEXT PRIMARY KEY CHECK (length(trim(parameter_name)) > 0),
            weight_value REAL NOT NULL CHECK (weight_value >= 0 AND weight_value < 9e999),
            updated_at TEXT NOT NULL
        ) WITHOUT ROWID",
    )?;
    run_step(
        transaction,
        "create sites",
        "CREATE TABLE IF NOT EXISTS sites (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            latitude REAL NOT NULL CHECK (latitude BETWEEN -90 AND 90),
            longitude REAL NOT NULL CHECK (longitude BETWEEN -180 AND 180),
            solar_irradiance REAL NOT NULL,
            area_m2 INTEGER NOT NULL CHECK (area_m2 >= 0),
            grid_distance_km REAL NOT NULL,
            road_distance_km REAL NOT NULL,
            slope_degrees REAL NOT NULL,
            solar_score REAL,
            area_score REAL,
            grid_score REAL,
            slope_score REAL,
            infrastructure_score REAL,
            total_score REAL,
            scored_at TEXT
        )",
    )?;
    run_step(
        transaction,
        "create idx_sites_total_score",
        "CREATE INDEX IF NOT EXISTS idx_sites_total_score ON sites(total_score)",
    )
}

fn seed_default_weights(transaction: &Transaction<'_>) -> Result<(), SiteRegistryError> {
    let now = Utc::now();
    let mut insert = transaction
        .prepare_cached(
            "INSERT OR IGNORE INTO analysis_parameters (parameter_name, weight_value, updated_at)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(|source| SiteRegistryError::Schema {
            step: "prepare default weights",
            source,
        })?;
    for (parameter, value) in Weights::default().parameters() {
        insert
            .execute((parameter.as_str(), value, now))
            .map_err(|source| SiteRegistryError::Schema {
                step: "seed default weights",
                source,
            })?;
    }
    Ok(())
}

fn run_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SiteRegistryError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SiteRegistryError::Schema { step, source })
}
