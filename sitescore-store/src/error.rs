//! Error types raised by the SQLite site registry.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use sitescore_core::WeightParameter;
use thiserror::Error;

/// Errors raised while opening, querying or updating the site registry.
#[derive(Debug, Error)]
pub enum SiteRegistryError {
    /// Opening the `SQLite` database failed.
    #[error("failed to open SQLite database at {path}")]
    OpenDatabase {
        /// Requested database path.
        path: Utf8PathBuf,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Registering a scoring function on the connection failed.
    #[error("failed to register SQL function {name}")]
    RegisterFunction {
        /// Name of the SQL function.
        name: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating or seeding the schema failed.
    #[error("failed to initialise schema: {step}")]
    Schema {
        /// Description of the failed step.
        step: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Preparing or executing a statement failed.
    #[error("failed to {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A site identifier could not be represented as `u64`.
    #[error("site id {id} is outside the supported range")]
    SiteIdOutOfRange {
        /// Identifier read from `SQLite`.
        id: i64,
    },
    /// A stored area could not be represented as `u32`.
    #[error("area {raw} of site {site_id} is outside the supported range")]
    AreaOutOfRange {
        /// Identifier of the affected site.
        site_id: u64,
        /// Raw value found in the database.
        raw: i64,
    },
    /// A row count could not be represented as `u64`.
    #[error("row count {count} is invalid")]
    CountOutOfRange {
        /// Raw value returned by `SQLite`.
        count: i64,
    },
    /// A weight was NaN or infinite.
    #[error("weight {parameter} must be finite, got {value}")]
    NonFiniteWeight {
        /// Parameter being stored.
        parameter: WeightParameter,
        /// Rejected value.
        value: f64,
    },
    /// A site measurement or coordinate was NaN, which `SQLite` cannot store.
    #[error("site {site:?} has a NaN {field}")]
    NanMeasurement {
        /// Name of the rejected site.
        site: String,
        /// Offending field.
        field: &'static str,
    },
    /// The weight configuration lacks a parameter.
    #[error("weight {parameter} is not configured")]
    MissingWeight {
        /// Parameter with no stored row.
        parameter: WeightParameter,
    },
}
