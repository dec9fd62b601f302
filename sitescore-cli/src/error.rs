//! Error types emitted by the sitescore CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sitescore_core::WeightsError;
use sitescore_store::SiteRegistryError;
use thiserror::Error;

/// Errors emitted by the sitescore CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing flag.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The database path does not exist.
    #[error("database {path:?} does not exist (run `sitescore init` first)")]
    MissingDatabase {
        /// Requested database path.
        path: Utf8PathBuf,
    },
    /// The database path exists but is not a file.
    #[error("database path {path:?} exists but is not a file")]
    DatabaseNotFile {
        /// Requested database path.
        path: Utf8PathBuf,
    },
    /// The database path could not be inspected.
    #[error("failed to inspect database path {path:?}: {source}")]
    InspectDatabase {
        /// Requested database path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Submitted weights failed validation.
    #[error("invalid weights: {0}")]
    InvalidWeights(#[from] WeightsError),
    /// The site registry reported an error.
    #[error(transparent)]
    Registry(#[from] SiteRegistryError),
    /// No site has the requested identifier.
    #[error("site {id} does not exist")]
    SiteNotFound {
        /// Requested identifier.
        id: u64,
    },
    /// Opening the import file failed.
    #[error("failed to open site import at {path:?}: {source}")]
    OpenImport {
        /// Import file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The import file was not a JSON array of sites.
    #[error("failed to parse site import JSON at {path:?}: {source}")]
    ParseImport {
        /// Import file path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// Creating the export file failed.
    #[error("failed to create output file {path:?}: {source}")]
    CreateOutput {
        /// Output file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing CSV records failed.
    #[error("failed to write CSV output: {0}")]
    WriteCsv(#[source] csv::Error),
}
