//! Database lifecycle commands: `init`, `import` and `weights`.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use serde::Serialize;
use sitescore_core::NewSite;
use sitescore_store::{SqliteSiteRegistry, StoredWeight};

use crate::{ARG_DATABASE, CliError, ENV_DATABASE, fs, write_json};

/// Location of the site database shared by the query commands.
#[derive(Debug, Clone, Args)]
pub(crate) struct DatabaseArgs {
    /// Path to the SQLite site database.
    #[arg(long = ARG_DATABASE, env = ENV_DATABASE, value_name = "path")]
    pub(crate) database: Utf8PathBuf,
}

impl DatabaseArgs {
    /// Open a database that must already exist.
    pub(crate) fn open_existing(&self) -> Result<SqliteSiteRegistry, CliError> {
        fs::require_database(&self.database)?;
        Ok(SqliteSiteRegistry::open(&self.database)?)
    }

    /// Open the database, creating it when absent.
    pub(crate) fn open_or_create(&self) -> Result<SqliteSiteRegistry, CliError> {
        Ok(SqliteSiteRegistry::open(&self.database)?)
    }
}

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct ImportArgs {
    /// JSON file holding an array of sites.
    #[arg(value_name = "path")]
    pub(crate) path: Utf8PathBuf,
    #[command(flatten)]
    pub(crate) database: DatabaseArgs,
}

#[derive(Debug, Serialize)]
struct InitSummary<'a> {
    database: &'a Utf8Path,
    weights: Vec<StoredWeight>,
}

#[derive(Debug, Serialize)]
struct ImportSummary {
    imported: usize,
}

pub(super) fn run_init_with(args: &DatabaseArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let registry = args.open_or_create()?;
    let weights = registry.stored_weights()?;
    log::info!("initialised site database at {}", args.database);
    write_json(
        writer,
        &InitSummary {
            database: &args.database,
            weights,
        },
    )
}

pub(super) fn run_import_with(args: &ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let sites = load_sites(&args.path)?;
    let mut registry = args.database.open_or_create()?;
    let imported = registry.import_sites(&sites)?;
    log::info!("imported {imported} sites from {}", args.path);
    write_json(writer, &ImportSummary { imported })
}

pub(super) fn run_weights_with(args: &DatabaseArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let registry = args.open_existing()?;
    write_json(writer, &registry.stored_weights()?)
}

/// Loads a JSON array of [`NewSite`] records from disk.
pub(super) fn load_sites(path: &Utf8Path) -> Result<Vec<NewSite>, CliError> {
    let file = fs::open_file(path).map_err(|source| CliError::OpenImport {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseImport {
        path: path.to_path_buf(),
        source,
    })
}
