//! Command-line interface for scoring and ranking candidate solar sites.
#![forbid(unsafe_code)]

use std::ffi::OsString;
use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod database;
mod error;
mod export;
mod fs;
mod recalculate;
mod score;
mod sites;

pub use error::CliError;

use database::{DatabaseArgs, ImportArgs};
use export::ExportArgs;
use recalculate::RecalculateArgs;
use score::ScoreArgs;
use sites::{SiteArgs, SitesArgs, StatsArgs};

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ENV_DATABASE: &str = "SITESCORE_DATABASE";
pub(crate) const ARG_SOLAR_IRRADIANCE: &str = "solar-irradiance";
pub(crate) const ARG_AREA: &str = "area";
pub(crate) const ARG_GRID_DISTANCE: &str = "grid-distance";
pub(crate) const ARG_ROAD_DISTANCE: &str = "road-distance";
pub(crate) const ARG_SLOPE: &str = "slope";
pub(crate) const ENV_SOLAR_IRRADIANCE: &str = "SITESCORE_CMDS_SCORE_SOLAR_IRRADIANCE";
pub(crate) const ENV_AREA: &str = "SITESCORE_CMDS_SCORE_AREA";
pub(crate) const ENV_GRID_DISTANCE: &str = "SITESCORE_CMDS_SCORE_GRID_DISTANCE";
pub(crate) const ENV_ROAD_DISTANCE: &str = "SITESCORE_CMDS_SCORE_ROAD_DISTANCE";
pub(crate) const ENV_SLOPE: &str = "SITESCORE_CMDS_SCORE_SLOPE";
pub(crate) const ARG_SOLAR_WEIGHT: &str = "solar-weight";
pub(crate) const ARG_AREA_WEIGHT: &str = "area-weight";
pub(crate) const ARG_GRID_DISTANCE_WEIGHT: &str = "grid-distance-weight";
pub(crate) const ARG_SLOPE_WEIGHT: &str = "slope-weight";
pub(crate) const ARG_INFRASTRUCTURE_WEIGHT: &str = "infrastructure-weight";

/// Run the sitescore CLI with the current process arguments, writing command
/// output to stdout.
pub fn run() -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_with(std::env::args_os(), &mut stdout)
}

/// Run the sitescore CLI with explicit arguments and output sink.
///
/// The first argument is the binary name, as with [`std::env::args_os`].
pub fn run_with<I, T>(args: I, writer: &mut dyn Write) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => score::run_score_with(args, writer),
        Command::Init(args) => database::run_init_with(&args, writer),
        Command::Import(args) => database::run_import_with(&args, writer),
        Command::Recalculate(args) => recalculate::run_recalculate_with(args, writer),
        Command::Weights(args) => database::run_weights_with(&args, writer),
        Command::Sites(args) => sites::run_sites_with(&args, writer),
        Command::Site(args) => sites::run_site_with(&args, writer),
        Command::Stats(args) => sites::run_stats_with(&args, writer),
        Command::Export(args) => export::run_export_with(&args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sitescore",
    about = "Score and rank candidate solar energy sites",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one set of raw site metrics.
    Score(ScoreArgs),
    /// Create or open a site database and initialise its schema.
    Init(DatabaseArgs),
    /// Import sites from a JSON array.
    Import(ImportArgs),
    /// Store new weights and rescore every site.
    Recalculate(RecalculateArgs),
    /// Print the stored weight configuration.
    Weights(DatabaseArgs),
    /// List sites ranked by total score.
    Sites(SitesArgs),
    /// Print a single site.
    Site(SiteArgs),
    /// Summarise the stored scores.
    Stats(StatsArgs),
    /// Export ranked sites as JSON or CSV.
    Export(ExportArgs),
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
