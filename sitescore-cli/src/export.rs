//! Export command writing ranked sites as JSON or CSV.

use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use serde::Serialize;
use sitescore_core::Site;
use sitescore_store::Page;

use crate::database::DatabaseArgs;
use crate::sites::ScoreBoundsArgs;
use crate::{CliError, fs, write_json};

/// Serialisation formats supported by `export`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    /// Pretty-printed JSON array.
    #[default]
    Json,
    /// Comma-separated values with a header row.
    Csv,
}

/// CLI arguments for the `export` subcommand.
#[derive(Debug, Clone, Args)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) database: DatabaseArgs,
    #[command(flatten)]
    pub(crate) bounds: ScoreBoundsArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub(crate) format: ExportFormat,
    /// Write to this file instead of stdout.
    #[arg(long, value_name = "path")]
    pub(crate) output: Option<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExportSummary<'a> {
    exported: usize,
    output: &'a Utf8Path,
}

/// One CSV row; field names become the header.
#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    id: u64,
    name: &'a str,
    latitude: f64,
    longitude: f64,
    solar_irradiance: f64,
    area_m2: u32,
    grid_distance_km: f64,
    road_distance_km: f64,
    slope_degrees: f64,
    solar_score: Option<f64>,
    area_score: Option<f64>,
    grid_score: Option<f64>,
    slope_score: Option<f64>,
    infrastructure_score: Option<f64>,
    total_score: Option<f64>,
    scored_at: Option<String>,
}

impl<'a> From<&'a Site> for CsvRecord<'a> {
    fn from(site: &'a Site) -> Self {
        let metrics = &site.metrics;
        let components = site.scores.map(|scores| scores.components);
        Self {
            id: site.id,
            name: &site.name,
            latitude: site.latitude,
            longitude: site.longitude,
            solar_irradiance: metrics.solar_irradiance,
            area_m2: metrics.area,
            grid_distance_km: metrics.grid_distance,
            road_distance_km: metrics.road_distance,
            slope_degrees: metrics.slope,
            solar_score: components.map(|scores| scores.solar),
            area_score: components.map(|scores| scores.area),
            grid_score: components.map(|scores| scores.grid_distance),
            slope_score: components.map(|scores| scores.slope),
            infrastructure_score: components.map(|scores| scores.infrastructure),
            total_score: site.scores.map(|scores| scores.total),
            scored_at: site.scored_at.map(|at| at.to_rfc3339()),
        }
    }
}

pub(super) fn run_export_with(args: &ExportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let registry = args.database.open_existing()?;
    let sites = registry.list_sites(&args.bounds.into(), Page::default())?;
    let Some(path) = &args.output else {
        return write_sites(writer, &sites, args.format);
    };
    let file = fs::create_file(path).map_err(|source| CliError::CreateOutput {
        path: path.clone(),
        source,
    })?;
    let mut file_writer = BufWriter::new(file);
    write_sites(&mut file_writer, &sites, args.format)?;
    file_writer.flush().map_err(CliError::WriteOutput)?;
    log::info!("exported {} sites to {path}", sites.len());
    write_json(
        writer,
        &ExportSummary {
            exported: sites.len(),
            output: path,
        },
    )
}

fn write_sites(
    writer: &mut dyn Write,
    sites: &[Site],
    format: ExportFormat,
) -> Result<(), CliError> {
    match format {
        ExportFormat::Json => write_json(writer, sites),
        ExportFormat::Csv => write_csv(writer, sites),
    }
}

fn write_csv(writer: &mut dyn Write, sites: &[Site]) -> Result<(), CliError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for site in sites {
        csv_writer
            .serialize(CsvRecord::from(site))
            .map_err(CliError::WriteCsv)?;
    }
    csv_writer.flush().map_err(CliError::WriteOutput)
}
