//! Recalculate command implementation for the sitescore CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitescore_core::{RecalculationReport, WeightParameter, recalculate_all_sites};
use sitescore_store::SqliteSiteRegistry;

use crate::score::overlay_weights;
use crate::{
    ARG_AREA_WEIGHT, ARG_DATABASE, ARG_GRID_DISTANCE_WEIGHT, ARG_INFRASTRUCTURE_WEIGHT,
    ARG_SLOPE_WEIGHT, ARG_SOLAR_WEIGHT, CliError, ENV_DATABASE, fs, write_json,
};

/// CLI arguments for the `recalculate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Store new scoring weights and rescore every site in one \
                 transaction. Weights left unset keep their stored values, \
                 and the report is printed as JSON.",
    about = "Store new weights and rescore every site"
)]
#[ortho_config(prefix = "SITESCORE")]
pub(crate) struct RecalculateArgs {
    /// Path to the SQLite site database.
    #[arg(long = ARG_DATABASE, env = ENV_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Weight applied to the solar irradiance score.
    #[arg(long = ARG_SOLAR_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) solar_weight: Option<f64>,
    /// Weight applied to the area score.
    #[arg(long = ARG_AREA_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) area_weight: Option<f64>,
    /// Weight applied to the grid distance score.
    #[arg(long = ARG_GRID_DISTANCE_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) grid_distance_weight: Option<f64>,
    /// Weight applied to the slope score.
    #[arg(long = ARG_SLOPE_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) slope_weight: Option<f64>,
    /// Weight applied to the road access score.
    #[arg(long = ARG_INFRASTRUCTURE_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) infrastructure_weight: Option<f64>,
}

impl RecalculateArgs {
    pub(crate) fn into_config(self) -> Result<RecalculateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecalculateConfig::try_from(merged)
    }
}

/// Resolved `recalculate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecalculateConfig {
    /// Path to the site database.
    pub(crate) database: Utf8PathBuf,
    /// Weight overrides applied on top of the stored configuration.
    pub(crate) overrides: [(WeightParameter, Option<f64>); 5],
}

impl TryFrom<RecalculateArgs> for RecalculateConfig {
    type Error = CliError;

    fn try_from(args: RecalculateArgs) -> Result<Self, Self::Error> {
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_DATABASE,
        })?;
        Ok(Self {
            database,
            overrides: [
                (WeightParameter::Solar, args.solar_weight),
                (WeightParameter::Area, args.area_weight),
                (WeightParameter::GridDistance, args.grid_distance_weight),
                (WeightParameter::Slope, args.slope_weight),
                (WeightParameter::Infrastructure, args.infrastructure_weight),
            ],
        })
    }
}

pub(super) fn run_recalculate_with(
    args: RecalculateArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = execute_recalculate(args)?;
    write_json(writer, &report)
}

fn execute_recalculate(args: RecalculateArgs) -> Result<RecalculationReport, CliError> {
    let config = args.into_config()?;
    fs::require_database(&config.database)?;
    let mut registry = SqliteSiteRegistry::open(&config.database)?;
    let weights = overlay_weights(registry.load_weights()?, config.overrides).validate()?;
    Ok(recalculate_all_sites(&mut registry, weights)?)
}
