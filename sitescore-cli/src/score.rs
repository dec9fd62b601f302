//! Score command implementation for the sitescore CLI.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitescore_core::{RawMetrics, ScoreSet, WeightParameter, Weights, score_site};

use crate::{
    ARG_AREA, ARG_AREA_WEIGHT, ARG_GRID_DISTANCE, ARG_GRID_DISTANCE_WEIGHT,
    ARG_INFRASTRUCTURE_WEIGHT, ARG_ROAD_DISTANCE, ARG_SLOPE, ARG_SLOPE_WEIGHT,
    ARG_SOLAR_IRRADIANCE, ARG_SOLAR_WEIGHT, CliError, ENV_AREA, ENV_GRID_DISTANCE,
    ENV_ROAD_DISTANCE, ENV_SLOPE, ENV_SOLAR_IRRADIANCE, write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score one site from its raw measurements. Metrics and \
                 weights can come from CLI flags, configuration files, or \
                 environment variables; weights left unset use the \
                 defaults.",
    about = "Score one set of raw site metrics"
)]
#[ortho_config(prefix = "SITESCORE")]
pub(crate) struct ScoreArgs {
    /// Mean daily solar irradiance in kWh/m²/day.
    #[arg(long = ARG_SOLAR_IRRADIANCE, value_name = "kwh")]
    #[serde(default)]
    pub(crate) solar_irradiance: Option<f64>,
    /// Usable area in square metres.
    #[arg(long = ARG_AREA, value_name = "m2")]
    #[serde(default)]
    pub(crate) area: Option<u32>,
    /// Distance to the nearest grid connection in kilometres.
    #[arg(long = ARG_GRID_DISTANCE, value_name = "km")]
    #[serde(default)]
    pub(crate) grid_distance: Option<f64>,
    /// Distance to the nearest road in kilometres.
    #[arg(long = ARG_ROAD_DISTANCE, value_name = "km")]
    #[serde(default)]
    pub(crate) road_distance: Option<f64>,
    /// Terrain slope in degrees.
    #[arg(long = ARG_SLOPE, value_name = "degrees")]
    #[serde(default)]
    pub(crate) slope: Option<f64>,
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

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    /// Measurements to score.
    pub(crate) metrics: RawMetrics,
    /// Validated weights.
    pub(crate) weights: Weights,
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let metrics = RawMetrics {
            solar_irradiance: require(
                args.solar_irradiance,
                ARG_SOLAR_IRRADIANCE,
                ENV_SOLAR_IRRADIANCE,
            )?,
            area: require(args.area, ARG_AREA, ENV_AREA)?,
            grid_distance: require(args.grid_distance, ARG_GRID_DISTANCE, ENV_GRID_DISTANCE)?,
            road_distance: require(args.road_distance, ARG_ROAD_DISTANCE, ENV_ROAD_DISTANCE)?,
            slope: require(args.slope, ARG_SLOPE, ENV_SLOPE)?,
        };
        let weights = overlay_weights(
            Weights::default(),
            [
                (WeightParameter::Solar, args.solar_weight),
                (WeightParameter::Area, args.area_weight),
                (WeightParameter::GridDistance, args.grid_distance_weight),
                (WeightParameter::Slope, args.slope_weight),
                (WeightParameter::Infrastructure, args.infrastructure_weight),
            ],
        )
        .validate()?;
        Ok(Self { metrics, weights })
    }
}

fn require<T>(value: Option<T>, field: &'static str, env: &'static str) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

/// Replace the weights in `base` that have an override.
pub(crate) fn overlay_weights(
    base: Weights,
    overrides: [(WeightParameter, Option<f64>); 5],
) -> Weights {
    overrides
        .into_iter()
        .fold(base, |weights, (parameter, value)| {
            value.map_or(weights, |weight| weights.with(parameter, weight))
        })
}

pub(super) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let scores = execute_score(args)?;
    write_json(writer, &scores)
}

fn execute_score(args: ScoreArgs) -> Result<ScoreSet, CliError> {
    let config = args.into_config()?;
    if !config.weights.is_normalised() {
        log::warn!(
            "score weights sum to {}; totals may leave the 0-100 range",
            config.weights.sum()
        );
    }
    Ok(score_site(&config.metrics, &config.weights))
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
