//! Scoring normalisers exposed to SQL.
//!
//! The bulk compute runs as plain `UPDATE` statements; registering the core
//! normalisers as deterministic scalar functions keeps the SQL side on the
//! same arithmetic as [`sitescore_core::score_site`]. `NULL` arguments yield
//! `NULL`.
#![forbid(unsafe_code)]

use rusqlite::Connection;
use rusqlite::functions::{Context, FunctionFlags};
use sitescore_core::{
    area_score, grid_distance_score, road_distance_score, slope_score, solar_score,
};

use crate::SiteRegistryError;

pub(crate) const SOLAR_FUNCTION: &str = "sitescore_solar";
pub(crate) const AREA_FUNCTION: &str = "sitescore_area";
pub(crate) const GRID_DISTANCE_FUNCTION: &str = "sitescore_grid_distance";
pub(crate) const SLOPE_FUNCTION: &str = "sitescore_slope";
pub(crate) const INFRASTRUCTURE_FUNCTION: &str = "sitescore_infrastructure";

/// Register the five normalisers on `connection`.
pub(crate) fn register_scoring_functions(connection: &Connection) -> Result<(), SiteRegistryError> {
    register_real(connection, SOLAR_FUNCTION, solar_score)?;
    register_real(connection, GRID_DISTANCE_FUNCTION, grid_distance_score)?;
    register_real(connection, SLOPE_FUNCTION, slope_score)?;
    register_real(connection, INFRASTRUCTURE_FUNCTION, road_distance_score)?;
    connection
        .create_scalar_function(AREA_FUNCTION, 1, flags(), |ctx: &Context<'_>| {
            let raw: Option<i64> = ctx.get(0)?;
            Ok(raw.map(|value| area_score(saturate_area(value))))
        })
        .map_err(|source| SiteRegistryError::RegisterFunction {
            name: AREA_FUNCTION,
            source,
        })
}

fn register_real(
    connection: &Connection,
    name: &'static str,
    normaliser: fn(f64) -> f64,
) -> Result<(), SiteRegistryError> {
    connection
        .create_scalar_function(name, 1, flags(), move |ctx: &Context<'_>| {
            let raw: Option<f64> = ctx.get(0)?;
            Ok(raw.map(normaliser))
        })
        .map_err(|source| SiteRegistryError::RegisterFunction { name, source })
}

fn flags() -> FunctionFlags {
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC
}

/// Clamp an SQL integer into the `u32` domain of [`area_score`].
fn saturate_area(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(if value < 0 { 0 } else { u32::MAX })
}
