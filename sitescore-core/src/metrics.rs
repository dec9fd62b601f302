//! Raw physical measurements describing a candidate site.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The five raw measurements the suitability score is derived from.
///
/// # Examples
/// ```
/// use sitescore_core::{RawMetrics, Weights, score_site};
///
/// let metrics = RawMetrics {
///     solar_irradiance: 5.8,
///     area: 60_000,
///     grid_distance: 0.5,
///     road_distance: 0.2,
///     slope: 2.0,
/// };
/// let scores = score_site(&metrics, &Weights::default());
/// assert!((scores.total - 100.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawMetrics {
    /// Mean solar irradiance in kWh/m²/day.
    pub solar_irradiance: f64,
    /// Usable area in square metres.
    pub area: u32,
    /// Distance to the nearest grid connection in kilometres.
    pub grid_distance: f64,
    /// Distance to the nearest road in kilometres.
    pub road_distance: f64,
    /// Mean terrain slope in degrees.
    pub slope: f64,
}
