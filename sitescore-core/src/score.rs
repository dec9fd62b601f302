//! Combine normalised component scores into a weighted total.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    RawMetrics, Weights, area_score, grid_distance_score, road_distance_score, slope_score,
    solar_score,
};

/// The five normalised component scores of a site, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentScores {
    /// Solar irradiance score.
    pub solar: f64,
    /// Usable area score.
    pub area: f64,
    /// Grid connection distance score.
    pub grid_distance: f64,
    /// Terrain slope score.
    pub slope: f64,
    /// Road access score.
    pub infrastructure: f64,
}

impl ComponentScores {
    /// Normalise each raw measurement.
    #[must_use]
    pub fn from_metrics(metrics: &RawMetrics) -> Self {
        Self {
            solar: solar_score(metrics.solar_irradiance),
            area: area_score(metrics.area),
            grid_distance: grid_distance_score(metrics.grid_distance),
            slope: slope_score(metrics.slope),
            infrastructure: road_distance_score(metrics.road_distance),
        }
    }

    /// Weighted total of the components; see [`total_score`].
    #[must_use]
    pub fn total(&self, weights: &Weights) -> f64 {
        total_score(self, weights)
    }
}

/// Component scores together with their weighted total.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreSet {
    /// Normalised component scores.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub components: ComponentScores,
    /// Weighted sum of the components.
    pub total: f64,
}

/// Weighted sum of the component scores.
///
/// The weights are used as given: they are neither normalised nor checked and
/// the result is not clamped, so weights that do not sum to one move the total
/// outside `0..=100`.
///
/// # Examples
/// ```
/// use sitescore_core::{ComponentScores, Weights, total_score};
///
/// let scores = ComponentScores {
///     solar: 100.0,
///     area: 50.0,
///     grid_distance: 0.0,
///     slope: 100.0,
///     infrastructure: 100.0,
/// };
/// let weights = Weights::new(0.5, 0.5, 0.0, 0.0, 0.0);
/// assert!((total_score(&scores, &weights) - 75.0).abs() < 1e-9);
/// assert_eq!(total_score(&scores, &Weights::zero()), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "the total is a weighted sum of component scores"
)]
#[must_use]
pub fn total_score(scores: &ComponentScores, weights: &Weights) -> f64 {
    scores.solar * weights.solar
        + scores.area * weights.area
        + scores.grid_distance * weights.grid_distance
        + scores.slope * weights.slope
        + scores.infrastructure * weights.infrastructure
}

/// Normalise a site's measurements and combine them with `weights`.
#[must_use]
pub fn score_site(metrics: &RawMetrics, weights: &Weights) -> ScoreSet {
    let components = ComponentScores::from_metrics(metrics);
    ScoreSet {
        components,
        total: components.total(weights),
    }
}
