//! Weight configuration applied to the five component scores.
//!
//! Weights are persisted by the registry under stable parameter names, one
//! row per [`WeightParameter`].
//!
//! # Examples
//! ```
//! use sitescore_core::{WeightParameter, Weights};
//!
//! let weights = Weights::default();
//! assert!(weights.is_normalised());
//! assert_eq!(WeightParameter::Solar.as_str(), "solar_irradiance_weight");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance used when checking that weights sum to one.
const NORMALISED_TOLERANCE: f64 = 1e-6;

/// Relative importance of each component in the total score.
///
/// Values are intended to be non-negative and to sum to `1.0`; only
/// [`Weights::validate`] enforces the former and nothing enforces the latter.
/// With weights that do not sum to one the total leaves the `0..=100` range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Weights {
    /// Weight of the solar irradiance score.
    pub solar: f64,
    /// Weight of the usable area score.
    pub area: f64,
    /// Weight of the grid connection distance score.
    pub grid_distance: f64,
    /// Weight of the terrain slope score.
    pub slope: f64,
    /// Weight of the road access (infrastructure) score.
    pub infrastructure: f64,
}

impl Weights {
    /// Construct weights from the five component values.
    #[must_use]
    pub const fn new(
        solar: f64,
        area: f64,
        grid_distance: f64,
        slope: f64,
        infrastructure: f64,
    ) -> Self {
        Self {
            solar,
            area,
            grid_distance,
            slope,
            infrastructure,
        }
    }

    /// Weights that zero every component.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Return the weight stored for `parameter`.
    #[must_use]
    pub const fn get(&self, parameter: WeightParameter) -> f64 {
        match parameter {
            WeightParameter::Solar => self.solar,
            WeightParameter::Area => self.area,
            WeightParameter::GridDistance => self.grid_distance,
            WeightParameter::Slope => self.slope,
            WeightParameter::Infrastructure => self.infrastructure,
        }
    }

    /// Replace the weight stored for `parameter`.
    pub const fn set(&mut self, parameter: WeightParameter, value: f64) {
        match parameter {
            WeightParameter::Solar => self.solar = value,
            WeightParameter::Area => self.area = value,
            WeightParameter::GridDistance => self.grid_distance = value,
            WeightParameter::Slope => self.slope = value,
            WeightParameter::Infrastructure => self.infrastructure = value,
        }
    }

    /// Return a copy with `parameter` replaced, enabling chaining.
    #[must_use]
    pub const fn with(mut self, parameter: WeightParameter, value: f64) -> Self {
        self.set(parameter, value);
        self
    }

    /// Pair every parameter with its value, in persistence order.
    #[must_use]
    pub const fn parameters(&self) -> [(WeightParameter, f64); 5] {
        [
            (WeightParameter::Solar, self.solar),
            (WeightParameter::Area, self.area),
            (WeightParameter::GridDistance, self.grid_distance),
            (WeightParameter::Slope, self.slope),
            (WeightParameter::Infrastructure, self.infrastructure),
        ]
    }

    /// Sum of the five weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.parameters().iter().map(|(_, value)| value).sum()
    }

    /// Report whether the weights sum to one within a small tolerance.
    #[expect(
        clippy::float_arithmetic,
        reason = "normalisation check subtracts the expected sum"
    )]
    #[must_use]
    pub fn is_normalised(&self) -> bool {
        (self.sum() - 1.0).abs() <= NORMALISED_TOLERANCE
    }

    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`WeightsError::NotFinite`] for NaN or infinite values and
    /// [`WeightsError::Negative`] for values below zero. The sum is not
    /// checked.
    pub fn validate(self) -> Result<Self, WeightsError> {
        for (parameter, value) in self.parameters() {
            if !value.is_finite() {
                return Err(WeightsError::NotFinite { parameter, value });
            }
            if value < 0.0 {
                return Err(WeightsError::Negative { parameter, value });
            }
        }
        Ok(self)
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(0.35, 0.25, 0.20, 0.10, 0.10)
    }
}

/// Names under which each weight is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WeightParameter {
    /// Solar irradiance weight.
    Solar,
    /// Usable area weight.
    Area,
    /// Grid connection distance weight.
    GridDistance,
    /// Terrain slope weight.
    Slope,
    /// Road access weight.
    Infrastructure,
}

impl WeightParameter {
    /// Every parameter, in persistence order.
    pub const ALL: [Self; 5] = [
        Self::Solar,
        Self::Area,
        Self::GridDistance,
        Self::Slope,
        Self::Infrastructure,
    ];

    /// Return the persisted parameter name.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::WeightParameter;
    ///
    /// assert_eq!(WeightParameter::GridDistance.as_str(), "grid_distance_weight");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solar => "solar_irradiance_weight",
            Self::Area => "area_weight",
            Self::GridDistance => "grid_distance_weight",
            Self::Slope => "slope_weight",
            Self::Infrastructure => "infrastructure_weight",
        }
    }
}

impl std::fmt::Display for WeightParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WeightParameter {
    type Err = WeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|parameter| parameter.as_str() == s)
            .ok_or_else(|| WeightsError::UnknownParameter { name: s.to_owned() })
    }
}

/// Errors raised when validating or parsing weights.
#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    /// A weight was NaN or infinite.
    #[error("{parameter} must be finite (got {value})")]
    NotFinite {
        /// Offending parameter.
        parameter: WeightParameter,
        /// Rejected value.
        value: f64,
    },
    /// A weight was below zero.
    #[error("{parameter} must not be negative (got {value})")]
    Negative {
        /// Offending parameter.
        parameter: WeightParameter,
        /// Rejected value.
        value: f64,
    },
    /// A persisted parameter name did not match any weight.
    #[error("unknown weight parameter '{name}'")]
    UnknownParameter {
        /// Name that failed to parse.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    fn default_weights_are_normalised() {
        assert!(Weights::default().is_normalised());
    }

    #[rstest]
    fn zero_weights_are_not_normalised() {
        assert!(!Weights::zero().is_normalised());
    }

    #[rstest]
    #[case(WeightParameter::Solar)]
    #[case(WeightParameter::Area)]
    #[case(WeightParameter::GridDistance)]
    #[case(WeightParameter::Slope)]
    #[case(WeightParameter::Infrastructure)]
    fn parameter_names_round_trip(#[case] parameter: WeightParameter) {
        assert_eq!(WeightParameter::from_str(parameter.as_str()), Ok(parameter));
    }

    #[rstest]
    fn unknown_parameter_is_rejected() {
        let err = WeightParameter::from_str("wind_weight").expect_err("unknown name");
        assert!(err.to_string().contains("wind_weight"));
    }

    #[rstest]
    fn with_replaces_a_single_weight() {
        let weights = Weights::zero().with(WeightParameter::Slope, 0.4);
        assert_eq!(weights.get(WeightParameter::Slope), 0.4);
        assert_eq!(weights.get(WeightParameter::Solar), 0.0);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn validate_rejects_non_finite(#[case] value: f64) {
        let weights = Weights::default().with(WeightParameter::Area, value);
        assert!(matches!(
            weights.validate(),
            Err(WeightsError::NotFinite {
                parameter: WeightParameter::Area,
                ..
            })
        ));
    }

    #[rstest]
    fn validate_rejects_negative() {
        let weights = Weights::default().with(WeightParameter::Infrastructure, -0.1);
        assert!(matches!(
            weights.validate(),
            Err(WeightsError::Negative {
                parameter: WeightParameter::Infrastructure,
                ..
            })
        ));
    }

    #[rstest]
    fn validate_accepts_unnormalised_weights() {
        let weights = Weights::new(1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(weights.validate(), Ok(weights));
    }
}
