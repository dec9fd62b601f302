//! Piecewise-linear normalisation of raw measurements onto `0..=100`.
//!
//! Each function interpolates linearly between a zero-score threshold and a
//! full-score threshold and clamps outside that range. The comparison used at
//! each threshold differs between metrics and is part of the contract: at the
//! exact threshold values the functions below return the documented scores.
//!
//! A NaN measurement scores `0.0`.

/// Score awarded at or beyond the full-score threshold.
pub const MAX_SCORE: f64 = 100.0;
/// Score awarded at or beyond the zero-score threshold.
pub const MIN_SCORE: f64 = 0.0;

const SOLAR_FULL: f64 = 5.5;
const SOLAR_ZERO: f64 = 3.0;
const AREA_FULL: u32 = 50_000;
const AREA_ZERO: u32 = 5_000;
const GRID_FULL: f64 = 1.0;
const GRID_ZERO: f64 = 20.0;
const ROAD_FULL: f64 = 0.5;
const ROAD_ZERO: f64 = 5.0;
const SLOPE_FULL: f64 = 5.0;
const SLOPE_KNEE: f64 = 15.0;
const SLOPE_KNEE_SCORE: f64 = 50.0;
const SLOPE_ZERO: f64 = 20.0;

/// Score solar irradiance (kWh/m²/day).
///
/// `>= 5.5` scores 100, `< 3.0` scores 0, linear in between.
///
/// # Examples
/// ```
/// use sitescore_core::solar_score;
///
/// assert_eq!(solar_score(5.5), 100.0);
/// assert_eq!(solar_score(2.9), 0.0);
/// assert!((solar_score(4.25) - 50.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn solar_score(solar_irradiance: f64) -> f64 {
    if solar_irradiance.is_nan() {
        return MIN_SCORE;
    }
    if solar_irradiance >= SOLAR_FULL {
        MAX_SCORE
    } else if solar_irradiance < SOLAR_ZERO {
        MIN_SCORE
    } else {
        rising(solar_irradiance, SOLAR_ZERO, SOLAR_FULL)
    }
}

/// Score usable area (m²).
///
/// `>= 50000` scores 100, `< 5000` scores 0, linear in between; exactly
/// 5000 therefore lands on the interpolated 0.
#[must_use]
pub fn area_score(area: u32) -> f64 {
    if area >= AREA_FULL {
        MAX_SCORE
    } else if area < AREA_ZERO {
        MIN_SCORE
    } else {
        rising(f64::from(area), f64::from(AREA_ZERO), f64::from(AREA_FULL))
    }
}

/// Score distance to the grid (km).
///
/// `<= 1` scores 100, `>= 20` scores 0, linear in between.
#[must_use]
pub fn grid_distance_score(grid_distance: f64) -> f64 {
    if grid_distance.is_nan() {
        return MIN_SCORE;
    }
    if grid_distance <= GRID_FULL {
        MAX_SCORE
    } else if grid_distance >= GRID_ZERO {
        MIN_SCORE
    } else {
        falling(grid_distance, GRID_FULL, GRID_ZERO)
    }
}

/// Score distance to the nearest road (km), the infrastructure component.
///
/// `<= 0.5` scores 100, `>= 5` scores 0, linear in between.
#[must_use]
pub fn road_distance_score(road_distance: f64) -> f64 {
    if road_distance.is_nan() {
        return MIN_SCORE;
    }
    if road_distance <= ROAD_FULL {
        MAX_SCORE
    } else if road_distance >= ROAD_ZERO {
        MIN_SCORE
    } else {
        falling(road_distance, ROAD_FULL, ROAD_ZERO)
    }
}

/// Score terrain slope (degrees) over two linear segments.
///
/// `<= 5` scores 100, `(5, 15]` falls from 100 to 50, `(15, 20]` falls from
/// 50 to 0, and `> 20` scores 0.
///
/// # Examples
/// ```
/// use sitescore_core::slope_score;
///
/// assert_eq!(slope_score(5.0), 100.0);
/// assert!((slope_score(10.0) - 75.0).abs() < 1e-9);
/// assert!((slope_score(15.0) - 50.0).abs() < 1e-9);
/// assert_eq!(slope_score(20.0), 0.0);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "each slope segment interpolates within its own score band"
)]
#[must_use]
pub fn slope_score(slope: f64) -> f64 {
    if slope.is_nan() {
        return MIN_SCORE;
    }
    if slope <= SLOPE_FULL {
        MAX_SCORE
    } else if slope > SLOPE_ZERO {
        MIN_SCORE
    } else if slope <= SLOPE_KNEE {
        let drop = MAX_SCORE - SLOPE_KNEE_SCORE;
        MAX_SCORE - ((slope - SLOPE_FULL) / (SLOPE_KNEE - SLOPE_FULL)) * drop
    } else {
        SLOPE_KNEE_SCORE
            - ((slope - SLOPE_KNEE) / (SLOPE_ZERO - SLOPE_KNEE)) * SLOPE_KNEE_SCORE
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "linear interpolation between two thresholds"
)]
fn rising(value: f64, zero_at: f64, full_at: f64) -> f64 {
    ((value - zero_at) / (full_at - zero_at)) * MAX_SCORE
}

#[expect(
    clippy::float_arithmetic,
    reason = "linear interpolation between two thresholds"
)]
fn falling(value: f64, full_at: f64, zero_at: f64) -> f64 {
    MAX_SCORE - ((value - full_at) / (zero_at - full_at)) * MAX_SCORE
}
