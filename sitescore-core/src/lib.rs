//! Core scoring for candidate installation sites.
//!
//! Five raw measurements are each mapped onto `0..=100` by an independent
//! piecewise-linear normaliser and combined into a weighted total. The
//! [`SiteRegistry`] trait abstracts the storage that persists weights and
//! recomputes scores in bulk; [`recalculate_all_sites`] drives it.
//!
//! # Examples
//!
//! ```
//! use sitescore_core::{RawMetrics, Weights, score_site};
//!
//! let metrics = RawMetrics {
//!     solar_irradiance: 4.25,
//!     area: 27_500,
//!     grid_distance: 10.5,
//!     road_distance: 2.75,
//!     slope: 10.0,
//! };
//! let scores = score_site(&metrics, &Weights::default());
//! assert!((scores.components.slope - 75.0).abs() < 1e-9);
//! assert!((scores.total - 52.5).abs() < 1e-9);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod metrics;
pub mod normalise;
mod recalculate;
mod registry;
mod score;
mod site;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
mod weights;

pub use metrics::RawMetrics;
pub use normalise::{area_score, grid_distance_score, road_distance_score, slope_score, solar_score};
pub use recalculate::{RecalculationReport, recalculate_all_sites, recalculate_all_sites_at};
pub use registry::{RegistrySession, SiteRegistry};
pub use score::{ComponentScores, ScoreSet, score_site, total_score};
pub use site::{NewSite, Site};
pub use weights::{WeightParameter, Weights, WeightsError};
