//! Candidate sites held by a registry.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{RawMetrics, ScoreSet};

/// A site awaiting insertion into a registry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewSite {
    /// Human-readable label.
    pub name: String,
    /// WGS84 latitude in degrees.
    pub latitude: f64,
    /// WGS84 longitude in degrees.
    pub longitude: f64,
    /// Raw measurements used for scoring.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics: RawMetrics,
}

/// A stored site with its most recent scores.
///
/// Serialises with the same flat metric fields as [`NewSite`], so exported
/// sites can be imported again.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Site {
    /// Registry-assigned identifier.
    pub id: u64,
    /// Human-readable label.
    pub name: String,
    /// WGS84 latitude in degrees.
    pub latitude: f64,
    /// WGS84 longitude in degrees.
    pub longitude: f64,
    /// Raw measurements used for scoring.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics: RawMetrics,
    /// Scores from the last recalculation, if the site has been scored.
    pub scores: Option<ScoreSet>,
    /// When the scores were computed.
    pub scored_at: Option<DateTime<Utc>>,
}
