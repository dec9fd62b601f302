//! Facade crate for the site suitability scorer.
//!
//! This crate re-exports the core scoring types and exposes the SQLite site
//! registry behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use sitescore_core::{
    ComponentScores, NewSite, RawMetrics, RecalculationReport, RegistrySession, ScoreSet, Site,
    SiteRegistry, WeightParameter, Weights, WeightsError, area_score, grid_distance_score,
    recalculate_all_sites, recalculate_all_sites_at, road_distance_score, score_site, slope_score,
    solar_score, total_score,
};

#[cfg(feature = "store-sqlite")]
pub use sitescore_store::{
    Page, ScoreSummary, SiteFilter, SiteRegistryError, SiteStatistics, SqliteSession,
    SqliteSiteRegistry, StoredWeight, initialise_schema,
};
