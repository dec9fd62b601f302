//! Reading and writing candidate sites.
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use sitescore_core::{ComponentScores, NewSite, RawMetrics, ScoreSet, Site};

use crate::{SiteRegistryError, SqliteSiteRegistry};

const SITE_COLUMNS: &str = "id, name, latitude, longitude,
    solar_irradiance, area_m2, grid_distance_km, road_distance_km, slope_degrees,
    solar_score, area_score, grid_score, slope_score, infrastructure_score, total_score,
    scored_at";

const INSERT_SITE_SQL: &str = "INSERT INTO sites (
        name, latitude, longitude,
        solar_irradiance, area_m2, grid_distance_km, road_distance_km, slope_degrees
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

// Unscored sites never match a bound; `?N IS NULL` disables an absent bound.
const SCORE_BOUNDS_SQL: &str =
    "(?1 IS NULL OR total_score >= ?1) AND (?2 IS NULL OR total_score <= ?2)";

/// Optional bounds on the total score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteFilter {
    /// Inclusive lower bound.
    pub min_score: Option<f64>,
    /// Inclusive upper bound.
    pub max_score: Option<f64>,
}

/// Paging applied to site listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Maximum number of sites to return; all when absent.
    pub limit: Option<u32>,
    /// Number of leading sites to skip.
    pub offset: u32,
}

/// Summary of total scores across scored sites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Mean total score.
    pub average: f64,
    /// Lowest total score.
    pub minimum: f64,
    /// Highest total score.
    pub maximum: f64,
}

/// Aggregate view of the sites matching a [`SiteFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteStatistics {
    /// Sites matching the filter.
    pub total_sites: u64,
    /// Matching sites that carry scores.
    pub scored_sites: u64,
    /// Score summary, absent when no matching site is scored.
    pub total_score: Option<ScoreSummary>,
}

struct SiteRow {
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
    solar_irradiance: f64,
    area: i64,
    grid_distance: f64,
    road_distance: f64,
    slope: f64,
    scores: [Option<f64>; 6],
    scored_at: Option<DateTime<Utc>>,
}

impl SiteRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            latitude: row.get(2)?,
            longitude: row.get(3)?,
            solar_irradiance: row.get(4)?,
            area: row.get(5)?,
            grid_distance: row.get(6)?,
            road_distance: row.get(7)?,
            slope: row.get(8)?,
            scores: [
                row.get(9)?,
                row.get(10)?,
                row.get(11)?,
                row.get(12)?,
                row.get(13)?,
                row.get(14)?,
            ],
            scored_at: row.get(15)?,
        })
    }

    fn into_site(self) -> Result<Site, SiteRegistryError> {
        let id = u64::try_from(self.id)
            .map_err(|_| SiteRegistryError::SiteIdOutOfRange { id: self.id })?;
        let area = u32::try_from(self.area).map_err(|_| SiteRegistryError::AreaOutOfRange {
            site_id: id,
            raw: self.area,
        })?;
        let scores = match self.scores {
            [
                Some(solar),
                Some(area),
                Some(grid_distance),
                Some(slope),
                Some(infrastructure),
                Some(total),
            ] => Some(ScoreSet {
                components: ComponentScores {
                    solar,
                    area,
                    grid_distance,
                    slope,
                    infrastructure,
                },
                total,
            }),
            _ => None,
        };
        Ok(Site {
            id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            metrics: RawMetrics {
                solar_irradiance: self.solar_irradiance,
                area,
                grid_distance: self.grid_distance,
                road_distance: self.road_distance,
                slope: self.slope,
            },
            scores,
            scored_at: self.scored_at,
        })
    }
}

impl SqliteSiteRegistry {
    /// Insert one site and return its identifier.
    ///
    /// The site is stored unscored; run a recalculation to score it.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::NanMeasurement`] when a coordinate or
    /// measurement is NaN, and [`SiteRegistryError::Query`] when the insert
    /// fails, e.g. on out-of-range coordinates.
    pub fn insert_site(&self, site: &NewSite) -> Result<u64, SiteRegistryError> {
        reject_nan(site)?;
        self.connection
            .prepare_cached(INSERT_SITE_SQL)
            .and_then(|mut statement| statement.execute(site_params(site)))
            .map_err(|source| SiteRegistryError::Query {
                operation: "insert site",
                source,
            })?;
        let id = self.connection.last_insert_rowid();
        u64::try_from(id).map_err(|_| SiteRegistryError::SiteIdOutOfRange { id })
    }

    /// Insert every site in one transaction.
    ///
    /// Either all sites are stored or, on the first failure, none are.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::NanMeasurement`] before writing anything
    /// when any site carries a NaN, and [`SiteRegistryError::Query`] naming
    /// the failed step otherwise.
    pub fn import_sites(&mut self, sites: &[NewSite]) -> Result<usize, SiteRegistryError> {
        sites.iter().try_for_each(reject_nan)?;
        let transaction =
            self.connection
                .transaction()
                .map_err(|source| SiteRegistryError::Query {
                    operation: "begin import transaction",
                    source,
                })?;
        {
            let mut insert = transaction.prepare_cached(INSERT_SITE_SQL).map_err(|source| {
                SiteRegistryError::Query {
                    operation: "prepare site insert",
                    source,
                }
            })?;
            for site in sites {
                insert
                    .execute(site_params(site))
                    .map_err(|source| SiteRegistryError::Query {
                        operation: "import site",
                        source,
                    })?;
            }
        }
        transaction
            .commit()
            .map_err(|source| SiteRegistryError::Query {
                operation: "commit import",
                source,
            })?;
        log::info!("imported {} sites", sites.len());
        Ok(sites.len())
    }

    /// Fetch one site by identifier.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::Query`] when the lookup fails, or a range
    /// error when the stored row cannot be represented.
    pub fn site(&self, id: u64) -> Result<Option<Site>, SiteRegistryError> {
        let Ok(raw_id) = i64::try_from(id) else {
            return Ok(None);
        };
        let query = format!("SELECT {SITE_COLUMNS} FROM sites WHERE id = ?1");
        self.connection
            .query_row(&query, [raw_id], SiteRow::read)
            .optional()
            .map_err(|source| SiteRegistryError::Query {
                operation: "look up site",
                source,
            })?
            .map(SiteRow::into_site)
            .transpose()
    }

    /// List sites matching `filter`, best total score first.
    ///
    /// Unscored sites follow scored ones; ties are broken by identifier.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::Query`] when the rows cannot be read.
    pub fn list_sites(
        &self,
        filter: &SiteFilter,
        page: Page,
    ) -> Result<Vec<Site>, SiteRegistryError> {
        let query = format!(
            "SELECT {SITE_COLUMNS} FROM sites
             WHERE {SCORE_BOUNDS_SQL}
             ORDER BY total_score IS NULL, total_score DESC, id
             LIMIT ?3 OFFSET ?4"
        );
        let limit = page.limit.map_or(-1, i64::from);
        let mut statement =
            self.connection
                .prepare(&query)
                .map_err(|source| SiteRegistryError::Query {
                    operation: "prepare site listing",
                    source,
                })?;
        let rows = statement
            .query_map(
                (filter.min_score, filter.max_score, limit, i64::from(page.offset)),
                SiteRow::read,
            )
            .map_err(|source| SiteRegistryError::Query {
                operation: "list sites",
                source,
            })?;

        let mut sites = Vec::new();
        for row in rows {
            let row = row.map_err(|source| SiteRegistryError::Query {
                operation: "read site row",
                source,
            })?;
            sites.push(row.into_site()?);
        }
        Ok(sites)
    }

    /// Count and summarise the sites matching `filter`.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::Query`] when the aggregate fails.
    pub fn statistics(&self, filter: &SiteFilter) -> Result<SiteStatistics, SiteRegistryError> {
        let query = format!(
            "SELECT COUNT(*), COUNT(total_score), AVG(total_score), MIN(total_score), MAX(total_score)
             FROM sites WHERE {SCORE_BOUNDS_SQL}"
        );
        let (total, scored, average, minimum, maximum): (
            i64,
            i64,
            Option<f64>,
            Option<f64>,
            Option<f64>,
        ) = self
            .connection
            .query_row(&query, (filter.min_score, filter.max_score), |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })
            .map_err(|source| SiteRegistryError::Query {
                operation: "summarise sites",
                source,
            })?;

        let total_score = match (average, minimum, maximum) {
            (Some(average), Some(minimum), Some(maximum)) => Some(ScoreSummary {
                average,
                minimum,
                maximum,
            }),
            _ => None,
        };
        Ok(SiteStatistics {
            total_sites: count_to_u64(total)?,
            scored_sites: count_to_u64(scored)?,
            total_score,
        })
    }
}

fn site_params(site: &NewSite) -> (&str, f64, f64, f64, u32, f64, f64, f64) {
    let metrics = &site.metrics;
    (
        site.name.as_str(),
        site.latitude,
        site.longitude,
        metrics.solar_irradiance,
        metrics.area,
        metrics.grid_distance,
        metrics.road_distance,
        metrics.slope,
    )
}

// SQLite binds NaN as NULL.
fn reject_nan(site: &NewSite) -> Result<(), SiteRegistryError> {
    let metrics = &site.metrics;
    let fields = [
        ("latitude", site.latitude),
        ("longitude", site.longitude),
        ("solar_irradiance", metrics.solar_irradiance),
        ("grid_distance", metrics.grid_distance),
        ("road_distance", metrics.road_distance),
        ("slope", metrics.slope),
    ];
    fields
        .into_iter()
        .find(|(_, value)| value.is_nan())
        .map_or(Ok(()), |(field, _)| {
            Err(SiteRegistryError::NanMeasurement {
                site: site.name.clone(),
                field,
            })
        })
}

fn count_to_u64(count: i64) -> Result<u64, SiteRegistryError> {
    u64::try_from(count).map_err(|_| SiteRegistryError::CountOutOfRange { count })
}
