//! SQLite-backed [`SiteRegistry`] and its recalculation session.
#![forbid(unsafe_code)]

use std::fmt;

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction};
use sitescore_core::{RegistrySession, SiteRegistry, WeightParameter, Weights};

use crate::functions::register_scoring_functions;
use crate::{SiteRegistryError, initialise_schema};

const UPSERT_WEIGHT_SQL: &str = "INSERT INTO analysis_parameters (parameter_name, weight_value, updated_at)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(parameter_name) DO UPDATE SET
         weight_value = excluded.weight_value,
         updated_at = excluded.updated_at";

const COMPONENT_SCORES_SQL: &str = "UPDATE sites SET
         solar_score = sitescore_solar(solar_irradiance),
         area_score = sitescore_area(area_m2),
         grid_score = sitescore_grid_distance(grid_distance_km),
         slope_score = sitescore_slope(slope_degrees),
         infrastructure_score = sitescore_infrastructure(road_distance_km)";

// Runs after COMPONENT_SCORES_SQL: SET expressions read pre-update column values.
const TOTAL_SCORE_SQL: &str = "UPDATE sites SET
         total_score =
             solar_score * COALESCE((SELECT weight_value FROM analysis_parameters
                 WHERE parameter_name = 'solar_irradiance_weight'), 0.0)
           + area_score * COALESCE((SELECT weight_value FROM analysis_parameters
                 WHERE parameter_name = 'area_weight'), 0.0)
           + grid_score * COALESCE((SELECT weight_value FROM analysis_parameters
                 WHERE parameter_name = 'grid_distance_weight'), 0.0)
           + slope_score * COALESCE((SELECT weight_value FROM analysis_parameters
                 WHERE parameter_name = 'slope_weight'), 0.0)
           + infrastructure_score * COALESCE((SELECT weight_value FROM analysis_parameters
                 WHERE parameter_name = 'infrastructure_weight'), 0.0),
         scored_at = ?1";

/// A weight row as persisted in `analysis_parameters`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct StoredWeight {
    /// Weight parameter.
    pub parameter: WeightParameter,
    /// Persisted value.
    pub value: f64,
    /// When the value was last written.
    pub updated_at: DateTime<Utc>,
}

/// Site registry stored in a single SQLite database.
///
/// Opening the registry registers the scoring SQL functions and initialises
/// the schema, seeding default weights on first use.
pub struct SqliteSiteRegistry {
    pub(crate) connection: Connection,
}

impl fmt::Debug for SqliteSiteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSiteRegistry")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteSiteRegistry {
    /// Open (creating when missing) the registry database at `path`.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::OpenDatabase`] when the file cannot be
    /// opened, or the error raised while preparing the connection.
    pub fn open(path: &Utf8Path) -> Result<Self, SiteRegistryError> {
        let connection = Connection::open(path.as_std_path()).map_err(|source| {
            SiteRegistryError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory registry.
    ///
    /// # Errors
    /// Returns the error raised while preparing the connection.
    pub fn open_in_memory() -> Result<Self, SiteRegistryError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SiteRegistryError::OpenDatabase {
                path: ":memory:".into(),
                source,
            })?;
        Self::from_connection(connection)
    }

    /// Wrap an existing connection, registering functions and schema.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::RegisterFunction`] or
    /// [`SiteRegistryError::Schema`] when preparation fails.
    pub fn from_connection(mut connection: Connection) -> Result<Self, SiteRegistryError> {
        register_scoring_functions(&connection)?;
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// Borrow the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Read every configured weight row, ordered by parameter.
    ///
    /// Rows whose name matches no parameter are skipped.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::Query`] when the rows cannot be read.
    pub fn stored_weights(&self) -> Result<Vec<StoredWeight>, SiteRegistryError> {
        let mut statement = self
            .connection
            .prepare(
                "SELECT parameter_name, weight_value, updated_at FROM analysis_parameters",
            )
            .map_err(|source| SiteRegistryError::Query {
                operation: "prepare weight selection",
                source,
            })?;
        let rows = statement
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let value: f64 = row.get(1)?;
                let updated_at: DateTime<Utc> = row.get(2)?;
                Ok((name, value, updated_at))
            })
            .map_err(|source| SiteRegistryError::Query {
                operation: "query weights",
                source,
            })?;

        let mut weights = Vec::new();
        for row in rows {
            let (name, value, updated_at) = row.map_err(|source| SiteRegistryError::Query {
                operation: "read weight row",
                source,
            })?;
            match name.parse::<WeightParameter>() {
                Ok(parameter) => weights.push(StoredWeight {
                    parameter,
                    value,
                    updated_at,
                }),
                Err(err) => log::debug!("skipping weight row: {err}"),
            }
        }
        weights.sort_by_key(|weight| weight.parameter);
        Ok(weights)
    }

    /// Assemble the current weight configuration.
    ///
    /// # Errors
    /// Returns [`SiteRegistryError::MissingWeight`] when a parameter has no
    /// row, or the error raised by [`Self::stored_weights`].
    pub fn load_weights(&self) -> Result<Weights, SiteRegistryError> {
        let stored = self.stored_weights()?;
        let mut weights = Weights::zero();
        for parameter in WeightParameter::ALL {
            let row = stored
                .iter()
                .find(|weight| weight.parameter == parameter)
                .ok_or(SiteRegistryError::MissingWeight { parameter })?;
            weights.set(parameter, row.value);
        }
        Ok(weights)
    }
}

impl SiteRegistry for SqliteSiteRegistry {
    type Error = SiteRegistryError;
    type Session<'a> = SqliteSession<'a>;

    fn begin(&mut self) -> Result<Self::Session<'_>, Self::Error> {
        let transaction =
            self.connection
                .transaction()
                .map_err(|source| SiteRegistryError::Query {
                    operation: "begin recalculation transaction",
                    source,
                })?;
        Ok(SqliteSession { transaction })
    }
}

/// Recalculation unit of work wrapping a SQLite transaction.
///
/// Dropping the session without committing rolls the transaction back.
#[derive(Debug)]
pub struct SqliteSession<'conn> {
    transaction: Transaction<'conn>,
}

impl RegistrySession for SqliteSession<'_> {
    type Error = SiteRegistryError;

    fn store_weight(
        &mut self,
        parameter: WeightParameter,
        value: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), Self::Error> {
        if !value.is_finite() {
            return Err(SiteRegistryError::NonFiniteWeight { parameter, value });
        }
        self.transaction
            .prepare_cached(UPSERT_WEIGHT_SQL)
            .and_then(|mut statement| statement.execute((parameter.as_str(), value, updated_at)))
            .map(|_| ())
            .map_err(|source| SiteRegistryError::Query {
                operation: "store weight",
                source,
            })
    }

    fn count_sites(&mut self) -> Result<u64, Self::Error> {
        let count: i64 = self
            .transaction
            .query_row("SELECT COUNT(*) FROM sites", [], |row| row.get(0))
            .map_err(|source| SiteRegistryError::Query {
                operation: "count sites",
                source,
            })?;
        u64::try_from(count).map_err(|_| SiteRegistryError::CountOutOfRange { count })
    }

    fn run_bulk_compute(&mut self, computed_at: DateTime<Utc>) -> Result<(), Self::Error> {
        let components = self
            .transaction
            .execute(COMPONENT_SCORES_SQL, [])
            .map_err(|source| SiteRegistryError::Query {
                operation: "compute component scores",
                source,
            })?;
        log::debug!("computed component scores for {components} sites");
        self.transaction
            .execute(TOTAL_SCORE_SQL, [computed_at])
            .map_err(|source| SiteRegistryError::Query {
                operation: "compute total scores",
                source,
            })?;
        Ok(())
    }

    fn commit(self) -> Result<(), Self::Error> {
        self.transaction
            .commit()
            .map_err(|source| SiteRegistryError::Query {
                operation: "commit recalculation",
                source,
            })
    }
}
