//! Storage collaborator for weights and sites.
//!
//! A [`SiteRegistry`] owns the persisted weight configuration and the sites
//! table. Work happens inside a [`RegistrySession`], a unit of work that
//! becomes visible only once [`RegistrySession::commit`] succeeds. Dropping a
//! session without committing discards its changes.

use chrono::{DateTime, Utc};

use crate::WeightParameter;

/// Persistent store of weights and candidate sites.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "test-support")] {
/// use chrono::Utc;
/// use sitescore_core::test_support::MemoryRegistry;
/// use sitescore_core::{RegistrySession, SiteRegistry, WeightParameter};
///
/// let mut registry = MemoryRegistry::default();
/// let mut session = registry.begin().expect("memory registry never fails");
/// session
///     .store_weight(WeightParameter::Solar, 0.6, Utc::now())
///     .expect("store weight");
/// session.commit().expect("commit");
/// assert_eq!(registry.weights().solar, 0.6);
/// # }
/// ```
pub trait SiteRegistry {
    /// Error surfaced by the underlying storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Unit of work borrowed from the registry.
    type Session<'a>: RegistrySession<Error = Self::Error>
    where
        Self: 'a;

    /// Open a unit of work.
    ///
    /// # Errors
    /// Returns the storage error when the unit of work cannot be started.
    fn begin(&mut self) -> Result<Self::Session<'_>, Self::Error>;
}

/// Operations available inside a registry unit of work.
pub trait RegistrySession {
    /// Error surfaced by the underlying storage.
    type Error;

    /// Persist `value` under `parameter`, stamping it with `updated_at`.
    ///
    /// Concurrent writers are not coordinated; the last commit wins.
    ///
    /// # Errors
    /// Returns the storage error, e.g. on a constraint violation.
    fn store_weight(
        &mut self,
        parameter: WeightParameter,
        value: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), Self::Error>;

    /// Count the stored sites.
    ///
    /// # Errors
    /// Returns the storage error when the count cannot be read.
    fn count_sites(&mut self) -> Result<u64, Self::Error>;

    /// Recompute every site's scores from the persisted weights.
    ///
    /// # Errors
    /// Returns the storage error raised by the bulk update.
    fn run_bulk_compute(&mut self, computed_at: DateTime<Utc>) -> Result<(), Self::Error>;

    /// Make the session's changes durable.
    ///
    /// # Errors
    /// Returns the storage error when the commit fails.
    fn commit(self) -> Result<(), Self::Error>;
}
