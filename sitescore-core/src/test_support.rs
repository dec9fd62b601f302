//! In-memory registries used by unit, behaviour and documentation tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{NewSite, RawMetrics, RegistrySession, Site, SiteRegistry, WeightParameter, Weights};
use crate::score_site;

/// Registry step at which a test registry reports an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Opening the session.
    Begin,
    /// Persisting a weight.
    StoreWeight,
    /// Counting sites.
    CountSites,
    /// Running the bulk compute.
    BulkCompute,
    /// Committing the session.
    Commit,
}

/// Error raised by the test registries.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("registry failed during {stage:?}")]
pub struct RegistryFailure {
    /// Step that failed.
    pub stage: FailureStage,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    weights: Weights,
    updated_at: BTreeMap<WeightParameter, DateTime<Utc>>,
    sites: Vec<Site>,
}

/// `SiteRegistry` holding weights and sites in memory.
///
/// Sessions stage a copy of the state and swap it in on commit, so a dropped
/// session leaves the registry unchanged.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    state: MemoryState,
    fail_bulk_compute: bool,
}

impl MemoryRegistry {
    /// Create a registry holding `sites`, numbered from 1 in order.
    pub fn with_sites<I>(sites: I) -> Self
    where
        I: IntoIterator<Item = NewSite>,
    {
        let sites = sites
            .into_iter()
            .zip(1_u64..)
            .map(|(site, id)| Site {
                id,
                name: site.name,
                latitude: site.latitude,
                longitude: site.longitude,
                metrics: site.metrics,
                scores: None,
                scored_at: None,
            })
            .collect();
        Self {
            state: MemoryState {
                sites,
                ..MemoryState::default()
            },
            fail_bulk_compute: false,
        }
    }

    /// Make every bulk compute fail after the weights have been staged.
    #[must_use]
    pub const fn failing_bulk_compute(mut self) -> Self {
        self.fail_bulk_compute = true;
        self
    }

    /// Committed weights.
    #[must_use]
    pub const fn weights(&self) -> Weights {
        self.state.weights
    }

    /// Committed update time of `parameter`, if it was ever stored.
    #[must_use]
    pub fn updated_at(&self, parameter: WeightParameter) -> Option<DateTime<Utc>> {
        self.state.updated_at.get(&parameter).copied()
    }

    /// Committed sites.
    #[must_use]
    pub fn sites(&self) -> &[Site] {
        &self.state.sites
    }
}

impl SiteRegistry for MemoryRegistry {
    type Error = RegistryFailure;
    type Session<'a> = MemorySession<'a>;

    fn begin(&mut self) -> Result<Self::Session<'_>, Self::Error> {
        let staged = self.state.clone();
        Ok(MemorySession {
            registry: self,
            staged,
        })
    }
}

/// Unit of work against a [`MemoryRegistry`].
#[derive(Debug)]
pub struct MemorySession<'a> {
    registry: &'a mut MemoryRegistry,
    staged: MemoryState,
}

impl RegistrySession for MemorySession<'_> {
    type Error = RegistryFailure;

    fn store_weight(
        &mut self,
        parameter: WeightParameter,
        value: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), Self::Error> {
        self.staged.weights.set(parameter, value);
        self.staged.updated_at.insert(parameter, updated_at);
        Ok(())
    }

    fn count_sites(&mut self) -> Result<u64, Self::Error> {
        Ok(self.staged.sites.len() as u64)
    }

    fn run_bulk_compute(&mut self, computed_at: DateTime<Utc>) -> Result<(), Self::Error> {
        if self.registry.fail_bulk_compute {
            return Err(RegistryFailure {
                stage: FailureStage::BulkCompute,
            });
        }
        let weights = self.staged.weights;
        for site in &mut self.staged.sites {
            site.scores = Some(score_site(&site.metrics, &weights));
            site.scored_at = Some(computed_at);
        }
        Ok(())
    }

    fn commit(self) -> Result<(), Self::Error> {
        self.registry.state = self.staged;
        Ok(())
    }
}

/// `SiteRegistry` whose sessions fail at a chosen stage.
#[derive(Debug, Clone, Copy)]
pub struct FailingRegistry {
    stage: FailureStage,
}

impl FailingRegistry {
    /// Create a registry failing at `stage`.
    #[must_use]
    pub const fn new(stage: FailureStage) -> Self {
        Self { stage }
    }
}

impl SiteRegistry for FailingRegistry {
    type Error = RegistryFailure;
    type Session<'a> = FailingSession;

    fn begin(&mut self) -> Result<Self::Session<'_>, Self::Error> {
        if self.stage == FailureStage::Begin {
            return Err(RegistryFailure { stage: self.stage });
        }
        Ok(FailingSession { stage: self.stage })
    }
}

/// Session returned by [`FailingRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct FailingSession {
    stage: FailureStage,
}

impl FailingSession {
    fn check(self, stage: FailureStage) -> Result<(), RegistryFailure> {
        if self.stage == stage {
            Err(RegistryFailure { stage })
        } else {
            Ok(())
        }
    }
}

impl RegistrySession for FailingSession {
    type Error = RegistryFailure;

    fn store_weight(
        &mut self,
        _parameter: WeightParameter,
        _value: f64,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), Self::Error> {
        self.check(FailureStage::StoreWeight)
    }

    fn count_sites(&mut self) -> Result<u64, Self::Error> {
        self.check(FailureStage::CountSites).map(|()| 0)
    }

    fn run_bulk_compute(&mut self, _computed_at: DateTime<Utc>) -> Result<(), Self::Error> {
        self.check(FailureStage::BulkCompute)
    }

    fn commit(self) -> Result<(), Self::Error> {
        self.check(FailureStage::Commit)
    }
}

/// A site with mid-range measurements, labelled `name`.
///
/// Its components score solar 50, area 50, grid 50, slope 75 and
/// infrastructure 50.
#[must_use]
pub fn sample_site(name: &str) -> NewSite {
    NewSite {
        name: name.to_owned(),
        latitude: 37.5,
        longitude: -3.7,
        metrics: RawMetrics {
            solar_irradiance: 4.25,
            area: 27_500,
            grid_distance: 10.5,
            road_distance: 2.75,
            slope: 10.0,
        },
    }
}
