//! Bulk recalculation of every stored site under new weights.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{RegistrySession, SiteRegistry, Weights};

/// Outcome of [`recalculate_all_sites`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecalculationReport {
    /// Whether the recalculation committed.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Number of sites in the registry when the bulk compute ran.
    pub sites_analyzed: u64,
    /// The weights that were persisted and applied.
    pub weights_used: Weights,
    /// When the weights were stored and the scores computed.
    pub timestamp: DateTime<Utc>,
}

/// Persist `weights` and recompute the scores of every stored site.
///
/// Equivalent to [`recalculate_all_sites_at`] stamped with the current time.
///
/// # Errors
/// Propagates the registry's error unchanged; nothing is retried.
pub fn recalculate_all_sites<R>(
    registry: &mut R,
    weights: Weights,
) -> Result<RecalculationReport, R::Error>
where
    R: SiteRegistry,
{
    recalculate_all_sites_at(registry, weights, Utc::now())
}

/// Persist `weights` and recompute every site, stamping both with `at`.
///
/// All writes share one registry session: each weight is stored, the sites
/// are counted, the bulk compute runs and the session commits. When any
/// step fails the session is dropped uncommitted and the error is returned.
///
/// # Errors
/// Propagates the registry's error unchanged; nothing is retried.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "test-support")] {
/// use chrono::{TimeZone, Utc};
/// use sitescore_core::test_support::{MemoryRegistry, sample_site};
/// use sitescore_core::{Weights, recalculate_all_sites_at};
///
/// let mut registry = MemoryRegistry::with_sites([sample_site("ridge")]);
/// let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid time");
/// let report = recalculate_all_sites_at(&mut registry, Weights::default(), at)
///     .expect("memory registry never fails");
/// assert!(report.success);
/// assert_eq!(report.sites_analyzed, 1);
/// assert_eq!(report.timestamp, at);
/// # }
/// ```
pub fn recalculate_all_sites_at<R>(
    registry: &mut R,
    weights: Weights,
    at: DateTime<Utc>,
) -> Result<RecalculationReport, R::Error>
where
    R: SiteRegistry,
{
    if !weights.is_normalised() {
        log::warn!(
            "weights sum to {} rather than 1.0; totals will leave the 0-100 range",
            weights.sum()
        );
    }

    let mut session = registry.begin()?;
    for (parameter, value) in weights.parameters() {
        log::debug!("storing {parameter} = {value}");
        session.store_weight(parameter, value, at)?;
    }
    let sites_analyzed = session.count_sites()?;
    session.run_bulk_compute(at)?;
    session.commit()?;

    log::info!("recalculated suitability scores for {sites_analyzed} sites");
    Ok(RecalculationReport {
        success: true,
        message: format!("Successfully recalculated scores for {sites_analyzed} sites"),
        sites_analyzed,
        weights_used: weights,
        timestamp: at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeightParameter;
    use crate::test_support::{FailingRegistry, FailureStage, MemoryRegistry, sample_site};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn at() -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).single() {
            Some(at) => at,
            None => panic!("fixture timestamp should be unambiguous"),
        }
    }

    #[rstest]
    fn report_echoes_weights_and_counts_sites(at: DateTime<Utc>) {
        let mut registry = MemoryRegistry::with_sites([sample_site("a"), sample_site("b")]);
        let weights = Weights::new(0.2, 0.2, 0.2, 0.2, 0.2);

        let report = recalculate_all_sites_at(&mut registry, weights, at).expect("recalculate");

        assert!(report.success);
        assert_eq!(report.sites_analyzed, 2);
        assert_eq!(report.weights_used, weights);
        assert_eq!(report.timestamp, at);
        assert_eq!(
            report.message,
            "Successfully recalculated scores for 2 sites"
        );
    }

    #[rstest]
    fn weights_are_persisted_with_timestamp(at: DateTime<Utc>) {
        let mut registry = MemoryRegistry::default();
        let weights = Weights::default().with(WeightParameter::Area, 0.5);

        recalculate_all_sites_at(&mut registry, weights, at).expect("recalculate");

        assert_eq!(registry.weights(), weights);
        for parameter in WeightParameter::ALL {
            assert_eq!(registry.updated_at(parameter), Some(at));
        }
    }

    #[rstest]
    fn empty_registry_reports_zero_sites(at: DateTime<Utc>) {
        let mut registry = MemoryRegistry::default();
        let report =
            recalculate_all_sites_at(&mut registry, Weights::default(), at).expect("recalculate");
        assert_eq!(report.sites_analyzed, 0);
    }

    #[rstest]
    #[case(FailureStage::Begin)]
    #[case(FailureStage::StoreWeight)]
    #[case(FailureStage::CountSites)]
    #[case(FailureStage::BulkCompute)]
    #[case(FailureStage::Commit)]
    fn storage_errors_propagate(at: DateTime<Utc>, #[case] stage: FailureStage) {
        let mut registry = FailingRegistry::new(stage);
        let err = recalculate_all_sites_at(&mut registry, Weights::default(), at)
            .expect_err("failure should propagate");
        assert_eq!(err.stage, stage);
    }

    #[rstest]
    fn failed_bulk_compute_leaves_registry_untouched(at: DateTime<Utc>) {
        let mut registry = MemoryRegistry::with_sites([sample_site("a")]).failing_bulk_compute();
        let before = registry.weights();

        let result = recalculate_all_sites_at(&mut registry, Weights::zero(), at);

        assert!(result.is_err());
        assert_eq!(registry.weights(), before);
        assert!(registry.sites().iter().all(|site| site.scores.is_none()));
    }
}
