#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for bulk recalculation against a SQLite registry.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::test_support::sample_site;
use sitescore_core::{
    NewSite, RecalculationReport, WeightParameter, Weights, recalculate_all_sites,
};
use sitescore_store::{Page, SiteFilter, SiteRegistryError, SqliteSiteRegistry};
use tempfile::TempDir;

type Outcome = RefCell<Option<Result<RecalculationReport, SiteRegistryError>>>;

/// Aggregate fixtures shared across the BDD scenarios.
pub struct TestContext {
    temp_dir: TempDir,
    db_path: RefCell<Option<Utf8PathBuf>>,
    outcome: Outcome,
}

impl TestContext {
    fn path(&self) -> Utf8PathBuf {
        self.db_path
            .borrow()
            .as_ref()
            .cloned()
            .unwrap_or_else(|| panic!("database path must be initialised"))
    }

    fn open(&self) -> SqliteSiteRegistry {
        SqliteSiteRegistry::open(&self.path()).expect("open site registry")
    }

    fn recalculate(&self, weights: Weights) {
        let mut registry = self.open();
        let result = recalculate_all_sites(&mut registry, weights);
        *self.outcome.borrow_mut() = Some(result);
    }
}

/// Build a fresh `TestContext` for each scenario run.
#[fixture]
pub fn context() -> TestContext {
    TestContext {
        temp_dir: TempDir::new().expect("create tempdir for scenario"),
        db_path: RefCell::new(None),
        outcome: RefCell::new(None),
    }
}

fn area_only() -> Weights {
    Weights::zero().with(WeightParameter::Area, 1.0)
}

fn sized_site(name: &str, area: u32) -> NewSite {
    let mut site = sample_site(name);
    site.metrics.area = area;
    site
}

#[given("a SQLite registry with three imported sites")]
fn registry_with_sites(context: &TestContext) {
    let path = Utf8PathBuf::from_path_buf(context.temp_dir.path().join("sites.db"))
        .expect("utf8 path for database");
    *context.db_path.borrow_mut() = Some(path);
    let mut registry = context.open();
    registry
        .import_sites(&[
            sized_site("small", 2_000),
            sized_site("medium", 27_500),
            sized_site("large", 75_000),
        ])
        .expect("import sites");
}

#[when("I recalculate with area-only weights")]
fn recalculate_area_only(context: &TestContext) {
    context.recalculate(area_only());
}

#[when("I recalculate with a negative slope weight")]
fn recalculate_negative(context: &TestContext) {
    context.recalculate(Weights::default().with(WeightParameter::Slope, -1.0));
}

#[then("the report counts three sites")]
fn counts_three(context: &TestContext) {
    match context.outcome.borrow().as_ref() {
        Some(Ok(report)) => {
            assert!(report.success);
            assert_eq!(report.sites_analyzed, 3);
            assert_eq!(report.weights_used, area_only());
        }
        Some(Err(err)) => panic!("recalculation should succeed, got {err}"),
        None => panic!("recalculation outcome must be recorded"),
    }
}

#[then("every stored total equals its area score")]
fn totals_follow_area(context: &TestContext) {
    let sites = context
        .open()
        .list_sites(&SiteFilter::default(), Page::default())
        .expect("list sites");
    let totals: Vec<(String, f64)> = sites
        .into_iter()
        .map(|site| {
            let scores = site.scores.expect("site should be scored");
            assert!((scores.total - scores.components.area).abs() < 1e-9);
            (site.name, scores.total)
        })
        .collect();
    let names: Vec<&str> = totals.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["large", "medium", "small"]);
}

#[then("the area-only weights survive reopening the database")]
fn weights_persist(context: &TestContext) {
    let weights = context.open().load_weights().expect("load weights");
    assert_eq!(weights, area_only());
}

#[then("the recalculation fails while storing a weight")]
fn fails_on_store(context: &TestContext) {
    match context.outcome.borrow().as_ref() {
        Some(Err(SiteRegistryError::Query { operation, .. })) => {
            assert_eq!(*operation, "store weight");
        }
        Some(Err(other)) => panic!("unexpected error: {other}"),
        Some(Ok(_)) => panic!("expected the recalculation to fail"),
        None => panic!("recalculation outcome must be recorded"),
    }
}

#[then("no stored site has been scored")]
fn nothing_scored(context: &TestContext) {
    let registry = context.open();
    let stats = registry
        .statistics(&SiteFilter::default())
        .expect("statistics");
    assert_eq!(stats.total_sites, 3);
    assert_eq!(stats.scored_sites, 0);
    assert_eq!(registry.load_weights().expect("load weights"), Weights::default());
}

#[scenario(path = "tests/features/sqlite_registry.feature", index = 0)]
fn recalculation_rescores_sites(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/sqlite_registry.feature", index = 1)]
fn rejected_weight_rolls_back(context: TestContext) {
    let _ = context;
}
