//! Behaviour-driven step definitions driving the recalculate CLI scenarios.

use super::helpers::Workspace;
use super::*;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use std::cell::RefCell;

struct RecalculateWorld {
    workspace: Workspace,
    stdout: RefCell<String>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl RecalculateWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            stdout: RefCell::new(String::new()),
            result: RefCell::new(None),
        }
    }

    fn recalculate(&self, flag: &str, value: &str) {
        let assignment = format!("--{flag}={value}");
        let (result, stdout) = self.workspace.run(&[
            "recalculate",
            "--database",
            self.workspace.db(),
            &assignment,
        ]);
        *self.stdout.borrow_mut() = stdout;
        *self.result.borrow_mut() = Some(result);
    }

    fn report(&self) -> Value {
        let borrowed = self.result.borrow();
        match borrowed.as_ref() {
            Some(Ok(())) => serde_json::from_str(&self.stdout.borrow()).expect("JSON report"),
            Some(Err(err)) => panic!("recalculate should succeed, got {err}"),
            None => panic!("result must be recorded"),
        }
    }

    fn with_error(&self, check: impl FnOnce(&CliError)) {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        check(error);
    }
}

#[fixture]
fn world() -> RecalculateWorld {
    RecalculateWorld::new()
}

#[given("a site database with three imported sites")]
fn database_with_sites(#[from(world)] world: &RecalculateWorld) {
    world.workspace.import_ranked_sites();
}

#[given("no site database exists")]
fn no_database(#[from(world)] world: &RecalculateWorld) {
    assert!(!world.workspace.database.as_std_path().exists());
}

#[when("I recalculate with a solar weight of 0.5")]
fn recalculate_solar(#[from(world)] world: &RecalculateWorld) {
    world.recalculate(ARG_SOLAR_WEIGHT, "0.5");
}

#[when("I recalculate with a slope weight of -1")]
fn recalculate_negative_slope(#[from(world)] world: &RecalculateWorld) {
    world.recalculate(ARG_SLOPE_WEIGHT, "-1");
}

#[then("the report counts 3 sites")]
fn report_counts_sites(#[from(world)] world: &RecalculateWorld) {
    let report = world.report();
    assert_eq!(report["success"], true);
    assert_eq!(report["sites_analyzed"], 3);
}

#[then("the stored solar weight is 0.5")]
fn stored_solar_weight(#[from(world)] world: &RecalculateWorld) {
    let weights = world
        .workspace
        .run_json(&["weights", "--database", world.workspace.db()]);
    let solar = weights
        .as_array()
        .expect("weights array")
        .iter()
        .find(|weight| weight["parameter"] == "solar")
        .expect("solar weight row");
    assert_eq!(solar["value"], 0.5);
}

#[then("the best site scores 100")]
fn best_site_scores(#[from(world)] world: &RecalculateWorld) {
    let sites = world.workspace.run_json(&[
        "sites",
        "--database",
        world.workspace.db(),
        "--limit",
        "1",
    ]);
    let total = sites[0]["scores"]["total"].as_f64().expect("total score");
    assert!((total - 100.0).abs() < 1e-9);
}

#[then("the command fails because the weights are invalid")]
fn fails_invalid_weights(#[from(world)] world: &RecalculateWorld) {
    world.with_error(|error| match error {
        CliError::InvalidWeights(_) => {}
        other => panic!("expected InvalidWeights, found {other:?}"),
    });
}

#[then("no site has been scored")]
fn nothing_scored(#[from(world)] world: &RecalculateWorld) {
    let stats = world
        .workspace
        .run_json(&["stats", "--database", world.workspace.db()]);
    assert_eq!(stats["scored_sites"], 0);
    assert!(stats["total_score"].is_null());
}

#[then("the command fails because the database is missing")]
fn fails_missing_database(#[from(world)] world: &RecalculateWorld) {
    world.with_error(|error| match error {
        CliError::MissingDatabase { .. } => {}
        other => panic!("expected MissingDatabase, found {other:?}"),
    });
}

macro_rules! register_recalculate_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(
            path = "tests/features/recalculate_command.feature",
            name = $scenario_title
        )]
        fn $fn_name(#[from(world)] world: RecalculateWorld) {
            let _ = world;
        }
    };
}

register_recalculate_scenario!(
    recalculate_new_solar_weight,
    "recalculating with a new solar weight"
);
register_recalculate_scenario!(recalculate_negative_weight, "rejecting negative weights");
register_recalculate_scenario!(
    recalculate_without_database,
    "recalculating without a database"
);
