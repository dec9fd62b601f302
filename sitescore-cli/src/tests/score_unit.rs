//! Focused unit tests covering score CLI configuration.

use super::*;
use crate::score::{ScoreArgs, ScoreConfig, config_from_layers_for_test, overlay_weights};
use rstest::rstest;
use sitescore_core::{RawMetrics, WeightParameter, Weights, WeightsError};

fn complete_args() -> ScoreArgs {
    ScoreArgs {
        solar_irradiance: Some(4.25),
        area: Some(27_500),
        grid_distance: Some(10.5),
        road_distance: Some(2.75),
        slope: Some(10.0),
        ..ScoreArgs::default()
    }
}

#[rstest]
#[case::solar(ARG_SOLAR_IRRADIANCE, ENV_SOLAR_IRRADIANCE)]
#[case::area(ARG_AREA, ENV_AREA)]
#[case::grid(ARG_GRID_DISTANCE, ENV_GRID_DISTANCE)]
#[case::road(ARG_ROAD_DISTANCE, ENV_ROAD_DISTANCE)]
#[case::slope(ARG_SLOPE, ENV_SLOPE)]
fn converting_score_without_metric_errors(
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let mut args = complete_args();
    match field {
        ARG_SOLAR_IRRADIANCE => args.solar_irradiance = None,
        ARG_AREA => args.area = None,
        ARG_GRID_DISTANCE => args.grid_distance = None,
        ARG_ROAD_DISTANCE => args.road_distance = None,
        _ => args.slope = None,
    }

    let err = ScoreConfig::try_from(args).expect_err("missing metric should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn score_config_uses_default_weights_when_unset() {
    let config = ScoreConfig::try_from(complete_args()).expect("config should build");

    assert_eq!(config.weights, Weights::default());
    assert_eq!(
        config.metrics,
        RawMetrics {
            solar_irradiance: 4.25,
            area: 27_500,
            grid_distance: 10.5,
            road_distance: 2.75,
            slope: 10.0,
        }
    );
}

#[rstest]
fn score_config_rejects_negative_weights() {
    let args = ScoreArgs {
        slope_weight: Some(-0.1),
        ..complete_args()
    };

    let err = ScoreConfig::try_from(args).expect_err("negative weight should error");
    match err {
        CliError::InvalidWeights(WeightsError::Negative { parameter, .. }) => {
            assert_eq!(parameter, WeightParameter::Slope);
        }
        other => panic!("expected InvalidWeights, found {other:?}"),
    }
}

#[rstest]
fn overlay_replaces_only_overridden_weights() {
    let weights = overlay_weights(
        Weights::default(),
        [
            (WeightParameter::Solar, Some(0.5)),
            (WeightParameter::Area, None),
            (WeightParameter::GridDistance, None),
            (WeightParameter::Slope, Some(0.0)),
            (WeightParameter::Infrastructure, None),
        ],
    );

    assert_eq!(
        weights,
        Weights::default()
            .with(WeightParameter::Solar, 0.5)
            .with(WeightParameter::Slope, 0.0)
    );
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "area": "large" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "solar_irradiance": 3.0,
            "area": 10_000,
            "grid_distance": 5.0,
            "road_distance": 1.0,
            "slope": 4.0,
            "solar_weight": 0.6,
        }),
        None,
    );
    composer.push_environment(json!({
        "slope": 12.0,
        "solar_weight": 0.4,
    }));
    composer.push_cli(json!({
        "solar_irradiance": 5.0,
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.metrics.solar_irradiance, 5.0);
    assert_eq!(config.metrics.area, 10_000);
    assert_eq!(config.metrics.slope, 12.0);
    assert_eq!(
        config.weights,
        Weights::default().with(WeightParameter::Solar, 0.4)
    );
}
