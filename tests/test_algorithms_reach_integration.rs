mod utility;

use spacesyntax::algorithms::{integration, reach};
use spacesyntax::config::ANALYSIS_SPEC_VERSION;
use spacesyntax::{DistanceType, Radii};

#[test]
fn three_way_star_reaches_every_arm_within_one_turn() {
    let graph = utility::build_graph(&[
        ((0.0, 0.0), (1.0, 0.0)),
        ((0.0, 0.0), (-1.0, 0.0)),
        ((0.0, 0.0), (0.0, 1.0)),
    ]);
    let mut radii = Radii::unbounded();
    radii.steps = Some(1);
    let result = reach::compute(ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &radii).unwrap();
    assert_eq!(result.reached_count, 3);
}

#[test]
fn integration_score_is_undefined_for_an_isolated_line() {
    let graph = utility::build_graph(&[((0.0, 0.0), (1.0, 0.0))]);
    let result = integration::compute(ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap();
    assert_eq!(result.n, 1);
    assert_eq!(result.score, -1.0);
}

#[test]
fn integration_score_is_defined_once_three_lines_meet() {
    let graph = utility::build_graph(&[
        ((0.0, 0.0), (1.0, 0.0)),
        ((0.0, 0.0), (-1.0, 0.0)),
        ((0.0, 0.0), (0.0, 1.0)),
    ]);
    let result = integration::compute(ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap();
    assert_eq!(result.n, 3);
    assert!(result.score > 0.0);
}
