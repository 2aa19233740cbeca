mod utility;

use spacesyntax::algorithms::segment_betweenness;
use spacesyntax::config::ANALYSIS_SPEC_VERSION;
use spacesyntax::DistanceType;

#[test]
fn crossing_line_carries_all_through_traffic() {
    // Two through-lines plus a spur: every shortest path between the spur
    // and either through-line's far end passes through line 0.
    let graph = utility::build_graph(&[
        ((-2.0, 0.0), (2.0, 0.0)),
        ((0.0, 0.0), (0.0, 2.0)),
    ]);
    let result = segment_betweenness::compute(ANALYSIS_SPEC_VERSION, &graph, DistanceType::Steps, None, false).unwrap();
    assert_eq!(result.score.len(), 2);
    assert_eq!(result.score[1], 0.0, "the spur is never an intermediate stop");
}

#[test]
fn disconnected_components_contribute_zero_betweenness() {
    let graph = utility::build_graph(&[((0.0, 0.0), (1.0, 0.0)), ((10.0, 10.0), (11.0, 10.0))]);
    let result = segment_betweenness::compute(ANALYSIS_SPEC_VERSION, &graph, DistanceType::Steps, None, false).unwrap();
    assert!(result.score.iter().all(|&s| s == 0.0));
}
