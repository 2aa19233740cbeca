mod utility;

use spacesyntax::algorithms::attraction_distance;
use spacesyntax::config::ANALYSIS_SPEC_VERSION;
use spacesyntax::coords::Point2;
use spacesyntax::{DistanceType, Radii};

/// Scenario S6: three candidate points, one attractor, straight-line radius
/// 6 — the nearest point is unreached (distance 7 > radius) and the other
/// two resolve to the single attractor at distances 2 and 3.
#[test]
fn s6_three_points_one_attractor_straight_line() {
    let graph = utility::build_graph(&[]);
    let destinations = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), Point2::new(10.0, 0.0)];
    let attractors = vec![Point2::new(7.0, 0.0)];
    let mut radii = Radii::unbounded();
    radii.straight = Some(6.0);

    let result = attraction_distance::compute(ANALYSIS_SPEC_VERSION, &graph, &destinations, &attractors, DistanceType::Straight, &radii).unwrap();
    assert_eq!(result.min_distance, vec![-1.0, 2.0, 3.0]);
    assert_eq!(result.origin_index, vec![None, Some(0), Some(0)]);
}
