mod utility;

use spacesyntax::point::Polygon;
use spacesyntax::AxialGraph;

#[test]
fn crossing_lines_produce_one_crossing_and_four_line_crossings() {
    let graph = utility::build_graph(&[((-1.0, 0.0), (1.0, 0.0)), ((0.0, -1.0), (0.0, 1.0))]);
    assert_eq!(graph.crossings.len(), 1);
    assert_eq!(graph.line_crossings.len(), 4);
    graph.check_invariants().unwrap();
}

#[test]
fn unlink_removes_the_crossing_it_names() {
    let lines = vec![((-1.0, 0.0), (1.0, 0.0)), ((0.0, -1.0), (0.0, 1.0))];
    let graph = AxialGraph::build(&lines, &[(0.0, 0.0)], &[], &[] as &[Polygon], 1.0);
    assert_eq!(graph.crossings.len(), 0);
}

#[test]
fn point_attaches_to_the_nearest_line() {
    let lines = vec![((0.0, 0.0), (10.0, 0.0)), ((0.0, 5.0), (10.0, 5.0))];
    let graph = AxialGraph::build(&lines, &[], &[(3.0, 0.1)], &[] as &[Polygon], 1.0);
    assert_eq!(graph.points.len(), 1);
    assert_eq!(graph.points[0].i_line, Some(0));
}
