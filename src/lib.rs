//! Computational core of a spatial-network analysis library for urban
//! morphology and space-syntax research.
//!
//! Given a planar street/axial network — a set of line segments, optional
//! unlinks, and optional destination points or polygons — this crate builds
//! an indexed graph (axial and/or segment granularity) and runs bounded
//! traversal kernels over it: reach, integration, angular/segment
//! betweenness, origin-destination betweenness, attraction-reach, and
//! attraction-distance. Analyses are parallelised per origin across worker
//! threads (see [`dispatch`]).
//!
//! Out of scope: C ABI wrappers, raster I/O, isovist calculation, map
//! cleaning, and CLI/language bindings — those are external collaborators
//! that call into this core.

pub mod error;
pub use error::{Error, ErrorKind};

pub mod coords;
pub mod line;
pub mod crossing;
pub mod point;

pub mod axial_graph;
pub use axial_graph::AxialGraph;

pub mod segment_graph;
pub use segment_graph::SegmentGraph;

pub mod distance;
pub use distance::{DistanceType, Radii};

pub mod digraph;
pub mod bfs;
pub mod shortest_path;

pub mod convex_hull;

pub mod spatial;
pub mod util;

pub mod algorithms;

pub mod dispatch;
pub mod progress;
pub mod config;
pub mod logging;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Polygon;

    /// §8 scenario S1.
    #[test]
    fn s1_cross_has_one_crossing_and_four_line_crossings() {
        let lines = vec![((-1.0, 0.0), (1.0, 0.0)), ((0.0, -1.0), (0.0, 1.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        assert_eq!(graph.crossings.len(), 1);
        assert_eq!(graph.line_crossings.len(), 4);
        graph.check_invariants().unwrap();
    }

    /// §8 scenario S2.
    #[test]
    fn s2_cross_with_unlink_has_no_crossings() {
        let lines = vec![((-1.0, 0.0), (1.0, 0.0)), ((0.0, -1.0), (0.0, 1.0))];
        let unlinks = vec![(0.0, 0.0)];
        let graph = AxialGraph::build(&lines, &unlinks, &[], &[] as &[Polygon], 1.0);
        assert_eq!(graph.crossings.len(), 0);
        let result = algorithms::reach::compute(config::ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap();
        assert_eq!(result.reached_count, 1);
    }

    /// §8 scenario S3: a T-junction is not an unlinkable "true" crossing.
    #[test]
    fn s3_t_junction_has_one_crossing_at_shared_endpoints() {
        let lines = vec![((0.0, 0.0), (2.0, 0.0)), ((1.0, 0.0), (1.0, 1.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        assert_eq!(graph.crossings.len(), 1);
        let a_crossings = graph.line_crossings_of(0);
        assert!(a_crossings.iter().any(|lc| (lc.line_pos - 2.0).abs() < 1e-3));
        let b_crossings = graph.line_crossings_of(1);
        assert!(b_crossings.iter().any(|lc| lc.line_pos.abs() < 1e-3));
    }

    /// Boundary behaviour §8 item 11: empty input succeeds with zero-filled
    /// outputs.
    #[test]
    fn empty_graph_builds_and_every_kernel_is_a_no_op() {
        let lines: Vec<((f64, f64), (f64, f64))> = vec![];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        assert_eq!(graph.line_count(), 0);
        let betweenness = algorithms::segment_betweenness::compute(config::ANALYSIS_SPEC_VERSION, &graph, DistanceType::Steps, None, false).unwrap();
        assert!(betweenness.score.is_empty());
    }

    /// Boundary behaviour §8 item 12: a single line has undefined
    /// integration.
    #[test]
    fn single_line_has_reach_one_and_undefined_integration() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let reach = algorithms::reach::compute(config::ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap();
        assert_eq!(reach.reached_count, 1);
        let integration = algorithms::integration::compute(config::ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap();
        assert_eq!(integration.n, 1);
        assert_eq!(integration.score, -1.0);
    }

    /// Boundary behaviour §8 item 13: two disconnected lines are each their
    /// own component with zero betweenness.
    #[test]
    fn two_disconnected_lines_have_zero_betweenness() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0)), ((10.0, 10.0), (11.0, 10.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let result = algorithms::segment_betweenness::compute(config::ANALYSIS_SPEC_VERSION, &graph, DistanceType::Steps, None, false).unwrap();
        assert!(result.score.iter().all(|&s| s == 0.0));
    }
}
