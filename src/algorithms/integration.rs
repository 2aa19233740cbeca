//! Integration: closeness-like centrality derived from `(N, TD)` (§4.G, §6).

use crate::axial_graph::AxialGraph;
use crate::bfs;
use crate::config;
use crate::distance::{DistanceType, Radii};
use crate::error::Error;

#[derive(Debug)]
pub struct IntegrationResult {
    /// Reached node count, including the origin (§GLOSSARY "N").
    pub n: u32,
    /// Sum of primary-metric distances to every reached node (§GLOSSARY "TD").
    pub total_depth: f32,
    /// `-1.0` when `N < 2` (§6).
    pub score: f32,
}

/// Computes integration from `origin_line`'s midpoint (§4.K: one worker per
/// origin line). `version` is the calling descriptor's version, rejected
/// up front on mismatch (§6).
pub fn compute(version: u32, graph: &AxialGraph, origin_line: u32, primary: DistanceType, radii: &Radii) -> Result<IntegrationResult, Error> {
    config::check_version(version)?;
    let line = graph.lines[origin_line as usize];
    let result = bfs::run(graph, origin_line, line.length * 0.5, 0.0, primary, radii, &|| false);

    let n = result.reached_count as u32;
    let total_depth: f32 = result.line_reached.iter().filter_map(|d| *d).sum();
    let score = integration_score(n, total_depth);

    Ok(IntegrationResult { n, total_depth, score })
}

/// `score = 1 / ((2 MD - 1) / (N - 2) / D)` with `MD = TD / (N - 1)` and the
/// Turner/Hillier real-relative-asymmetry normalisation `D` (§6). Returns
/// `-1` for `N < 2`, matching scenario S1's degenerate `N - 2 == 0` case.
pub fn integration_score(n: u32, total_depth: f32) -> f32 {
    if n < 2 {
        return -1.0;
    }
    let n_f = n as f64;
    let md = total_depth as f64 / (n_f - 1.0);
    if n == 2 {
        return -1.0;
    }
    let d = 2.0 * ((((n_f + 2.0) / 3.0).log2() - 1.0) * n_f + 1.0) / ((n_f - 1.0) * (n_f - 2.0));
    let rra = (2.0 * md - 1.0) / (n_f - 2.0) / d;
    if rra.abs() < f64::EPSILON {
        return -1.0;
    }
    (1.0 / rra) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Polygon;

    #[test]
    fn single_line_has_undefined_score() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let result = compute(config::ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap();
        assert_eq!(result.n, 1);
        assert_eq!(result.score, -1.0);
    }

    #[test]
    fn cross_has_two_reached_nodes_and_degenerate_score() {
        let lines = vec![((-1.0, 0.0), (1.0, 0.0)), ((0.0, -1.0), (0.0, 1.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let result = compute(config::ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap();
        assert_eq!(result.n, 2);
        assert_eq!(result.score, -1.0, "N - 2 == 0 is degenerate per S1");
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let err = compute(config::ANALYSIS_SPEC_VERSION + 1, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::VersionMismatch);
    }
}
