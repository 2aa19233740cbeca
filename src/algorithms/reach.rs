//! Reach: count, length, and area of the network within radius of an origin
//! line (§4.J).

use crate::axial_graph::AxialGraph;
use crate::bfs;
use crate::config;
use crate::convex_hull::{convex_hull, polygon_area, prepare_points};
use crate::distance::{DistanceType, Radii};
use crate::error::Error;

#[derive(Debug)]
pub struct ReachResult {
    pub reached_count: u32,
    pub reached_length: f32,
    /// `-1.0` when undefined (fewer than 3 reached endpoints and not the
    /// straight-line-only fast path).
    pub reached_area: f32,
}

/// Computes reach from `origin_line`, treating the line's own midpoint as
/// the origin (one worker per origin line, per §4.K). `version` is the
/// calling descriptor's version; a mismatch is rejected before any
/// traversal runs (§6 "version mismatch is a hard error").
pub fn compute(version: u32, graph: &AxialGraph, origin_line: u32, primary: DistanceType, radii: &Radii) -> Result<ReachResult, Error> {
    config::check_version(version)?;
    if radii.straight_line_only() {
        return Ok(compute_straight_line_only(graph, origin_line, radii.straight.unwrap()));
    }

    let line = graph.lines[origin_line as usize];
    let result = bfs::run(graph, origin_line, line.length * 0.5, 0.0, primary, radii, &|| false);

    let mut endpoints = Vec::new();
    for (idx, reached) in result.line_reached.iter().enumerate() {
        if reached.is_some() {
            let l = graph.lines[idx];
            endpoints.push(l.p1);
            endpoints.push(l.p2);
        }
    }
    let points = prepare_points(endpoints);
    let area = if points.len() >= 3 {
        polygon_area(&convex_hull(&points))
    } else {
        -1.0
    };

    Ok(ReachResult {
        reached_count: result.reached_count as u32,
        reached_length: result.reached_length,
        reached_area: area,
    })
}

fn compute_straight_line_only(graph: &AxialGraph, origin_line: u32, radius: f64) -> ReachResult {
    let origin = graph.lines[origin_line as usize].center();
    let r = radius as f32;
    let mut count = 0u32;
    let mut length = 0.0f32;
    for line in &graph.lines {
        if line.center().dist(origin) <= r {
            count += 1;
            length += line.length;
        }
    }
    ReachResult {
        reached_count: count,
        reached_length: length,
        reached_area: std::f32::consts::PI * r * r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Polygon;

    #[test]
    fn single_line_reaches_only_itself() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let result = compute(config::ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap();
        assert_eq!(result.reached_count, 1);
    }

    #[test]
    fn cross_reaches_both_lines_within_one_step() {
        let lines = vec![((-1.0, 0.0), (1.0, 0.0)), ((0.0, -1.0), (0.0, 1.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let mut radii = Radii::unbounded();
        radii.steps = Some(1);
        let result = compute(config::ANALYSIS_SPEC_VERSION, &graph, 0, DistanceType::Steps, &radii).unwrap();
        assert_eq!(result.reached_count, 2);
    }

    #[test]
    fn version_mismatch_is_rejected_before_traversal() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let err = compute(config::ANALYSIS_SPEC_VERSION + 1, &graph, 0, DistanceType::Steps, &Radii::unbounded()).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::VersionMismatch);
    }
}
