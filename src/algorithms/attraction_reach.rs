//! Attraction-reach: accumulated weighted attraction score reaching each
//! network point, finalised per point-group by a collection function
//! (§4.J).
//!
//! Traversal direction mirrors §4.D/§4.J: each attraction point acts as a
//! bounded-BFS origin, and its weighted contribution is scattered onto
//! every point it reaches. Output indexing (one score per point, collected
//! per group) follows §3 "Result arrays ... indexing is parallel to the
//! network element sequence" applied to the points/groups element kind.

use crate::axial_graph::AxialGraph;
use crate::algorithms::weights::{CollectionFunction, PolygonDistribution, WeightFunction};
use crate::bfs;
use crate::config;
use crate::coords::{LocalFrame, Point2};
use crate::distance::{DistanceType, Radii};
use crate::error::Error;
use crate::point::Polygon;
use std::collections::HashMap;

/// One traversal source: a located attraction point, its value, and (for
/// polygon-sampled points) which polygon it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct Attractor {
    pub coords: Point2,
    pub value: f64,
    pub polygon: Option<u32>,
}

/// Expands plain attraction points plus polygon attractors into a flat
/// `Attractor` list, splitting or copying each polygon's value across its
/// edge-sampled points per `distribution` (§4.J).
pub fn build_attractors(
    frame: &LocalFrame,
    points_world: &[(f64, f64)],
    point_values: &[f64],
    polygons: &[Polygon],
    distribution: PolygonDistribution,
    sample_interval: f64,
) -> Vec<Attractor> {
    let mut out: Vec<Attractor> = points_world
        .iter()
        .zip(point_values.iter())
        .map(|(&p, &value)| Attractor {
            coords: frame.world_to_local(p),
            value,
            polygon: None,
        })
        .collect();

    for (poly_idx, polygon) in polygons.iter().enumerate() {
        let sampled = polygon.sample_edge_points(sample_interval);
        let n = sampled.len().max(1);
        let per_point_value = match distribution {
            PolygonDistribution::Divide => polygon.value / n as f64,
            PolygonDistribution::Copy => polygon.value,
        };
        for p in sampled {
            out.push(Attractor {
                coords: frame.world_to_local(p),
                value: per_point_value,
                polygon: Some(poly_idx as u32),
            });
        }
    }
    out
}

#[derive(Debug)]
pub struct AttractionReachResult {
    pub point_score: Vec<f64>,
    pub point_reached: Vec<bool>,
}

/// Runs one bounded-BFS traversal per attractor and scatters
/// `attractor.value * weight_fn(distance / max_distance)` onto every
/// reached point (§4.J). `Copy`-distribution polygon siblings compete by
/// max per target before being summed into the final score; `Divide`
/// siblings (and standalone points) sum directly.
pub fn compute(
    version: u32,
    graph: &AxialGraph,
    attractors: &[Attractor],
    distribution: PolygonDistribution,
    weight_fn: WeightFunction,
    max_distance: f64,
    primary: DistanceType,
    radii: &Radii,
) -> Result<AttractionReachResult, Error> {
    config::check_version(version)?;
    let n_points = graph.points.len();
    let mut direct_sum = vec![0.0f64; n_points];
    let mut reached = vec![false; n_points];
    let mut copy_max: HashMap<(u32, u32), f64> = HashMap::new();
    let denom = max_distance.max(f64::EPSILON);

    for attractor in attractors {
        let Some((line_idx, dist_from_line, pos)) = graph.closest_line(attractor.coords) else {
            continue;
        };
        let result = bfs::run(graph, line_idx, pos, dist_from_line, primary, radii, &|| false);
        for (pt_idx, d) in result.point_reached.iter().enumerate() {
            let Some(dist) = d else { continue };
            let x = (*dist as f64 / denom).clamp(0.0, 1.0);
            let contribution = attractor.value * weight_fn.apply(x);
            reached[pt_idx] = true;
            match (distribution, attractor.polygon) {
                (PolygonDistribution::Copy, Some(poly)) => {
                    let key = (pt_idx as u32, poly);
                    let slot = copy_max.entry(key).or_insert(f64::MIN);
                    if contribution > *slot {
                        *slot = contribution;
                    }
                }
                _ => direct_sum[pt_idx] += contribution,
            }
        }
    }

    for ((pt_idx, _poly), v) in copy_max {
        direct_sum[pt_idx as usize] += v;
    }

    Ok(AttractionReachResult {
        point_score: direct_sum,
        point_reached: reached,
    })
}

/// Finalises each point-group's score from its member points' raw scores
/// via `collection` (§4.J "Point-group collection functions {Avg, Sum, Min,
/// Max}"). `-1.0` when no member point reached any attraction (§6).
pub fn finalize_groups(graph: &AxialGraph, result: &AttractionReachResult, collection: CollectionFunction) -> Vec<f64> {
    graph
        .points_per_group
        .iter()
        .map(|members| {
            let values: Vec<f64> = members
                .iter()
                .filter(|&&idx| result.point_reached[idx as usize])
                .map(|&idx| result.point_score[idx as usize])
                .collect();
            collection.finalize(&values).unwrap_or(-1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn single_attractor_constant_weight_scores_every_reached_point() {
        let lines = vec![((0.0, 0.0), (10.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[(5.0, 0.0)], &[] as &[Polygon], 1.0);
        let attractors = vec![Attractor {
            coords: graph.points[0].coords,
            value: 2.0,
            polygon: None,
        }];
        let result = compute(
            config::ANALYSIS_SPEC_VERSION,
            &graph,
            &attractors,
            PolygonDistribution::Divide,
            WeightFunction::Constant,
            10.0,
            DistanceType::Walking,
            &Radii::unbounded(),
        )
        .unwrap();
        assert!(result.point_reached[0]);
        assert_approx_eq!(result.point_score[0], 2.0);
    }

    #[test]
    fn unreached_group_scores_negative_one() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0)), ((100.0, 100.0), (101.0, 100.0))];
        let polygon = Polygon::new(vec![(100.0, 100.0), (101.0, 100.0), (101.0, 101.0), (100.0, 101.0)]);
        let graph = AxialGraph::build(&lines, &[], &[], std::slice::from_ref(&polygon), 0.5);
        let attractors = vec![Attractor {
            coords: Point2::new(0.5, 0.0),
            value: 1.0,
            polygon: None,
        }];
        let mut radii = Radii::unbounded();
        radii.walking = Some(0.1);
        let result = compute(
            config::ANALYSIS_SPEC_VERSION,
            &graph,
            &attractors,
            PolygonDistribution::Divide,
            WeightFunction::Constant,
            1.0,
            DistanceType::Walking,
            &radii,
        )
        .unwrap();
        let groups = finalize_groups(&graph, &result, CollectionFunction::Sum);
        assert_eq!(groups[0], -1.0);
    }

    #[test]
    fn copy_distribution_takes_max_across_polygon_points() {
        let lines = vec![((0.0, 0.0), (10.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[(4.0, 0.0), (6.0, 0.0)], &[] as &[Polygon], 1.0);
        let attractors = vec![
            Attractor {
                coords: graph.points[0].coords,
                value: 10.0,
                polygon: Some(0),
            },
            Attractor {
                coords: graph.points[1].coords,
                value: 10.0,
                polygon: Some(0),
            },
        ];
        let result = compute(
            config::ANALYSIS_SPEC_VERSION,
            &graph,
            &attractors,
            PolygonDistribution::Copy,
            WeightFunction::Pow(1.0),
            10.0,
            DistanceType::Walking,
            &Radii::unbounded(),
        )
        .unwrap();
        // Point 0 is reached at distance 0 from attractor 0 (weight 1, score
        // 10) and at distance 2 from attractor 1 (weight 0.8, score 8); Copy
        // mode takes the max of the two, not the sum.
        assert_approx_eq!(result.point_score[0], 10.0);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let lines = vec![((0.0, 0.0), (10.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[(5.0, 0.0)], &[] as &[Polygon], 1.0);
        let attractors = vec![Attractor {
            coords: graph.points[0].coords,
            value: 2.0,
            polygon: None,
        }];
        let err = compute(
            config::ANALYSIS_SPEC_VERSION + 1,
            &graph,
            &attractors,
            PolygonDistribution::Divide,
            WeightFunction::Constant,
            10.0,
            DistanceType::Walking,
            &Radii::unbounded(),
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::VersionMismatch);
    }
}
