//! Attraction-distance: minimum distance from each output element to its
//! nearest attraction point (§4.J), via the directed multi-distance graph
//! (§4.D) walked once per attraction point acting as a digraph origin.
//! Falls back to a brute-force point sweep when the only active metric is
//! straight-line (§4.J "Spacial-case").

use crate::axial_graph::AxialGraph;
use crate::config;
use crate::coords::Point2;
use crate::digraph::{DestinationAttachment, DiGraph};
use crate::dispatch;
use crate::distance::{DistanceType, Radii};
use crate::error::Error;
use crate::progress::ThrottledProgress;
use crate::shortest_path::{self, Mode};

#[derive(Debug)]
pub struct AttractionDistanceResult {
    /// `-1.0` where no attraction point was within radius (§6).
    pub min_distance: Vec<f32>,
    /// Index into `attractors` of the nearest one, ties broken to the
    /// lower index (§4.J, §5, §9 "do not change without updating tests").
    pub origin_index: Vec<Option<u32>>,
}

/// `destinations` are the elements the output is indexed over; `attractors`
/// become the digraph's origin nodes (§4.D "one origin node is appended per
/// supplied origin point" — here the attraction points play that role).
pub fn compute(
    version: u32,
    graph: &AxialGraph,
    destinations: &[Point2],
    attractors: &[Point2],
    primary: DistanceType,
    radii: &Radii,
) -> Result<AttractionDistanceResult, Error> {
    config::check_version(version)?;
    let n_dest = destinations.len();
    if n_dest == 0 || attractors.is_empty() {
        return Ok(AttractionDistanceResult {
            min_distance: vec![-1.0; n_dest],
            origin_index: vec![None; n_dest],
        });
    }

    if radii.straight_line_only() {
        return Ok(compute_straight_line_only(destinations, attractors, radii.straight.unwrap()));
    }

    let attachments: Vec<Option<DestinationAttachment>> = destinations
        .iter()
        .map(|&p| {
            graph.closest_line(p).map(|(line, dist_from_line, line_pos)| DestinationAttachment::OnLine {
                line,
                line_pos,
                dist_from_line,
            })
        })
        .collect();

    let mut digraph = DiGraph::build(graph, primary, radii);
    digraph.wire_destinations(graph, &attachments);

    let origin_nodes: Vec<u32> = attractors
        .iter()
        .map(|&p| digraph.add_origin(graph, p, graph.closest_line(p), &[], radii))
        .collect();

    let progress = ThrottledProgress::new(None);
    let per_origin = dispatch::run_per_origin(attractors.len(), &progress, |origin_idx| {
        let origin_node = origin_nodes[origin_idx as usize];
        let mut local_min = vec![f32::MAX; n_dest];
        let mut local_hit = vec![false; n_dest];
        shortest_path::run(&digraph, radii, Mode::Search, origin_node, n_dest, |d_idx, dist| {
            local_min[d_idx as usize] = dist;
            local_hit[d_idx as usize] = true;
        });
        (local_min, local_hit)
    });

    let mut min_distance = vec![f32::MAX; n_dest];
    let mut origin_index: Vec<Option<u32>> = vec![None; n_dest];
    for (origin_idx, local) in per_origin.into_iter().enumerate() {
        let Some((local_min, local_hit)) = local else { continue };
        for d in 0..n_dest {
            if !local_hit[d] {
                continue;
            }
            let better = local_min[d] < min_distance[d]
                || (local_min[d] == min_distance[d] && origin_index[d].map_or(true, |oi| (origin_idx as u32) < oi));
            if better {
                min_distance[d] = local_min[d];
                origin_index[d] = Some(origin_idx as u32);
            }
        }
    }

    for d in min_distance.iter_mut() {
        if *d == f32::MAX {
            *d = -1.0;
        }
    }

    Ok(AttractionDistanceResult { min_distance, origin_index })
}

fn compute_straight_line_only(destinations: &[Point2], attractors: &[Point2], radius: f64) -> AttractionDistanceResult {
    let r = radius as f32;
    let mut min_distance = vec![-1.0f32; destinations.len()];
    let mut origin_index: Vec<Option<u32>> = vec![None; destinations.len()];
    for (d_idx, &dest) in destinations.iter().enumerate() {
        let mut best: Option<(f32, u32)> = None;
        for (o_idx, &origin) in attractors.iter().enumerate() {
            let d = dest.dist(origin);
            if d > r {
                continue;
            }
            let better = best.map_or(true, |(bd, bi)| d < bd || (d == bd && (o_idx as u32) < bi));
            if better {
                best = Some((d, o_idx as u32));
            }
        }
        if let Some((d, oi)) = best {
            min_distance[d_idx] = d;
            origin_index[d_idx] = Some(oi);
        }
    }
    AttractionDistanceResult { min_distance, origin_index }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// §8 scenario S6.
    #[test]
    fn s6_three_origin_points_one_attractor_straight_line() {
        let lines: Vec<((f64, f64), (f64, f64))> = vec![];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[crate::point::Polygon], 1.0);
        let destinations = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0), Point2::new(10.0, 0.0)];
        let attractors = vec![Point2::new(7.0, 0.0)];
        let mut radii = Radii::unbounded();
        radii.straight = Some(6.0);

        let result = compute(config::ANALYSIS_SPEC_VERSION, &graph, &destinations, &attractors, DistanceType::Straight, &radii).unwrap();
        assert_eq!(result.min_distance, vec![-1.0, 2.0, 3.0]);
        assert_eq!(result.origin_index, vec![None, Some(0), Some(0)]);
    }

    #[test]
    fn empty_attractors_yields_all_unreached() {
        let lines: Vec<((f64, f64), (f64, f64))> = vec![];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[crate::point::Polygon], 1.0);
        let destinations = vec![Point2::new(0.0, 0.0)];
        let result = compute(config::ANALYSIS_SPEC_VERSION, &graph, &destinations, &[], DistanceType::Straight, &Radii::unbounded()).unwrap();
        assert_eq!(result.min_distance, vec![-1.0]);
        assert_eq!(result.origin_index, vec![None]);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let lines: Vec<((f64, f64), (f64, f64))> = vec![];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[crate::point::Polygon], 1.0);
        let err = compute(
            config::ANALYSIS_SPEC_VERSION + 1,
            &graph,
            &[Point2::new(0.0, 0.0)],
            &[Point2::new(1.0, 0.0)],
            DistanceType::Straight,
            &Radii::unbounded(),
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::VersionMismatch);
    }
}
