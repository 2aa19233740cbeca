//! Origin-destination betweenness: per-origin shortest-path enumeration
//! with destination categories and back-trace weighting (§4.I).

use crate::axial_graph::AxialGraph;
use crate::config;
use crate::error::Error;
use crate::util::index_priority_queue::IndexPriorityQueue;
use nohash::BuildNoHashHasher;
use std::collections::HashMap;

/// Point index is already a dense, unique small integer, so a SipHash
/// general-purpose hasher just wastes cycles (cf. graphrs'
/// tuple-vs-edge-index benchmark) — `BuildNoHashHasher` feeds it straight
/// through.
type PointIndexMap<V> = HashMap<u32, V, BuildNoHashHasher<u32>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestinationMode {
    AllDestinations,
    ClosestDestinationOnly,
}

/// A destination category groups destinations that share a weight pool;
/// reached destinations in a category split the origin's weight in
/// proportion to their own weight within that category (§4.I, SPEC_FULL.md
/// supplement C).
#[derive(Clone, Copy, Debug)]
pub struct OdCategory {
    pub weight_field: usize,
}

pub struct OdDestination {
    pub point_index: u32,
    pub category: usize,
    pub weight: f64,
}

#[derive(Clone, Copy)]
enum Item {
    LineCrossing(u32),
    /// Carries the line it was discovered on (`discovery_line`) and the
    /// line-crossing it hopped from, if any (`None` when found directly on
    /// the origin's own line, with no intervening hop) — both are recorded
    /// lazily, at pop time, alongside the winning distance.
    Destination { d_idx: u32, discovery_line: u32, pred_lc: Option<u32> },
}

/// Runs one origin's traversal and adds its contribution directly into
/// `line_scores` (caller-owned, summed across origins per §4.K's
/// "summation across worker-local score arrays" reduction). `version` is
/// the calling descriptor's version; `line_scores` must be pre-sized to
/// one element per line (§6 "size-mismatched output arrays ... are
/// errors").
#[allow(clippy::too_many_arguments)]
pub fn accumulate_origin(
    version: u32,
    graph: &AxialGraph,
    origin_line: u32,
    origin_pos: f32,
    dist_from_line: f32,
    origin_weight: f64,
    destinations: &[OdDestination],
    categories: &[OdCategory],
    mode: DestinationMode,
    line_scores: &mut [f64],
) -> Result<(), Error> {
    config::check_version(version)?;
    config::check_output_len(line_scores.len(), graph.line_count())?;
    let n_lc = graph.line_crossings.len();
    let mut dist_lc: Vec<Option<f32>> = vec![None; n_lc];
    let mut pred_lc: Vec<Option<u32>> = vec![None; n_lc];
    let mut dest_dist: Vec<Option<f32>> = vec![None; destinations.len()];
    let mut dest_line: Vec<u32> = vec![0; destinations.len()];
    let mut dest_pred: Vec<Option<u32>> = vec![None; destinations.len()];

    // Points attached to each line, restricted to the destination set, for
    // O(1) lookup while expanding a line-crossing.
    let mut destinations_of_point: PointIndexMap<Vec<u32>> = PointIndexMap::default();
    for (d_idx, d) in destinations.iter().enumerate() {
        destinations_of_point.entry(d.point_index).or_default().push(d_idx as u32);
    }

    let mut queue: IndexPriorityQueue<Item> = IndexPriorityQueue::new();
    let origin_base = graph.lines[origin_line as usize].i_first_crossing;
    for (offset, lc) in graph.line_crossings_of(origin_line).iter().enumerate() {
        let d = (lc.line_pos - origin_pos).abs() + dist_from_line;
        queue.push(d, Item::LineCrossing(origin_base + offset as u32));
    }
    try_enqueue_destinations(graph, origin_line, origin_pos, dist_from_line, &destinations_of_point, destinations, None, &mut queue);

    while let Some((d, item)) = queue.pop() {
        match item {
            Item::LineCrossing(idx) => {
                if dist_lc[idx as usize].is_some() {
                    continue;
                }
                dist_lc[idx as usize] = Some(d);
                let line_idx = graph.line_crossings[idx as usize].i_line;
                let this_pos = graph.line_crossings[idx as usize].line_pos;
                let line = graph.lines[line_idx as usize];
                try_enqueue_destinations(
                    graph,
                    line_idx,
                    this_pos,
                    d,
                    &destinations_of_point,
                    destinations,
                    Some(idx),
                    &mut queue,
                );
                for other_lc in graph.line_crossings_of(line_idx) {
                    let delta = (other_lc.line_pos - this_pos).abs();
                    let next = other_lc.i_opposite;
                    if dist_lc[next as usize].is_some() {
                        continue;
                    }
                    let nd = d + delta;
                    queue.push(nd, Item::LineCrossing(next));
                    pred_lc[next as usize] = Some(idx);
                }
                let _ = line; // kept for readability / future weight hooks
            }
            Item::Destination { d_idx, discovery_line, pred_lc: pred } => {
                // Lazy-deletion: only the first (shortest) pop of a given
                // destination wins, regardless of when it was enqueued.
                if dest_dist[d_idx as usize].is_some() {
                    continue;
                }
                dest_dist[d_idx as usize] = Some(d);
                dest_line[d_idx as usize] = discovery_line;
                dest_pred[d_idx as usize] = pred;
                if mode == DestinationMode::ClosestDestinationOnly {
                    break;
                }
            }
        }
    }

    // Distribute origin weight across reached destinations, per category,
    // proportional to destination weight within that category.
    let mut category_totals = vec![0.0f64; categories.len()];
    for (d_idx, d) in destinations.iter().enumerate() {
        if dest_dist[d_idx].is_some() {
            category_totals[d.category] += d.weight;
        }
    }

    for (d_idx, d) in destinations.iter().enumerate() {
        let Some(_dist) = dest_dist[d_idx] else { continue };
        let total = category_totals[d.category];
        if total <= 0.0 {
            continue;
        }
        let share = origin_weight * (d.weight / total);
        match dest_pred[d_idx] {
            // Reached via a line-crossing hop: that crossing's line is the
            // destination's discovery line, so the chain starting there
            // already credits it before walking back further.
            Some(lc_idx) => {
                let mut cursor = Some(lc_idx);
                while let Some(idx) = cursor {
                    let line_idx = graph.line_crossings[idx as usize].i_line;
                    line_scores[line_idx as usize] += share;
                    cursor = pred_lc[idx as usize];
                }
            }
            // Reached directly on the origin's own line, no hop recorded —
            // credit the discovery line itself.
            None => {
                line_scores[dest_line[d_idx] as usize] += share;
            }
        }
    }
    Ok(())
}

fn try_enqueue_destinations(
    graph: &AxialGraph,
    line_idx: u32,
    line_pos: f32,
    base_dist: f32,
    destinations_of_point: &PointIndexMap<Vec<u32>>,
    destinations: &[OdDestination],
    pred_lc: Option<u32>,
    queue: &mut IndexPriorityQueue<Item>,
) {
    for &point_idx in graph.points_of(line_idx) {
        let Some(d_indices) = destinations_of_point.get(&point_idx) else { continue };
        let point = &graph.points[point_idx as usize];
        let dist = base_dist + (point.line_pos - line_pos).abs() + point.dist_from_line;
        for &d_idx in d_indices {
            let _ = destinations[d_idx as usize];
            queue.push(dist, Item::Destination { d_idx, discovery_line: line_idx, pred_lc });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{NetworkPoint, Polygon};

    #[test]
    fn single_line_one_destination_credits_the_line() {
        let lines = vec![((0.0, 0.0), (10.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[(10.0, 0.0)], &[] as &[Polygon], 1.0);
        let dest_point_idx = graph
            .points
            .iter()
            .position(|p: &NetworkPoint| (p.line_pos - 10.0).abs() < 1.0)
            .unwrap() as u32;

        let destinations = vec![OdDestination {
            point_index: dest_point_idx,
            category: 0,
            weight: 1.0,
        }];
        let categories = vec![OdCategory { weight_field: 0 }];
        let mut line_scores = vec![0.0f64; graph.line_count()];
        accumulate_origin(
            config::ANALYSIS_SPEC_VERSION,
            &graph,
            0,
            0.0,
            0.0,
            1.0,
            &destinations,
            &categories,
            DestinationMode::AllDestinations,
            &mut line_scores,
        )
        .unwrap();
        assert_eq!(line_scores[0], 1.0);
    }

    #[test]
    fn mismatched_line_scores_length_is_rejected() {
        let lines = vec![((0.0, 0.0), (10.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[(10.0, 0.0)], &[] as &[Polygon], 1.0);
        let mut line_scores = vec![0.0f64; graph.line_count() + 1];
        let err = accumulate_origin(
            config::ANALYSIS_SPEC_VERSION,
            &graph,
            0,
            0.0,
            0.0,
            1.0,
            &[],
            &[],
            DestinationMode::AllDestinations,
            &mut line_scores,
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::SizeMismatch);
    }
}
