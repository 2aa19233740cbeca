//! Angular choice / integration traversal core, on the segment graph (§4.G).
//!
//! Nodes are `(segment, direction)` pairs — one per direction of travel
//! through a segment — ordered by a discrete-bucket priority queue keyed on
//! integer-degree accumulated angle, since every reachable angle is a small
//! non-negative integer after discretisation.

use crate::coords::angle_diff_deg;
use crate::segment_graph::SegmentGraph;
use crate::util::bucket_queue::BucketQueue;

/// `(segment, direction)`; direction is the endpoint (`0` or `1`) the
/// traversal is currently heading out through.
pub type DirNode = (u32, usize);

pub struct Traversal {
    pub order: Vec<DirNode>,
    pub acc_angle: Vec<[f32; 2]>,
    pub sigma: Vec<[f64; 2]>,
    pub preds: Vec<[Vec<DirNode>; 2]>,
    pub reached_segments: Vec<bool>,
}

fn bucket_of(angle: f32, precision: f32) -> u32 {
    (angle / precision).round().max(0.0) as u32
}

fn neighbor_ends(graph: &SegmentGraph, intersection: u32, exclude: u32) -> Vec<(u32, usize)> {
    graph.intersections[intersection as usize]
        .segments
        .iter()
        .filter(|&&s| s != exclude)
        .map(|&s| {
            let end = if graph.segments[s as usize].intersections[0] == Some(intersection) {
                0
            } else {
                1
            };
            (s, end)
        })
        .collect()
}

/// Runs the forward traversal from `origin` in both directions. Angular
/// deltas below `angle_threshold_deg` round to zero (§4.G).
pub fn traverse(
    graph: &SegmentGraph,
    origin: u32,
    angle_threshold_deg: f32,
    angle_precision_deg: f32,
    max_angle: Option<f32>,
) -> Traversal {
    let n = graph.segment_count();
    let mut acc_angle = vec![[f32::MAX; 2]; n];
    let mut sigma = vec![[0.0f64; 2]; n];
    let mut preds: Vec<[Vec<DirNode>; 2]> = (0..n).map(|_| [Vec::new(), Vec::new()]).collect();
    let mut finalized = vec![[false; 2]; n];
    let mut order = Vec::new();

    let precision = angle_precision_deg.max(1e-3);
    let mut queue: BucketQueue<(DirNode, DirNode, f32)> = BucketQueue::new();

    for dir in 0..2 {
        acc_angle[origin as usize][dir] = 0.0;
        sigma[origin as usize][dir] = 1.0;
        finalized[origin as usize][dir] = true;
        order.push((origin, dir));
        push_neighbors(graph, (origin, dir), 0.0, angle_threshold_deg, &mut queue, precision);
    }

    while let Some((bucket, (node, pred, angle))) = queue.pop() {
        let (seg, dir) = node;
        if let Some(cap) = max_angle {
            if angle > cap {
                continue;
            }
        }
        if !finalized[seg as usize][dir] {
            finalized[seg as usize][dir] = true;
            acc_angle[seg as usize][dir] = angle;
            sigma[seg as usize][dir] = sigma[pred.0 as usize][pred.1];
            preds[seg as usize][dir].push(pred);
            order.push(node);
            push_neighbors(graph, node, angle, angle_threshold_deg, &mut queue, precision);
        } else if bucket_of(acc_angle[seg as usize][dir], precision) == bucket {
            sigma[seg as usize][dir] += sigma[pred.0 as usize][pred.1];
            preds[seg as usize][dir].push(pred);
        }
        // else: bucket ordering guarantees `angle >= acc_angle[seg][dir]`;
        // a strictly worse arrival is simply dropped.
    }

    let mut reached_segments = vec![false; n];
    for &(seg, _) in &order {
        reached_segments[seg as usize] = true;
    }

    Traversal {
        order,
        acc_angle,
        sigma,
        preds,
        reached_segments,
    }
}

fn push_neighbors(
    graph: &SegmentGraph,
    node: DirNode,
    angle: f32,
    angle_threshold_deg: f32,
    queue: &mut BucketQueue<(DirNode, DirNode, f32)>,
    precision: f32,
) {
    let (seg, dir) = node;
    let intersection = match graph.segments[seg as usize].intersections[dir] {
        Some(i) => i,
        None => return,
    };
    let this_angle = graph.segments[seg as usize].orientation_deg;
    for (other, other_end) in neighbor_ends(graph, intersection, seg) {
        let mut delta = angle_diff_deg(this_angle, graph.segments[other as usize].orientation_deg).abs();
        if delta < angle_threshold_deg {
            delta = 0.0;
        }
        let new_angle = angle + delta;
        let new_dir = 1 - other_end;
        queue.push(bucket_of(new_angle, precision), ((other, new_dir), node, new_angle));
    }
}

/// Per-segment `(N, TD, total_weight, total_depth_weight)` for integration
/// mode (no back-trace is run, §4.G).
pub struct IntegrationStats {
    pub n: u32,
    pub total_depth: f64,
    pub total_weight: f64,
    pub total_depth_weight: f64,
}

pub fn integration_stats(graph: &SegmentGraph, traversal: &Traversal) -> IntegrationStats {
    let n = traversal.reached_segments.iter().filter(|&&r| r).count() as u32;
    let mut total_depth = 0.0;
    let mut total_depth_weight = 0.0;
    for (seg, &reached) in traversal.reached_segments.iter().enumerate() {
        if !reached {
            continue;
        }
        let angle = traversal.acc_angle[seg][0].min(traversal.acc_angle[seg][1]) as f64;
        total_depth += angle;
        total_depth_weight += angle * graph.segments[seg].length as f64;
    }
    let total_weight: f64 = traversal
        .reached_segments
        .iter()
        .zip(&graph.segments)
        .map(|(&r, s)| if r { s.length as f64 } else { 0.0 })
        .sum();
    IntegrationStats {
        n,
        total_depth,
        total_weight,
        total_depth_weight,
    }
}

/// Turner (2007) normalised angular integration.
pub fn turner_integration(stats: &IntegrationStats) -> f64 {
    if stats.n < 2 {
        return -1.0;
    }
    stats.n as f64 / (stats.total_depth + 1.0)
}

/// "NAIN" normalisation: `N^1.2 / (TD * (2/180) + 1)` (§8 scenario S4).
pub fn nain(stats: &IntegrationStats) -> f64 {
    (stats.n as f64).powf(1.2) / (stats.total_depth * (2.0 / 180.0) + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_line_chain_accumulates_one_ninety_degree_turn() {
        let lines = vec![
            (crate::coords::Point2::new(0.0, 0.0), crate::coords::Point2::new(1.0, 0.0)),
            (crate::coords::Point2::new(1.0, 0.0), crate::coords::Point2::new(2.0, 0.0)),
            (crate::coords::Point2::new(2.0, 0.0), crate::coords::Point2::new(2.0, 1.0)),
        ];
        let graph = SegmentGraph::build(&lines);
        let traversal = traverse(&graph, 0, 0.0, 1.0, None);
        let stats = integration_stats(&graph, &traversal);
        assert_eq!(stats.n, 3);
        assert!((stats.total_depth - 90.0).abs() < 1.0);
    }
}
