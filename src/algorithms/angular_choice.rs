//! Angular choice: back-accumulation of shortest-path flow across the
//! angular traversal DAG built by [`angular_integration::traverse`] (§4.G).

use super::angular_integration::{traverse, Traversal};
use crate::segment_graph::SegmentGraph;

/// Per-origin segment scores after back-accumulating unit (or
/// length-weighted) flow from every reached destination. Testable property
/// 7: the origin's own score is `0` unweighted, `origin.length^2 / 4` in
/// weighted mode (§8).
pub fn compute_for_origin(
    graph: &SegmentGraph,
    origin: u32,
    angle_threshold_deg: f32,
    angle_precision_deg: f32,
    weighted: bool,
) -> Vec<f64> {
    let traversal = traverse(graph, origin, angle_threshold_deg, angle_precision_deg, None);
    back_accumulate(graph, &traversal, origin, weighted)
}

fn back_accumulate(graph: &SegmentGraph, traversal: &Traversal, origin: u32, weighted: bool) -> Vec<f64> {
    let n = graph.segment_count();
    let mut delta = vec![[0.0f64; 2]; n];
    let mut score = vec![0.0f64; n];
    let origin_len = graph.segments[origin as usize].length as f64;

    for &(seg, dir) in traversal.order.iter().rev() {
        if seg != origin {
            score[seg as usize] += delta[seg as usize][dir];
        }
        let this_len = graph.segments[seg as usize].length as f64;
        let mut own_weight = if weighted { origin_len * this_len } else { 1.0 };
        if weighted && (seg == origin || traversal.preds[seg as usize][dir].is_empty()) {
            // Turner 2007: origin and destination segments receive half-weight
            // in length-weighted mode.
            own_weight *= 0.5;
        }
        let contribution = own_weight + delta[seg as usize][dir];
        for &(pseg, pdir) in &traversal.preds[seg as usize][dir] {
            let sigma_p = traversal.sigma[pseg as usize][pdir];
            let sigma_w = traversal.sigma[seg as usize][dir];
            if sigma_w <= 0.0 {
                continue;
            }
            delta[pseg as usize][pdir] += (sigma_p / sigma_w) * contribution;
        }
    }

    score[origin as usize] = if weighted { origin_len * origin_len * 0.25 } else { 0.0 };
    score
}

pub use crate::algorithms::segment_betweenness::syntax_normalize;
