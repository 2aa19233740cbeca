//! Brandes-style betweenness on the axial graph (§4.H), walking outward
//! along line-to-line adjacency induced by shared crossings (each
//! [`LineCrossing`]'s `i_opposite` pins one line to the other line sharing
//! that crossing).

use crate::axial_graph::AxialGraph;
use crate::config;
use crate::coords::angle_diff_deg;
use crate::distance::DistanceType;
use crate::error::Error;
use crate::util::index_priority_queue::IndexPriorityQueue;

/// One line-to-line hop: the neighbouring line, its primary-distance
/// contribution, and the turn angle between the two lines' orientations.
struct Hop {
    other_line: u32,
    weight: f32,
}

fn line_neighbors(graph: &AxialGraph, line: u32, primary: DistanceType) -> Vec<Hop> {
    let this_angle = graph.lines[line as usize].angle_deg;
    graph
        .line_crossings_of(line)
        .iter()
        .map(|lc| {
            let opposite = &graph.line_crossings[lc.i_opposite as usize];
            let other_line = opposite.i_line;
            let weight = match primary {
                DistanceType::Angular => angle_diff_deg(this_angle, graph.lines[other_line as usize].angle_deg).abs(),
                DistanceType::Walking | DistanceType::Straight | DistanceType::Weights => {
                    graph.lines[line as usize].length * 0.5 + graph.lines[other_line as usize].length * 0.5
                }
                DistanceType::Axmeter => graph.lines[other_line as usize].length,
                DistanceType::Steps => 1.0,
            };
            Hop { other_line, weight }
        })
        .collect()
}

/// One `(line, direction)` hop, direction-preserving: continuing the walk
/// from `line` heading `dir` lands on `other_line`'s own `dir`-tagged node
/// (mirrors `digraph::push_edge`'s `a_fwd -> next_fwd` / `a_bwd -> next_bwd`
/// wiring). `dir == 0` is a heading of `line.angle_deg`, `dir == 1` its
/// reverse; angular weight is the turn between that heading and the
/// destination line's own orientation, not the source line's.
fn dir_neighbors(graph: &AxialGraph, line: u32, dir: usize, primary: DistanceType) -> Vec<(u32, usize, f32)> {
    let this_line = graph.lines[line as usize];
    let heading = if dir == 0 { this_line.angle_deg } else { this_line.angle_deg + 180.0 };
    graph
        .line_crossings_of(line)
        .iter()
        .map(|lc| {
            let opposite = &graph.line_crossings[lc.i_opposite as usize];
            let other_line_idx = opposite.i_line;
            let other_line = graph.lines[other_line_idx as usize];
            let weight = match primary {
                DistanceType::Angular => angle_diff_deg(heading, other_line.angle_deg).abs(),
                DistanceType::Walking | DistanceType::Straight | DistanceType::Weights => this_line.length * 0.5 + other_line.length * 0.5,
                DistanceType::Axmeter => other_line.length,
                DistanceType::Steps => 1.0,
            };
            (other_line_idx, dir, weight)
        })
        .collect()
}

#[derive(Debug)]
pub struct BetweennessResult {
    pub score: Vec<f64>,
    /// Reached-count per origin (including origin), for the optional
    /// `node_count` output (§6).
    pub node_count: Vec<u32>,
    pub total_depth: Vec<f64>,
}

const EPS: f32 = 1e-6;

/// Runs Brandes betweenness from every line as origin. `version` is the
/// calling descriptor's version, checked once for the whole run rather
/// than per origin (§6 "version mismatch is a hard error"). `weights` is
/// an optional per-line attraction weight (§4.H); `bidirectional` makes
/// the traversal itself bi-directional — one node per `(line, direction)`,
/// per §4.H — rather than halving a plain per-line Brandes run after the
/// fact, since the two can reach different lines by different shortest
/// paths (ground truth: `SegmentBetweenness.cpp`'s
/// `bReverse`/`bNextReverse` direction-aware traversal).
pub fn compute(version: u32, graph: &AxialGraph, primary: DistanceType, weights: Option<&[f32]>, bidirectional: bool) -> Result<BetweennessResult, Error> {
    config::check_version(version)?;
    if let Some(ws) = weights {
        config::check_output_len(ws.len(), graph.line_count())?;
    }
    let n = graph.line_count();
    let mut score = vec![0.0f64; n];
    let mut node_count = vec![0u32; n];
    let mut total_depth = vec![0.0f64; n];

    for origin in 0..n as u32 {
        if bidirectional {
            accumulate_bidirectional(graph, origin, primary, weights, &mut score, &mut node_count, &mut total_depth);
            continue;
        }
        let (dist, sigma, preds, order) = single_source(graph, origin, primary);
        node_count[origin as usize] = order.len() as u32;
        total_depth[origin as usize] = order.iter().map(|&v| dist[v as usize] as f64).sum();

        let mut delta = vec![0.0f64; n];
        for &w in order.iter().rev() {
            if w != origin {
                score[w as usize] += delta[w as usize];
            }
            let w_weight = weights.map_or(1.0, |ws| ws[w as usize] as f64);
            for &v in &preds[w as usize] {
                let contrib = (sigma[v as usize] / sigma[w as usize]) * (w_weight + delta[w as usize]);
                delta[v as usize] += contrib;
            }
        }
    }

    if bidirectional {
        if let Some(ws) = weights {
            for i in 0..n {
                score[i] += (ws[i] as f64).powi(2) / 4.0;
            }
        }
    }

    Ok(BetweennessResult {
        score,
        node_count,
        total_depth,
    })
}

/// One origin's contribution to `score`/`node_count`/`total_depth`, computed
/// over the doubled `(line, direction)` node space. The origin line enters
/// as both its own directional copies simultaneously (dist 0, sigma 1 each,
/// mirroring `angular_integration::traverse`'s two-direction start), since a
/// walk may leave the origin heading either way at no cost.
fn accumulate_bidirectional(
    graph: &AxialGraph,
    origin: u32,
    primary: DistanceType,
    weights: Option<&[f32]>,
    score: &mut [f64],
    node_count: &mut [u32],
    total_depth: &mut [f64],
) {
    let n = graph.line_count();
    let (dist, sigma, preds, order) = single_source_bidirectional(graph, origin, primary);

    let origin0 = origin as usize * 2;
    let origin1 = origin0 + 1;

    let mut line_min_dist = vec![f32::MAX; n];
    for line in 0..n {
        line_min_dist[line] = dist[line * 2].min(dist[line * 2 + 1]);
    }
    let reached_count = line_min_dist.iter().filter(|&&d| d < f32::MAX).count() as u32;
    let depth_sum: f64 = line_min_dist.iter().filter(|&&d| d < f32::MAX).map(|&d| d as f64).sum();
    node_count[origin as usize] = reached_count;
    total_depth[origin as usize] = depth_sum;

    let mut delta = vec![0.0f64; n * 2];
    for &w in order.iter().rev() {
        let w_line = w / 2;
        if w != origin0 && w != origin1 {
            score[w_line] += delta[w];
        }
        let w_weight = weights.map_or(1.0, |ws| ws[w_line] as f64);
        for &v in &preds[w] {
            let contrib = (sigma[v] / sigma[w]) * (w_weight + delta[w]);
            delta[v] += contrib;
        }
    }
}

#[allow(clippy::type_complexity)]
fn single_source(graph: &AxialGraph, origin: u32, primary: DistanceType) -> (Vec<f32>, Vec<f64>, Vec<Vec<u32>>, Vec<u32>) {
    let n = graph.line_count();
    let mut dist = vec![f32::MAX; n];
    let mut sigma = vec![0.0f64; n];
    let mut preds: Vec<Vec<u32>> = vec![Vec::new(); n];
    let mut visited = vec![false; n];
    let mut order = Vec::new();

    dist[origin as usize] = 0.0;
    sigma[origin as usize] = 1.0;
    let mut queue: IndexPriorityQueue<u32> = IndexPriorityQueue::new();
    queue.push(0.0, origin);

    while let Some((d, v)) = queue.pop() {
        if visited[v as usize] {
            continue;
        }
        visited[v as usize] = true;
        order.push(v);
        for hop in line_neighbors(graph, v, primary) {
            let w = hop.other_line;
            let nd = d + hop.weight;
            if nd < dist[w as usize] - EPS {
                dist[w as usize] = nd;
                sigma[w as usize] = sigma[v as usize];
                preds[w as usize] = vec![v];
                queue.push(nd, w);
            } else if (nd - dist[w as usize]).abs() <= EPS {
                sigma[w as usize] += sigma[v as usize];
                if !preds[w as usize].contains(&v) {
                    preds[w as usize].push(v);
                }
            }
        }
    }

    (dist, sigma, preds, order)
}

/// Dijkstra over the doubled `(line, direction)` node space, flattened to
/// index `line * 2 + dir`. Structurally identical to [`single_source`]
/// beyond that flattening and the direction-preserving neighbour lookup.
#[allow(clippy::type_complexity)]
fn single_source_bidirectional(graph: &AxialGraph, origin: u32, primary: DistanceType) -> (Vec<f32>, Vec<f64>, Vec<Vec<usize>>, Vec<usize>) {
    let n_dir = graph.line_count() * 2;
    let mut dist = vec![f32::MAX; n_dir];
    let mut sigma = vec![0.0f64; n_dir];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n_dir];
    let mut visited = vec![false; n_dir];
    let mut order = Vec::new();

    let origin0 = origin as usize * 2;
    let origin1 = origin0 + 1;
    dist[origin0] = 0.0;
    dist[origin1] = 0.0;
    sigma[origin0] = 1.0;
    sigma[origin1] = 1.0;

    let mut queue: IndexPriorityQueue<usize> = IndexPriorityQueue::new();
    queue.push(0.0, origin0);
    queue.push(0.0, origin1);

    while let Some((d, v)) = queue.pop() {
        if visited[v] {
            continue;
        }
        visited[v] = true;
        order.push(v);
        let line = (v / 2) as u32;
        let dir = v % 2;
        for (other_line, other_dir, weight) in dir_neighbors(graph, line, dir, primary) {
            let w = other_line as usize * 2 + other_dir;
            let nd = d + weight;
            if nd < dist[w] - EPS {
                dist[w] = nd;
                sigma[w] = sigma[v];
                preds[w] = vec![v];
                queue.push(nd, w);
            } else if (nd - dist[w]).abs() <= EPS {
                sigma[w] += sigma[v];
                if !preds[w].contains(&v) {
                    preds[w].push(v);
                }
            }
        }
    }

    (dist, sigma, preds, order)
}

/// Normalised betweenness `score / (1/2 (N-1)(N-2))`, skipped (returns the
/// raw score) when `n <= 2` (§6).
pub fn normalize(raw: f64, n: u32) -> f64 {
    if n <= 2 {
        raw
    } else {
        let n = n as f64;
        raw / (0.5 * (n - 1.0) * (n - 2.0))
    }
}

/// Syntax normalisation `log10(score + 1) / log10(2 + TD)` (§6).
pub fn syntax_normalize(raw: f64, total_depth: f64) -> f64 {
    (raw + 1.0).log10() / (2.0 + total_depth).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Polygon;

    #[test]
    fn disconnected_lines_have_zero_betweenness() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0)), ((5.0, 5.0), (6.0, 5.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let result = compute(config::ANALYSIS_SPEC_VERSION, &graph, DistanceType::Steps, None, false).unwrap();
        assert!(result.score.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn three_line_chain_puts_all_betweenness_on_middle_line() {
        let lines = vec![
            ((0.0, 0.0), (1.0, 0.0)),
            ((1.0, 0.0), (2.0, 0.0)),
            ((2.0, 0.0), (2.0, 1.0)),
        ];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let result = compute(config::ANALYSIS_SPEC_VERSION, &graph, DistanceType::Steps, None, false).unwrap();
        assert!(result.score[1] > result.score[0]);
        assert!(result.score[1] > result.score[2]);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let err = compute(config::ANALYSIS_SPEC_VERSION + 1, &graph, DistanceType::Steps, None, false).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::VersionMismatch);
    }

    #[test]
    fn mismatched_weights_length_is_rejected() {
        let lines = vec![((0.0, 0.0), (1.0, 0.0)), ((1.0, 0.0), (2.0, 0.0))];
        let graph = AxialGraph::build(&lines, &[], &[], &[] as &[Polygon], 1.0);
        let weights = vec![1.0f32];
        let err = compute(config::ANALYSIS_SPEC_VERSION, &graph, DistanceType::Steps, Some(&weights), false).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::SizeMismatch);
    }
}
