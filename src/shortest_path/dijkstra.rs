//! Dijkstra over [`DiGraph`], in the two modes from §4.F.

use crate::digraph::{DiGraph, EdgeTarget};
use crate::distance::Radii;
use crate::util::index_priority_queue::IndexPriorityQueue;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Multi-metric: re-expand a node whenever the new tuple Pareto-improves
    /// the stored one.
    Search,
    /// Single-metric: classic "first pop wins".
    SearchAccumulative,
}

pub struct SearchResult {
    pub best: Vec<Option<[f32; 4]>>,
    pub predecessor: Vec<Option<u32>>,
    pub destination_best: Vec<Option<[f32; 4]>>,
}

enum Item {
    Node(u32),
    Destination(u32),
}

fn pareto_improves(new: &[f32; 4], old: &Option<[f32; 4]>, n: usize) -> bool {
    match old {
        None => true,
        Some(old) => {
            let mut any_better = false;
            for i in 0..n {
                if new[i] > old[i] {
                    return false;
                }
                if new[i] < old[i] {
                    any_better = true;
                }
            }
            any_better
        }
    }
}

fn exceeds_radius(dist: &[f32; 4], digraph: &DiGraph, radii: &Radii) -> bool {
    for (slot, &dt) in digraph.active_types().iter().enumerate() {
        let cap = match dt {
            crate::distance::DistanceType::Straight => radii.straight.map(|c| c as f32),
            crate::distance::DistanceType::Walking => radii.walking.map(|c| c as f32),
            crate::distance::DistanceType::Steps => radii.steps.map(|c| c as f32),
            crate::distance::DistanceType::Angular => radii.angular.map(|c| c as f32),
            crate::distance::DistanceType::Axmeter => radii.axmeter.map(|c| c as f32),
            crate::distance::DistanceType::Weights => None,
        };
        if let Some(cap) = cap {
            if dist[slot] > cap {
                return true;
            }
        }
    }
    false
}

/// Runs Dijkstra from `start`, reporting each destination index to
/// `on_destination` the first time it is popped from the fringe (§4.F
/// "Destinations are reported by invoking a caller-supplied callback").
pub fn run(
    digraph: &DiGraph,
    radii: &Radii,
    mode: Mode,
    start: u32,
    n_destinations: usize,
    mut on_destination: impl FnMut(u32, f32),
) -> SearchResult {
    let n_types = digraph.active_types().len();
    let mut best: Vec<Option<[f32; 4]>> = vec![None; digraph.node_count()];
    let mut predecessor: Vec<Option<u32>> = vec![None; digraph.node_count()];
    let mut destination_best: Vec<Option<[f32; 4]>> = vec![None; n_destinations];
    let mut reported: HashSet<u32> = HashSet::new();

    let mut queue: IndexPriorityQueue<Item> = IndexPriorityQueue::new();
    best[start as usize] = Some([0.0; 4]);
    queue.push(0.0, Item::Node(start));

    while let Some((priority, item)) = queue.pop() {
        match item {
            Item::Destination(d) => {
                if reported.insert(d) {
                    on_destination(d, priority);
                }
            }
            Item::Node(n) => {
                let current = match best[n as usize] {
                    Some(v) => v,
                    None => continue,
                };
                // Stale lazy-deletion entry: a better tuple has since been recorded.
                if current[0] != priority {
                    continue;
                }
                let node = digraph.node(n);
                for edge in &node.edges {
                    let mut cand = [0f32; 4];
                    for i in 0..n_types {
                        cand[i] = current[i] + edge.dist[i];
                    }
                    if exceeds_radius(&cand, digraph, radii) {
                        continue;
                    }
                    match edge.target {
                        EdgeTarget::Node(to) => {
                            let accept = match mode {
                                Mode::SearchAccumulative => best[to as usize].is_none(),
                                Mode::Search => pareto_improves(&cand, &best[to as usize], n_types),
                            };
                            if accept {
                                best[to as usize] = Some(cand);
                                predecessor[to as usize] = Some(n);
                                queue.push(cand[0], Item::Node(to));
                            }
                        }
                        EdgeTarget::Destination(d) => {
                            let accept = match mode {
                                Mode::SearchAccumulative => destination_best[d as usize].is_none(),
                                Mode::Search => pareto_improves(&cand, &destination_best[d as usize], n_types),
                            };
                            if accept {
                                destination_best[d as usize] = Some(cand);
                                queue.push(cand[0], Item::Destination(d));
                            }
                        }
                    }
                }
            }
        }
    }

    SearchResult {
        best,
        predecessor,
        destination_best,
    }
}
