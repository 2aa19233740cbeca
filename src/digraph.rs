//! Directed multi-distance graph (§3 "Directed multi-distance graph", §4.D).
//!
//! Built on demand from an [`AxialGraph`] for a chosen primary distance type
//! plus whichever radius types are active (at most 4 simultaneous distance
//! scalars per edge, per §3). Transient: constructed inside a single
//! analysis call and dropped when it returns (attraction-distance, §4.J).

use crate::axial_graph::AxialGraph;
use crate::coords::{angle_diff_deg, Point2};
use crate::distance::{DistanceType, Radii};
use crate::util::arena::Arena;

/// Where an edge leads: another network node, or a destination slot that
/// leaves the graph (§3 "edge payload holds ... a target node handle OR a
/// destination index").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeTarget {
    Node(u32),
    Destination(u32),
}

#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub target: EdgeTarget,
    /// Per-active-distance-type contribution, in the order of `DiGraph::active_types`.
    pub dist: [f32; 4],
}

#[derive(Clone, Debug)]
pub struct Node {
    pub position: Option<Point2>,
    pub edges: Vec<Edge>,
}

/// Addressable element a destination edge can target (§4.D "candidate
/// destination (point, junction, or line-midpoint)").
#[derive(Clone, Copy, Debug)]
pub enum BfsTarget {
    Point(u32),
    Junction(u32),
    Line(u32),
}

pub struct DiGraph {
    nodes: Arena<Node>,
    active_types: Vec<DistanceType>,
    /// Node index of the first origin node appended (§3 "Origin nodes are
    /// appended after network nodes").
    pub first_origin_node: u32,
    /// `line_crossing_node[lc]` is the network node representing that
    /// line-crossing (forward direction; angular mode also has a backward
    /// twin at `line_crossing_node[lc] + n_line_crossings`).
    line_crossing_node: Vec<u32>,
    angular_mode: bool,
    n_line_crossings: u32,
}

impl DiGraph {
    pub fn active_types(&self) -> &[DistanceType] {
        &self.active_types
    }

    pub fn node(&self, idx: u32) -> &Node {
        self.nodes.get(idx)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn slot_of(&self, dt: DistanceType) -> Option<usize> {
        self.active_types.iter().position(|&t| t == dt)
    }

    /// Builds the node/edge store for `graph` under `primary` plus whichever
    /// of `radii`'s caps are active, up to 4 distance types total (§4.D).
    pub fn build(graph: &AxialGraph, primary: DistanceType, radii: &Radii) -> DiGraph {
        let mut active_types = vec![primary];
        for dt in [
            DistanceType::Straight,
            DistanceType::Walking,
            DistanceType::Steps,
            DistanceType::Angular,
            DistanceType::Axmeter,
        ] {
            if dt != primary && radii.is_active(dt) && active_types.len() < 4 {
                active_types.push(dt);
            }
        }
        let angular_mode = primary == DistanceType::Angular;
        let n_lc = graph.line_crossings.len() as u32;

        let mut nodes: Arena<Node> = Arena::new();
        let mut line_crossing_node = vec![0u32; n_lc as usize];
        for (lc_idx, lc) in graph.line_crossings.iter().enumerate() {
            let pos = graph.crossings[lc.i_crossing as usize].pt;
            let fwd = nodes.push(Node {
                position: Some(pos),
                edges: Vec::new(),
            });
            line_crossing_node[lc_idx] = fwd;
            if angular_mode {
                nodes.push(Node {
                    position: Some(pos),
                    edges: Vec::new(),
                });
            }
        }

        let mut dg = DiGraph {
            nodes,
            active_types,
            first_origin_node: 0,
            line_crossing_node,
            angular_mode,
            n_line_crossings: n_lc,
        };
        dg.wire_line_crossing_edges(graph);
        dg.first_origin_node = dg.nodes.len() as u32;
        dg
    }

    fn backward_node(&self, lc: u32) -> u32 {
        self.line_crossing_node[lc as usize] + self.n_line_crossings
    }

    /// Wires each line-crossing node to every other line-crossing reachable
    /// along its own line (including a zero-distance turn at the arrival
    /// point itself), hopping through the *opposite* half-edge so the edge
    /// actually lands on the node belonging to the other line at that
    /// crossing (mirrors `bfs::run`'s same-line-then-opposite traversal).
    fn wire_line_crossing_edges(&mut self, graph: &AxialGraph) {
        for line_idx in 0..graph.line_count() as u32 {
            let base = graph.lines[line_idx as usize].i_first_crossing;
            let lcs = graph.line_crossings_of(line_idx);
            let line = graph.lines[line_idx as usize];
            for (a_pos, a) in lcs.iter().enumerate() {
                let a_idx = base + a_pos as u32;
                for b in lcs {
                    let delta = (b.line_pos - a.line_pos).abs();
                    let next_idx = b.i_opposite;
                    let next_line = graph.lines[graph.line_crossings[next_idx as usize].i_line as usize];
                    let a_fwd = self.line_crossing_node[a_idx as usize];
                    let next_fwd = self.line_crossing_node[next_idx as usize];
                    self.push_edge(a_fwd, next_fwd, line, next_line, delta, false);
                    if self.angular_mode {
                        let a_bwd = self.backward_node(a_idx);
                        let next_bwd = self.backward_node(next_idx);
                        self.push_edge(a_bwd, next_bwd, line, next_line, delta, true);
                    }
                }
            }
        }
    }

    /// `reverse` is the direction the walk currently travels `line` in
    /// (`false` = along `line.angle_deg`, `true` = the reverse heading);
    /// the angular weight compares that heading against `next_line`'s
    /// orientation, the line actually being turned onto.
    fn push_edge(&mut self, from: u32, to: u32, line: crate::line::Line, next_line: crate::line::Line, walking_delta: f32, reverse: bool) {
        let heading = if reverse { line.angle_deg + 180.0 } else { line.angle_deg };
        let angular_delta = angle_diff_deg(heading, next_line.angle_deg).abs();
        let mut dist = [0f32; 4];
        for (slot, &dt) in self.active_types.clone().iter().enumerate() {
            dist[slot] = match dt {
                DistanceType::Straight => walking_delta,
                DistanceType::Walking => walking_delta,
                DistanceType::Steps => 1.0,
                DistanceType::Angular => angular_delta,
                DistanceType::Axmeter => line.length * (1.0 + 1.0),
                DistanceType::Weights => walking_delta,
            };
        }
        self.nodes.get_mut(from).edges.push(Edge {
            target: EdgeTarget::Node(to),
            dist,
        });
    }

    /// Appends an origin node at `coords`, attached to `nearest_line`'s
    /// line-crossings (with `dist_from_line` pre-paid on every active
    /// distance type) and to destination targets within the active radii.
    /// Returns the new origin node's index.
    pub fn add_origin(
        &mut self,
        graph: &AxialGraph,
        coords: Point2,
        nearest_line: Option<(u32, f32, f32)>,
        destinations: &[(BfsTarget, Point2)],
        radii: &Radii,
    ) -> u32 {
        let origin = self.nodes.push(Node {
            position: Some(coords),
            edges: Vec::new(),
        });
        if let Some((line_idx, dist_from_line, line_pos)) = nearest_line {
            let lcs = graph.line_crossings_of(line_idx);
            let base = graph.lines[line_idx as usize].i_first_crossing;
            for (i, lc) in lcs.iter().enumerate() {
                let delta = (lc.line_pos - line_pos).abs() + dist_from_line;
                let target = self.line_crossing_node[(base + i as u32) as usize];
                let mut dist = [0f32; 4];
                for (slot, &dt) in self.active_types.clone().iter().enumerate() {
                    dist[slot] = match dt {
                        DistanceType::Steps => 0.0,
                        DistanceType::Angular => 0.0,
                        _ => delta,
                    };
                }
                self.nodes.get_mut(origin).edges.push(Edge {
                    target: EdgeTarget::Node(target),
                    dist,
                });
            }
        }
        for (dest_idx, (_, dest_pos)) in destinations.iter().enumerate() {
            let d = coords.dist(*dest_pos);
            if let Some(cap) = radii.straight {
                if d as f64 > cap {
                    continue;
                }
            }
            let mut dist = [0f32; 4];
            for slot in 0..self.active_types.len() {
                dist[slot] = d;
            }
            self.nodes.get_mut(origin).edges.push(Edge {
                target: EdgeTarget::Destination(dest_idx as u32),
                dist,
            });
        }
        origin
    }
}

/// Where a destination attaches to the network: parametrically along a
/// line, or pinned directly to a crossing (§4.D "candidate destination
/// (point, junction, or line-midpoint)").
#[derive(Clone, Copy, Debug)]
pub enum DestinationAttachment {
    OnLine {
        line: u32,
        line_pos: f32,
        dist_from_line: f32,
    },
    AtCrossing(u32),
}

impl DiGraph {
    /// Wires destination edges from every line-crossing node that can reach
    /// each attachment along its own line (§4.D "Destination edges are
    /// added from every node whose line carries a candidate destination").
    /// `attachments[d]` is `None` when destination `d` could not be
    /// attached to the network at all (e.g. empty graph).
    pub fn wire_destinations(&mut self, graph: &AxialGraph, attachments: &[Option<DestinationAttachment>]) {
        for (d_idx, attach) in attachments.iter().enumerate() {
            match attach {
                Some(DestinationAttachment::OnLine { line, line_pos, dist_from_line }) => {
                    self.wire_destination_on_line(graph, *line, *line_pos, *dist_from_line, d_idx as u32);
                }
                Some(DestinationAttachment::AtCrossing(crossing_idx)) => {
                    for (lc_idx, lc) in graph.line_crossings.iter().enumerate() {
                        if lc.i_crossing == *crossing_idx {
                            let node = self.line_crossing_node[lc_idx];
                            self.push_destination_edge(node, d_idx as u32, 0.0);
                            if self.angular_mode {
                                let bwd = self.backward_node(lc_idx as u32);
                                self.push_destination_edge(bwd, d_idx as u32, 0.0);
                            }
                        }
                    }
                }
                None => {}
            }
        }
    }

    fn wire_destination_on_line(&mut self, graph: &AxialGraph, line: u32, line_pos: f32, dist_from_line: f32, d_idx: u32) {
        let base = graph.lines[line as usize].i_first_crossing;
        for (i, lc) in graph.line_crossings_of(line).iter().enumerate() {
            let delta = (lc.line_pos - line_pos).abs() + dist_from_line;
            let node_idx = base + i as u32;
            let fwd = self.line_crossing_node[node_idx as usize];
            self.push_destination_edge(fwd, d_idx, delta);
            if self.angular_mode {
                let bwd = self.backward_node(node_idx);
                self.push_destination_edge(bwd, d_idx, delta);
            }
        }
    }

    fn push_destination_edge(&mut self, from: u32, d_idx: u32, walking_delta: f32) {
        let mut dist = [0f32; 4];
        for (slot, &dt) in self.active_types.clone().iter().enumerate() {
            dist[slot] = match dt {
                DistanceType::Steps | DistanceType::Angular => 0.0,
                _ => walking_delta,
            };
        }
        self.nodes.get_mut(from).edges.push(Edge {
            target: EdgeTarget::Destination(d_idx),
            dist,
        });
    }
}
