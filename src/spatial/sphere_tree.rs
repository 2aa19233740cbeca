//! Quadtree-like hierarchy of bounding circles used for nearest-line queries
//! (§4.A "Sphere tree").
//!
//! Child radius is scaled by `1/1.99` rather than `1/2` to paper over
//! numerical slack at cell corners (§9 "Open questions"); this is preserved
//! rather than "fixed" to `0.5`, per that note.

use crate::coords::{Point2, Rect};
use std::collections::HashSet;

/// Child radius shrink factor. See module docs.
const CHILD_RADIUS_SCALE: f32 = 1.0 / 1.99;
const INITIAL_TOLERANCE: f32 = 15.0;

struct Node {
    center: Point2,
    radius: f32,
    children: Option<[u32; 4]>,
    lines: Vec<u32>,
}

pub struct SphereTree {
    nodes: Vec<Node>,
    root: u32,
    bounds: Rect,
}

/// Closest point on segment `a->b` to `p`, returned as `(distance, param_pos)`
/// where `param_pos` is the arc-length offset from `a`.
pub fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> (f32, f32) {
    let len = a.dist(b);
    if len <= f32::EPSILON {
        return (p.dist(a), 0.0);
    }
    let dir = b.sub(a);
    let t = (p.sub(a).dot(dir) / (len * len)).clamp(0.0, 1.0);
    let closest = a.add(dir.scale(t));
    (p.dist(closest), t * len)
}

impl SphereTree {
    /// Builds the circle hierarchy from a bounding box, choosing depth so
    /// each leaf ideally holds `O(log line_count)` lines.
    pub fn build(bounds: Rect, line_count: usize) -> Self {
        let depth = if line_count <= 1 {
            1
        } else {
            ((line_count as f32).log(4.0).ceil() as u32 + 1).clamp(1, 10)
        };
        let mut nodes = Vec::new();
        let radius = (bounds.diagonal() * 0.5).max(1.0);
        let root = build_node(bounds.center(), radius, depth, &mut nodes);
        SphereTree { nodes, root, bounds }
    }

    /// Registers each line (by index into `segments`) into every leaf whose
    /// disc the line's geometry passes within.
    pub fn set_lines(&mut self, segments: &[(Point2, Point2)]) {
        for (idx, (a, b)) in segments.iter().enumerate() {
            self.insert_line(self.root, idx as u32, *a, *b);
        }
    }

    fn insert_line(&mut self, node_idx: u32, idx: u32, a: Point2, b: Point2) {
        let (radius, children) = {
            let node = &self.nodes[node_idx as usize];
            (node.radius, node.children)
        };
        let (dist, _) = point_segment_distance(self.nodes[node_idx as usize].center, a, b);
        if dist > radius {
            return;
        }
        match children {
            None => self.nodes[node_idx as usize].lines.push(idx),
            Some(kids) => {
                for k in kids {
                    self.insert_line(k, idx, a, b);
                }
            }
        }
    }

    fn query_within(&self, p: Point2, radius: f32, out: &mut HashSet<u32>) {
        self.query_node(self.root, p, radius, out);
    }

    fn query_node(&self, node_idx: u32, p: Point2, radius: f32, out: &mut HashSet<u32>) {
        let node = &self.nodes[node_idx as usize];
        if node.center.dist(p) > node.radius + radius {
            return;
        }
        match &node.children {
            None => out.extend(node.lines.iter().copied()),
            Some(kids) => {
                for &k in kids {
                    self.query_node(k, p, radius, out);
                }
            }
        }
    }

    /// Finds the line nearest to `p` by expanding-radius sampling: start at
    /// tolerance 15m, double until a line closer than the tolerance is found
    /// or the graph's diameter (plus the query point's offset from it) is
    /// exceeded. Returns `(line_index, distance, param_pos_along_line)`.
    pub fn get_closest_line(&self, segments: &[(Point2, Point2)], p: Point2) -> Option<(u32, f32, f32)> {
        if segments.is_empty() {
            return None;
        }
        let global_bound = self.bounds.diagonal() + self.bounds.center().dist(p) + 1.0;
        let mut tolerance = INITIAL_TOLERANCE;
        loop {
            let mut candidates = HashSet::new();
            self.query_within(p, tolerance, &mut candidates);
            let mut best: Option<(u32, f32, f32)> = None;
            for &idx in &candidates {
                let (a, b) = segments[idx as usize];
                let (d, t) = point_segment_distance(p, a, b);
                if best.map_or(true, |(_, bd, _)| d < bd) {
                    best = Some((idx, d, t));
                }
            }
            let exhausted = tolerance >= global_bound;
            if let Some((_, d, _)) = best {
                if d <= tolerance || exhausted {
                    return best;
                }
            } else if exhausted {
                // Brute force: the tree missed something pathological.
                return segments
                    .iter()
                    .enumerate()
                    .map(|(idx, (a, b))| {
                        let (d, t) = point_segment_distance(p, *a, *b);
                        (idx as u32, d, t)
                    })
                    .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
            }
            tolerance *= 2.0;
        }
    }
}

fn build_node(center: Point2, radius: f32, depth_remaining: u32, nodes: &mut Vec<Node>) -> u32 {
    if depth_remaining <= 1 {
        nodes.push(Node {
            center,
            radius,
            children: None,
            lines: Vec::new(),
        });
        return (nodes.len() - 1) as u32;
    }
    let child_radius = radius * CHILD_RADIUS_SCALE;
    let offset = radius * 0.5;
    let offsets = [
        Point2::new(-offset, -offset),
        Point2::new(offset, -offset),
        Point2::new(-offset, offset),
        Point2::new(offset, offset),
    ];
    let mut children = [0u32; 4];
    for (i, o) in offsets.iter().enumerate() {
        children[i] = build_node(center.add(*o), child_radius, depth_remaining - 1, nodes);
    }
    nodes.push(Node {
        center,
        radius,
        children: Some(children),
        lines: Vec::new(),
    });
    (nodes.len() - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_exact_nearest_line() {
        let segments = vec![
            (Point2::new(-5.0, 0.0), Point2::new(5.0, 0.0)),
            (Point2::new(0.0, 20.0), Point2::new(10.0, 20.0)),
        ];
        let mut bounds = Rect::empty();
        for (a, b) in &segments {
            bounds.expand(*a);
            bounds.expand(*b);
        }
        let mut tree = SphereTree::build(bounds, segments.len());
        tree.set_lines(&segments);
        let (idx, dist, _) = tree.get_closest_line(&segments, Point2::new(0.0, 1.0)).unwrap();
        assert_eq!(idx, 0);
        assert!((dist - 1.0).abs() < 1e-4);
    }

    #[test]
    fn finds_nearest_line_far_beyond_initial_tolerance() {
        let segments = vec![(Point2::new(0.0, 1000.0), Point2::new(10.0, 1000.0))];
        let mut bounds = Rect::empty();
        bounds.expand(segments[0].0);
        bounds.expand(segments[0].1);
        bounds.expand(Point2::ZERO);
        let mut tree = SphereTree::build(bounds, segments.len());
        tree.set_lines(&segments);
        let (idx, dist, _) = tree.get_closest_line(&segments, Point2::ZERO).unwrap();
        assert_eq!(idx, 0);
        assert!((dist - 1000.0).abs() < 1.0);
    }
}
