//! Recursive axis-aligned BSP tree over line segments (§4.A).
//!
//! Segments whose bounding box straddles a splitter are duplicated into
//! both children, bounded by a maximum recursion depth so pathological
//! inputs (e.g. one line spanning the whole graph) can't blow up storage.

use crate::coords::{Point2, Rect};
use std::collections::HashSet;

const DEFAULT_MAX_LINES_PER_CELL: usize = 16;
const MAX_DEPTH: u32 = 24;

enum Node {
    Leaf { bounds: Rect, lines: Vec<u32> },
    Split { bounds: Rect, left: u32, right: u32 },
}

pub struct LineBspTree {
    nodes: Vec<Node>,
    root: u32,
}

impl LineBspTree {
    pub fn build(segments: &[(Point2, Point2)]) -> Self {
        Self::build_with_cell_size(segments, DEFAULT_MAX_LINES_PER_CELL)
    }

    pub fn build_with_cell_size(segments: &[(Point2, Point2)], max_lines_per_cell: usize) -> Self {
        let mut nodes = Vec::new();
        let entries: Vec<(u32, Rect)> = segments
            .iter()
            .enumerate()
            .map(|(i, (a, b))| {
                let mut r = Rect::empty();
                r.expand(*a);
                r.expand(*b);
                (i as u32, r)
            })
            .collect();
        let root = if entries.is_empty() {
            nodes.push(Node::Leaf {
                bounds: Rect::empty(),
                lines: Vec::new(),
            });
            0
        } else {
            build_recursive(&entries, &mut nodes, max_lines_per_cell, 0)
        };
        LineBspTree { nodes, root }
    }

    /// Unique candidate line indices whose cell overlaps the capsule
    /// `(p0->p1, r)`. Candidates must still be verified against exact
    /// segment geometry by the caller.
    pub fn test_capsule(&self, p0: Point2, p1: Point2, r: f32) -> Vec<u32> {
        let mut bounds = Rect::empty();
        bounds.expand(Point2::new(p0.x - r, p0.y - r));
        bounds.expand(Point2::new(p0.x + r, p0.y + r));
        bounds.expand(Point2::new(p1.x - r, p1.y - r));
        bounds.expand(Point2::new(p1.x + r, p1.y + r));
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect(self.root, &bounds, &mut seen, &mut out);
        out
    }

    fn collect(&self, idx: u32, query: &Rect, seen: &mut HashSet<u32>, out: &mut Vec<u32>) {
        match &self.nodes[idx as usize] {
            Node::Leaf { bounds, lines } => {
                if rects_overlap(bounds, query) {
                    for &l in lines {
                        if seen.insert(l) {
                            out.push(l);
                        }
                    }
                }
            }
            Node::Split { bounds, left, right } => {
                if rects_overlap(bounds, query) {
                    self.collect(*left, query, seen, out);
                    self.collect(*right, query, seen, out);
                }
            }
        }
    }
}

fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x && a.min.y <= b.max.y && a.max.y >= b.min.y
}

fn bounds_of(entries: &[(u32, Rect)]) -> Rect {
    let mut b = Rect::empty();
    for (_, r) in entries {
        b.expand(r.min);
        b.expand(r.max);
    }
    b
}

fn build_recursive(entries: &[(u32, Rect)], nodes: &mut Vec<Node>, max_per_cell: usize, depth: u32) -> u32 {
    let bounds = bounds_of(entries);
    if entries.len() <= max_per_cell || depth >= MAX_DEPTH {
        nodes.push(Node::Leaf {
            bounds,
            lines: entries.iter().map(|(i, _)| *i).collect(),
        });
        return (nodes.len() - 1) as u32;
    }

    let split_on_x = bounds.width() >= bounds.height();
    let split_value = if split_on_x {
        bounds.center().x
    } else {
        bounds.center().y
    };

    let mut left_entries = Vec::new();
    let mut right_entries = Vec::new();
    for &(idx, r) in entries {
        let (lo, hi) = if split_on_x { (r.min.x, r.max.x) } else { (r.min.y, r.max.y) };
        if lo <= split_value {
            left_entries.push((idx, r));
        }
        if hi >= split_value {
            right_entries.push((idx, r));
        }
    }

    // Guard against a degenerate split that fails to shrink the cell.
    if left_entries.len() == entries.len() || right_entries.len() == entries.len() {
        nodes.push(Node::Leaf {
            bounds,
            lines: entries.iter().map(|(i, _)| *i).collect(),
        });
        return (nodes.len() - 1) as u32;
    }

    let left = build_recursive(&left_entries, nodes, max_per_cell, depth + 1);
    let right = build_recursive(&right_entries, nodes, max_per_cell, depth + 1);
    nodes.push(Node::Split { bounds, left, right });
    (nodes.len() - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_line_through_its_own_capsule() {
        let segments: Vec<(Point2, Point2)> = (0..40)
            .map(|i| (Point2::new(i as f32, 0.0), Point2::new(i as f32, 1.0)))
            .collect();
        let tree = LineBspTree::build_with_cell_size(&segments, 4);
        let candidates = tree.test_capsule(Point2::new(10.0, 0.5), Point2::new(10.0, 0.5), 0.1);
        assert!(candidates.contains(&10));
    }
}
