//! Recursive axis-aligned BSP tree over a point set (§4.A).
//!
//! Construction reorders the input points into BSP order; the caller gets
//! back the permutation so it can keep parallel attribute arrays in sync for
//! cache locality, matching the original's reordering contract.

use crate::coords::{Point2, Rect};

const DEFAULT_MAX_POINTS_PER_CELL: usize = 16;

#[derive(Clone, Copy, Debug)]
enum Axis {
    X,
    Y,
}

enum Node {
    Leaf {
        bounds: Rect,
        first: u32,
        count: u32,
    },
    Split {
        bounds: Rect,
        axis: Axis,
        value: f32,
        left: u32,
        right: u32,
    },
}

/// An (first_object, count) range into [`PointBspTree::ordered_indices`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRange {
    pub first: u32,
    pub count: u32,
}

pub struct PointBspTree {
    nodes: Vec<Node>,
    root: u32,
    /// `ordered_indices[bsp_position] == original_input_index`.
    ordered_indices: Vec<u32>,
    max_points_per_cell: usize,
}

impl PointBspTree {
    pub fn build(points: &[Point2]) -> Self {
        Self::build_with_cell_size(points, DEFAULT_MAX_POINTS_PER_CELL)
    }

    pub fn build_with_cell_size(points: &[Point2], max_points_per_cell: usize) -> Self {
        let mut ordered_indices: Vec<u32> = (0..points.len() as u32).collect();
        let mut reordered: Vec<Point2> = points.to_vec();
        let mut nodes = Vec::new();
        let root = if points.is_empty() {
            nodes.push(Node::Leaf {
                bounds: Rect::empty(),
                first: 0,
                count: 0,
            });
            0
        } else {
            build_recursive(
                &mut reordered,
                &mut ordered_indices,
                0,
                points.len(),
                &mut nodes,
                max_points_per_cell,
            )
        };
        PointBspTree {
            nodes,
            root,
            ordered_indices,
            max_points_per_cell,
        }
    }

    pub fn ordered_indices(&self) -> &[u32] {
        &self.ordered_indices
    }

    pub fn max_points_per_cell(&self) -> usize {
        self.max_points_per_cell
    }

    /// Returns the BSP-ordered object ranges of every leaf whose cell
    /// overlaps the disc `(center, r)`.
    pub fn test_sphere(&self, center: Point2, r: f32) -> Vec<ObjectRange> {
        let mut out = Vec::new();
        self.test_sphere_node(self.root, center, r, &mut out);
        out
    }

    fn test_sphere_node(&self, idx: u32, center: Point2, r: f32, out: &mut Vec<ObjectRange>) {
        match &self.nodes[idx as usize] {
            Node::Leaf { bounds, first, count } => {
                if *count > 0 && bounds.overlaps_circle(center, r) {
                    out.push(ObjectRange {
                        first: *first,
                        count: *count,
                    });
                }
            }
            Node::Split { bounds, left, right, .. } => {
                if bounds.overlaps_circle(center, r) {
                    self.test_sphere_node(*left, center, r, out);
                    self.test_sphere_node(*right, center, r, out);
                }
            }
        }
    }

    /// Returns the object ranges of leaves whose cell overlaps the capsule
    /// (segment `p0->p1` inflated by `r`), approximated via the capsule's
    /// axis-aligned bounding rectangle.
    pub fn test_capsule(&self, p0: Point2, p1: Point2, r: f32) -> Vec<ObjectRange> {
        let mut bounds = Rect::empty();
        bounds.expand(Point2::new(p0.x - r, p0.y - r));
        bounds.expand(Point2::new(p0.x + r, p0.y + r));
        bounds.expand(Point2::new(p1.x - r, p1.y - r));
        bounds.expand(Point2::new(p1.x + r, p1.y + r));
        let mut out = Vec::new();
        self.test_rect_node(self.root, &bounds, &mut out);
        out
    }

    fn test_rect_node(&self, idx: u32, query: &Rect, out: &mut Vec<ObjectRange>) {
        match &self.nodes[idx as usize] {
            Node::Leaf { bounds, first, count } => {
                if *count > 0 && rects_overlap(bounds, query) {
                    out.push(ObjectRange {
                        first: *first,
                        count: *count,
                    });
                }
            }
            Node::Split { bounds, left, right, .. } => {
                if rects_overlap(bounds, query) {
                    self.test_rect_node(*left, query, out);
                    self.test_rect_node(*right, query, out);
                }
            }
        }
    }
}

fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x && a.min.y <= b.max.y && a.max.y >= b.min.y
}

fn bounds_of(points: &[Point2], range: std::ops::Range<usize>) -> Rect {
    let mut bounds = Rect::empty();
    for p in &points[range] {
        bounds.expand(*p);
    }
    bounds
}

fn build_recursive(
    points: &mut [Point2],
    indices: &mut [u32],
    start: usize,
    end: usize,
    nodes: &mut Vec<Node>,
    max_points_per_cell: usize,
) -> u32 {
    let bounds = bounds_of(points, start..end);
    let count = end - start;
    if count <= max_points_per_cell {
        nodes.push(Node::Leaf {
            bounds,
            first: start as u32,
            count: count as u32,
        });
        return (nodes.len() - 1) as u32;
    }

    let axis = if bounds.width() >= bounds.height() {
        Axis::X
    } else {
        Axis::Y
    };
    let mid = start + count / 2;
    {
        let slice = &mut points[start..end];
        let idx_slice = &mut indices[start..end];
        let mut paired: Vec<(Point2, u32)> = slice.iter().copied().zip(idx_slice.iter().copied()).collect();
        match axis {
            Axis::X => paired.select_nth_unstable_by(mid - start, |a, b| a.0.x.partial_cmp(&b.0.x).unwrap()),
            Axis::Y => paired.select_nth_unstable_by(mid - start, |a, b| a.0.y.partial_cmp(&b.0.y).unwrap()),
        };
        for (i, (p, idx)) in paired.into_iter().enumerate() {
            slice[i] = p;
            idx_slice[i] = idx;
        }
    }
    let split_value = match axis {
        Axis::X => points[mid].x,
        Axis::Y => points[mid].y,
    };

    let left = build_recursive(points, indices, start, mid, nodes, max_points_per_cell);
    let right = build_recursive(points, indices, mid, end, nodes, max_points_per_cell);
    nodes.push(Node::Split {
        bounds,
        axis,
        value: split_value,
        left,
        right,
    });
    (nodes.len() - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_point_found_by_zero_radius_sphere() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(5.0, 5.0),
            Point2::new(-3.0, 2.0),
        ];
        let tree = PointBspTree::build_with_cell_size(&points, 2);
        for (i, p) in points.iter().enumerate() {
            let ranges = tree.test_sphere(*p, 0.0);
            let found = ranges.iter().any(|r| {
                (r.first..r.first + r.count)
                    .any(|pos| tree.ordered_indices()[pos as usize] == i as u32)
            });
            assert!(found, "point {i} not found");
        }
    }

    #[test]
    fn empty_tree_has_no_results() {
        let tree = PointBspTree::build(&[]);
        assert!(tree.test_sphere(Point2::ZERO, 100.0).is_empty());
    }
}
