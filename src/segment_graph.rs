//! Segment graph: lines as nodes, intersections as hyperedges (§4.C).
//!
//! Built directly from line endpoint coordinates (not from an [`AxialGraph`])
//! by fusing identical endpoints, mirroring the original's coordinate-index
//! sort-and-group construction rather than reusing crossing detection.

use crate::coords::{orientation_angle_deg, Point2};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub center: Point2,
    pub orientation_deg: f32,
    pub length: f32,
    /// Incident intersection at each endpoint; `None` means a dead end.
    pub intersections: [Option<u32>; 2],
}

#[derive(Clone, Debug)]
pub struct Intersection {
    pub pt: Point2,
    pub segments: Vec<u32>,
}

pub struct SegmentGraph {
    pub segments: Vec<Segment>,
    pub intersections: Vec<Intersection>,
}

/// Coordinates are fused into one intersection when they are bit-for-bit
/// equal after quantizing to this many local-space units; the axial graph's
/// crossing detector handles near-misses, the segment graph only handles
/// coincident endpoints by construction (per §4.C).
const QUANTIZE: f32 = 1.0 / 1024.0;

fn quantize(p: Point2) -> (i64, i64) {
    (
        (p.x / QUANTIZE).round() as i64,
        (p.y / QUANTIZE).round() as i64,
    )
}

impl SegmentGraph {
    pub fn build(lines: &[(Point2, Point2)]) -> Self {
        let mut coord_map: HashMap<(i64, i64), u32> = HashMap::new();
        let mut intersections: Vec<Intersection> = Vec::new();

        let mut endpoint_of = |p: Point2, intersections: &mut Vec<Intersection>| -> u32 {
            let key = quantize(p);
            *coord_map.entry(key).or_insert_with(|| {
                intersections.push(Intersection {
                    pt: p,
                    segments: Vec::new(),
                });
                (intersections.len() - 1) as u32
            })
        };

        let mut segments = Vec::with_capacity(lines.len());
        let mut endpoint_ids = Vec::with_capacity(lines.len());
        for (p1, p2) in lines {
            let a = endpoint_of(*p1, &mut intersections);
            let b = endpoint_of(*p2, &mut intersections);
            endpoint_ids.push((a, b));
            segments.push(Segment {
                center: p1.lerp(*p2, 0.5),
                orientation_deg: orientation_angle_deg(p2.sub(*p1)),
                length: p1.dist(*p2),
                intersections: [None, None],
            });
        }

        // Only coordinates shared by >= 2 segments form a real intersection;
        // otherwise the endpoint is a dead end (None).
        let mut degree = vec![0u32; intersections.len()];
        for &(a, b) in &endpoint_ids {
            degree[a as usize] += 1;
            degree[b as usize] += 1;
        }

        for (seg_idx, &(a, b)) in endpoint_ids.iter().enumerate() {
            if degree[a as usize] >= 2 {
                segments[seg_idx].intersections[0] = Some(a);
                intersections[a as usize].segments.push(seg_idx as u32);
            }
            if degree[b as usize] >= 2 {
                segments[seg_idx].intersections[1] = Some(b);
                intersections[b as usize].segments.push(seg_idx as u32);
            }
        }

        SegmentGraph {
            segments,
            intersections,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The other segments sharing an intersection with `segment`, at the
    /// given endpoint (`0` or `1`), excluding `segment` itself.
    pub fn neighbors_at(&self, segment: u32, endpoint: usize) -> Vec<u32> {
        match self.segments[segment as usize].intersections[endpoint] {
            None => Vec::new(),
            Some(i) => self.intersections[i as usize]
                .segments
                .iter()
                .copied()
                .filter(|&s| s != segment)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_unordered::assert_eq_unordered;

    #[test]
    fn star_junction_neighbors_are_the_other_three_arms_in_any_order() {
        let lines = vec![
            (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            (Point2::new(0.0, 0.0), Point2::new(-1.0, 0.0)),
            (Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)),
            (Point2::new(0.0, 0.0), Point2::new(0.0, -1.0)),
        ];
        let g = SegmentGraph::build(&lines);
        assert_eq_unordered!(g.neighbors_at(0, 0), vec![1, 2, 3]);
    }

    #[test]
    fn t_junction_shares_one_intersection() {
        let lines = vec![
            (Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)),
            (Point2::new(1.0, 0.0), Point2::new(1.0, 1.0)),
        ];
        let g = SegmentGraph::build(&lines);
        assert_eq!(g.intersections.len(), 3);
        let shared = g.segments[0].intersections[1].unwrap();
        assert_eq!(g.segments[1].intersections[0], Some(shared));
        assert_eq!(g.neighbors_at(0, 1), vec![1]);
    }

    #[test]
    fn disjoint_lines_have_dead_ends() {
        let lines = vec![
            (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)),
            (Point2::new(5.0, 5.0), Point2::new(6.0, 5.0)),
        ];
        let g = SegmentGraph::build(&lines);
        assert!(g.segments[0].intersections[0].is_none());
        assert!(g.segments[0].intersections[1].is_none());
        assert!(g.segments[1].intersections[0].is_none());
    }
}
