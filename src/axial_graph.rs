//! Axial graph construction (§4.B): lines, crossings, line-crossings,
//! unlink resolution, and point attachment, backed by the spatial indices
//! of §4.A.

use crate::coords::{segment_intersection, LocalFrame, Point2, Rect};
use crate::crossing::{Crossing, LineCrossing};
use crate::line::Line;
use crate::logging::anomaly;
use crate::point::{NetworkPoint, Polygon};
use crate::spatial::sphere_tree::SphereTree;
use std::collections::HashMap;

/// Crossing-coordinate quantization grid, used to decide "unique by
/// coordinate" (§3 "Crossing"). Two independently solved line-pair
/// intersections at (numerically) the same point must collapse to one
/// crossing.
const CROSSING_QUANTIZE: f32 = 1.0 / 4096.0;

fn quantize(p: Point2) -> (i64, i64) {
    (
        (p.x / CROSSING_QUANTIZE).round() as i64,
        (p.y / CROSSING_QUANTIZE).round() as i64,
    )
}

pub struct AxialGraph {
    pub frame: LocalFrame,
    pub bounds: Rect,
    pub lines: Vec<Line>,
    pub crossings: Vec<Crossing>,
    pub line_crossings: Vec<LineCrossing>,
    pub points: Vec<NetworkPoint>,
    /// Per-line contiguous point-index array (parallel to `Line::i_first_point`/`n_points`).
    pub line_points: Vec<u32>,
    /// Point-group membership: `points_per_group[g]` is a list of indices into `points`.
    pub points_per_group: Vec<Vec<u32>>,
    sphere_tree: SphereTree,
}

struct CrossMapRecord {
    point: Point2,
    line_a: u32,
    line_b: u32,
    removed: bool,
}

impl AxialGraph {
    pub fn build(
        lines_world: &[((f64, f64), (f64, f64))],
        unlinks_world: &[(f64, f64)],
        points_world: &[(f64, f64)],
        polygons: &[Polygon],
        point_group_sample_interval: f32,
    ) -> AxialGraph {
        let world_points = lines_world
            .iter()
            .flat_map(|(a, b)| [*a, *b])
            .chain(unlinks_world.iter().copied())
            .chain(points_world.iter().copied());
        let (frame, mut bounds) = LocalFrame::from_world_points(world_points);
        if bounds.is_empty() {
            bounds = Rect::empty();
        }

        let mut lines: Vec<Line> = lines_world
            .iter()
            .filter_map(|(a, b)| {
                let p1 = frame.world_to_local(*a);
                let p2 = frame.world_to_local(*b);
                let line = Line::new(p1, p2);
                if line.is_degenerate() {
                    anomaly!("skipping zero-length line at ({:?}, {:?})", a, b);
                    None
                } else {
                    Some(line)
                }
            })
            .collect();

        let segments: Vec<(Point2, Point2)> = lines.iter().map(|l| (l.p1, l.p2)).collect();
        let mut sphere_tree = SphereTree::build(bounds, lines.len());
        sphere_tree.set_lines(&segments);

        let records = find_crossings(&lines, &segments);
        let records = resolve_unlinks(records, &lines, &frame, unlinks_world);
        let (crossings, line_crossings) = build_crossings(records, &mut lines);

        let mut points: Vec<NetworkPoint> = points_world
            .iter()
            .map(|p| attach_point(frame.world_to_local(*p), &segments, &sphere_tree))
            .collect();
        let line_points = bucket_points_per_line(&mut lines, &points);

        let points_per_group = build_point_groups(
            polygons,
            point_group_sample_interval,
            &segments,
            &sphere_tree,
            &frame,
            &mut points,
        );

        AxialGraph {
            frame,
            bounds,
            lines,
            crossings,
            line_crossings,
            points,
            line_points,
            points_per_group,
            sphere_tree,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_crossings_of(&self, line: u32) -> &[LineCrossing] {
        let l = &self.lines[line as usize];
        &self.line_crossings[l.i_first_crossing as usize..(l.i_first_crossing + l.n_crossings) as usize]
    }

    pub fn points_of(&self, line: u32) -> &[u32] {
        let l = &self.lines[line as usize];
        &self.line_points[l.i_first_point as usize..(l.i_first_point + l.n_points) as usize]
    }

    /// Nearest line to `p` (local coordinates), via the sphere tree (§4.A).
    pub fn closest_line(&self, p: Point2) -> Option<(u32, f32, f32)> {
        let segments: Vec<(Point2, Point2)> = self.lines.iter().map(|l| (l.p1, l.p2)).collect();
        self.sphere_tree.get_closest_line(&segments, p)
    }

    /// Checks the graph invariants from §8 "Graph invariants". Intended for
    /// tests and debug assertions, not the release-build hot path.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (i, lc) in self.line_crossings.iter().enumerate() {
            let opp = &self.line_crossings[lc.i_opposite as usize];
            if opp.i_opposite as usize != i {
                return Err(format!("line-crossing {i} opposite is not symmetric"));
            }
            if opp.i_crossing != lc.i_crossing {
                return Err(format!("line-crossing {i} opposite crossing mismatch"));
            }
        }
        for (i, line) in self.lines.iter().enumerate() {
            for lc in self.line_crossings_of(i as u32) {
                if lc.i_line != i as u32 {
                    return Err(format!("line {i} crossing range contains foreign line-crossing"));
                }
                if lc.line_pos < -1e-3 || lc.line_pos > line.length + 1e-3 {
                    return Err(format!("line {i} crossing has out-of-range linePos"));
                }
            }
        }
        Ok(())
    }
}

fn find_crossings(lines: &[Line], segments: &[(Point2, Point2)]) -> Vec<CrossMapRecord> {
    let mut records = Vec::new();
    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            let (a0, a1) = segments[i];
            let (b0, b1) = segments[j];
            if let Some((_, _, pt)) = segment_intersection(a0, a1, b0, b1) {
                records.push(CrossMapRecord {
                    point: pt,
                    line_a: i as u32,
                    line_b: j as u32,
                    removed: false,
                });
            }
        }
    }
    records
}

/// A "true" crossing is one where neither line's endpoint coincides with the
/// intersection point (§4.B step 3; §8 scenario S3).
fn is_true_crossing(rec: &CrossMapRecord, lines: &[Line]) -> bool {
    let a = &lines[rec.line_a as usize];
    let b = &lines[rec.line_b as usize];
    let eps = 1e-4;
    let touches = |p: Point2, q: Point2| p.dist(q) < eps;
    !(touches(rec.point, a.p1)
        || touches(rec.point, a.p2)
        || touches(rec.point, b.p1)
        || touches(rec.point, b.p2))
}

fn resolve_unlinks(
    mut records: Vec<CrossMapRecord>,
    lines: &[Line],
    frame: &LocalFrame,
    unlinks_world: &[(f64, f64)],
) -> Vec<CrossMapRecord> {
    for unlink in unlinks_world {
        let local = frame.world_to_local(*unlink);
        let mut best: Option<(usize, f32)> = None;
        for (i, rec) in records.iter().enumerate() {
            if rec.removed || !is_true_crossing(rec, lines) {
                continue;
            }
            let d = rec.point.dist_sq(local);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        match best {
            Some((i, _)) => records[i].removed = true,
            None => anomaly!("unlink at {:?} has no nearby crossing", unlink),
        }
    }
    records.retain(|r| !r.removed);
    records
}

fn build_crossings(mut records: Vec<CrossMapRecord>, lines: &mut [Line]) -> (Vec<Crossing>, Vec<LineCrossing>) {
    records.sort_by_key(|r| quantize(r.point));

    let mut crossings: Vec<Crossing> = Vec::new();
    let mut crossing_index: HashMap<(i64, i64), u32> = HashMap::new();

    // Each record contributes exactly two drafts, at indices `2*record_id`
    // and `2*record_id + 1`, which is how opposites are recovered below.
    struct Draft {
        i_crossing: u32,
        i_line: u32,
        line_pos: f32,
    }
    let mut drafts: Vec<Draft> = Vec::with_capacity(records.len() * 2);

    for rec in &records {
        let key = quantize(rec.point);
        let i_crossing = *crossing_index.entry(key).or_insert_with(|| {
            crossings.push(Crossing {
                pt: rec.point,
                n_lines: 0,
            });
            (crossings.len() - 1) as u32
        });
        let line_a = &lines[rec.line_a as usize];
        let pos_a = line_a.position_of(rec.point).clamp(0.0, line_a.length);
        let line_b = &lines[rec.line_b as usize];
        let pos_b = line_b.position_of(rec.point).clamp(0.0, line_b.length);
        drafts.push(Draft {
            i_crossing,
            i_line: rec.line_a,
            line_pos: pos_a,
        });
        drafts.push(Draft {
            i_crossing,
            i_line: rec.line_b,
            line_pos: pos_b,
        });
    }

    // Count distinct lines touching each crossing.
    use itertools::Itertools;
    let mut lines_per_crossing: Vec<Vec<u32>> = vec![Vec::new(); crossings.len()];
    for d in &drafts {
        lines_per_crossing[d.i_crossing as usize].push(d.i_line);
    }
    for (i, touching) in lines_per_crossing.iter().enumerate() {
        crossings[i].n_lines = touching.iter().unique().count() as u32;
    }

    // Bucket drafts per line, preserving relative draft order within a line,
    // while remembering each draft's original index for opposite-pairing.
    let mut order: Vec<usize> = (0..drafts.len()).collect();
    order.sort_by_key(|&i| drafts[i].i_line);

    let mut line_crossings: Vec<LineCrossing> = Vec::with_capacity(drafts.len());
    let mut draft_to_lc: HashMap<usize, u32> = HashMap::new();

    let mut offset = 0u32;
    let mut cursor = 0usize;
    for (line_idx, line) in lines.iter_mut().enumerate() {
        line.i_first_crossing = offset;
        let start = cursor;
        while cursor < order.len() && drafts[order[cursor]].i_line == line_idx as u32 {
            cursor += 1;
        }
        let this_line = &order[start..cursor];
        line.n_crossings = this_line.len() as u32;
        for &draft_idx in this_line {
            let d = &drafts[draft_idx];
            let lc_idx = line_crossings.len() as u32;
            line_crossings.push(LineCrossing {
                i_crossing: d.i_crossing,
                i_line: d.i_line,
                i_opposite: 0, // patched below
                line_pos: d.line_pos,
            });
            draft_to_lc.insert(draft_idx, lc_idx);
        }
        offset += this_line.len() as u32;
    }

    for record_id in 0..records.len() {
        let (d0, d1) = (record_id * 2, record_id * 2 + 1);
        if let (Some(&lc0), Some(&lc1)) = (draft_to_lc.get(&d0), draft_to_lc.get(&d1)) {
            line_crossings[lc0 as usize].i_opposite = lc1;
            line_crossings[lc1 as usize].i_opposite = lc0;
        }
    }

    (crossings, line_crossings)
}

fn attach_point(local: Point2, segments: &[(Point2, Point2)], tree: &SphereTree) -> NetworkPoint {
    match tree.get_closest_line(segments, local) {
        Some((line_idx, dist, pos)) => NetworkPoint {
            coords: local,
            dist_from_line: dist,
            line_pos: pos,
            i_line: Some(line_idx),
        },
        None => NetworkPoint::unattached(local),
    }
}

fn bucket_points_per_line(lines: &mut [Line], points: &[NetworkPoint]) -> Vec<u32> {
    let mut per_line: Vec<Vec<u32>> = vec![Vec::new(); lines.len()];
    for (idx, p) in points.iter().enumerate() {
        if let Some(line) = p.i_line {
            per_line[line as usize].push(idx as u32);
        }
    }
    let mut flat = Vec::with_capacity(points.len());
    for (line_idx, line) in lines.iter_mut().enumerate() {
        line.i_first_point = flat.len() as u32;
        line.n_points = per_line[line_idx].len() as u32;
        flat.extend_from_slice(&per_line[line_idx]);
    }
    flat
}

fn build_point_groups(
    polygons: &[Polygon],
    interval: f32,
    segments: &[(Point2, Point2)],
    tree: &SphereTree,
    frame: &LocalFrame,
    points: &mut Vec<NetworkPoint>,
) -> Vec<Vec<u32>> {
    let mut groups = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        let sampled = polygon.sample_edge_points(interval.max(1e-3) as f64);
        let mut indices = Vec::with_capacity(sampled.len());
        for p in sampled {
            indices.push(points.len() as u32);
            points.push(attach_point(frame.world_to_local(p), segments, tree));
        }
        groups.push(indices);
    }
    groups
}
