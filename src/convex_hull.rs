//! Andrew's monotone-chain convex hull, used by `reach` to bound the area of
//! reached segment endpoints (§4.J).

use crate::coords::Point2;

fn cross(o: Point2, a: Point2, b: Point2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Builds the convex hull of `points`, which must be pre-sorted by
/// `(x, y)` with duplicates removed (per §4.J). Returns hull vertices in
/// counter-clockwise order.
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut lower: Vec<Point2> = Vec::with_capacity(n);
    for &p in points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2> = Vec::with_capacity(n);
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Shoelace-formula area of a simple polygon's vertices (ordered, not
/// necessarily a hull).
pub fn polygon_area(vertices: &[Point2]) -> f32 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0f32;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    (sum * 0.5).abs()
}

/// Sorts and deduplicates points (by exact coordinate) before hulling, as
/// the monotone-chain construction requires.
pub fn prepare_points(mut points: Vec<Point2>) -> Vec<Point2> {
    points.sort_by(|a, b| (a.x, a.y).partial_cmp(&(b.x, b.y)).unwrap());
    points.dedup_by(|a, b| a.x == b.x && a.y == b.y);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn square_hull_area() {
        let points = prepare_points(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
        ]);
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        assert_approx_eq!(polygon_area(&hull) as f64, 4.0, 1e-4);
    }

    #[test]
    fn fewer_than_three_points_is_degenerate() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
        assert_eq!(convex_hull(&points).len(), 2);
        assert_eq!(polygon_area(&points), 0.0);
    }
}
