//! Local single-precision coordinate space and the bridge back to the
//! caller's double-precision world frame.
//!
//! All graph geometry after construction lives in `Point2` (`f32`) local
//! coordinates, centred on the input bounding box, to keep nearest-line and
//! intersection arithmetic well-conditioned regardless of how far the
//! caller's data sits from the world origin.

use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Point2 { x, y }
    }

    pub fn sub(self, other: Point2) -> Point2 {
        Point2::new(self.x - other.x, self.y - other.y)
    }

    pub fn add(self, other: Point2) -> Point2 {
        Point2::new(self.x + other.x, self.y + other.y)
    }

    pub fn scale(self, s: f32) -> Point2 {
        Point2::new(self.x * s, self.y * s)
    }

    pub fn dot(self, other: Point2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Point2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn dist(self, other: Point2) -> f32 {
        self.sub(other).length()
    }

    pub fn dist_sq(self, other: Point2) -> f32 {
        self.sub(other).length_sq()
    }

    pub fn lerp(self, other: Point2, t: f32) -> Point2 {
        self.add(other.sub(self).scale(t))
    }
}

/// Orientation angle of a direction vector in degrees, normalised to `[0, 360)`.
pub fn orientation_angle_deg(v: Point2) -> f32 {
    let mut deg = v.y.atan2(v.x).to_degrees();
    if deg < 0.0 {
        deg += 360.0;
    }
    deg
}

/// Smallest signed difference `b - a` folded into `(-180, 180]` degrees.
pub fn angle_diff_deg(a: f32, b: f32) -> f32 {
    let mut d = (b - a) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

pub fn deg_to_rad(deg: f32) -> f32 {
    deg * PI / 180.0
}

#[derive(Clone, Copy, Debug)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    pub fn empty() -> Self {
        Rect {
            min: Point2::new(f32::MAX, f32::MAX),
            max: Point2::new(f32::MIN, f32::MIN),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn center(&self) -> Point2 {
        Point2::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn diagonal(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.min.dist(self.max)
        }
    }

    pub fn overlaps_circle(&self, center: Point2, radius: f32) -> bool {
        let cx = center.x.clamp(self.min.x, self.max.x);
        let cy = center.y.clamp(self.min.y, self.max.y);
        Point2::new(cx, cy).dist_sq(center) <= radius * radius
    }

    pub fn contains_point(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Maps between the caller's double-precision world coordinates and the
/// graph's local single-precision frame, centred on the input bounding box.
#[derive(Clone, Copy, Debug)]
pub struct LocalFrame {
    pub world_origin: (f64, f64),
}

impl LocalFrame {
    pub fn from_world_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> (LocalFrame, Rect) {
        let mut world_min = (f64::MAX, f64::MAX);
        let mut world_max = (f64::MIN, f64::MIN);
        let mut any = false;
        for (x, y) in points {
            any = true;
            world_min.0 = world_min.0.min(x);
            world_min.1 = world_min.1.min(y);
            world_max.0 = world_max.0.max(x);
            world_max.1 = world_max.1.max(y);
        }
        if !any {
            return (
                LocalFrame {
                    world_origin: (0.0, 0.0),
                },
                Rect::empty(),
            );
        }
        let origin = (
            (world_min.0 + world_max.0) * 0.5,
            (world_min.1 + world_max.1) * 0.5,
        );
        let frame = LocalFrame { world_origin: origin };
        let mut bounds = Rect::empty();
        bounds.expand(frame.world_to_local(world_min));
        bounds.expand(frame.world_to_local(world_max));
        (frame, bounds)
    }

    pub fn world_to_local(&self, p: (f64, f64)) -> Point2 {
        Point2::new(
            (p.0 - self.world_origin.0) as f32,
            (p.1 - self.world_origin.1) as f32,
        )
    }

    pub fn local_to_world(&self, p: Point2) -> (f64, f64) {
        (
            p.x as f64 + self.world_origin.0,
            p.y as f64 + self.world_origin.1,
        )
    }
}

/// Solves for the intersection parameters `(t0, t1)` of two segments
/// `a0->a1` and `b0->b1`, each in `[0, 1]` when the segments actually cross.
pub fn segment_intersection(a0: Point2, a1: Point2, b0: Point2, b1: Point2) -> Option<(f32, f32, Point2)> {
    let r = a1.sub(a0);
    let s = b1.sub(b0);
    let denom = r.cross(s);
    if denom.abs() < 1e-9 {
        return None;
    }
    let qp = b0.sub(a0);
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((t, u, a0.add(r.scale(t))))
    } else {
        None
    }
}
