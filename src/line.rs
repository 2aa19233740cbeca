use crate::coords::{orientation_angle_deg, Point2};

/// An axial line: one input segment of the network.
///
/// `iFirstPoint`/`nPoints` and `iFirstCrossing`/`nCrossings` are contiguous
/// ranges into the axial graph's auxiliary point-index and line-crossing
/// arrays (see `AxialGraph`).
#[derive(Clone, Copy, Debug)]
pub struct Line {
    pub p1: Point2,
    pub p2: Point2,
    pub length: f32,
    pub angle_deg: f32,
    pub i_first_point: u32,
    pub n_points: u32,
    pub i_first_crossing: u32,
    pub n_crossings: u32,
}

impl Line {
    pub fn new(p1: Point2, p2: Point2) -> Self {
        let length = p1.dist(p2);
        let angle_deg = orientation_angle_deg(p2.sub(p1));
        Line {
            p1,
            p2,
            length,
            angle_deg,
            i_first_point: 0,
            n_points: 0,
            i_first_crossing: 0,
            n_crossings: 0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.length <= f32::EPSILON
    }

    pub fn center(&self) -> Point2 {
        self.p1.lerp(self.p2, 0.5)
    }

    /// Point at parametric position `pos` (in length units, not `[0,1]`) along the line.
    pub fn point_at(&self, pos: f32) -> Point2 {
        if self.length <= f32::EPSILON {
            self.p1
        } else {
            self.p1.lerp(self.p2, pos / self.length)
        }
    }

    /// Parametric position of `p`'s projection onto the line, in length units.
    pub fn position_of(&self, p: Point2) -> f32 {
        if self.length <= f32::EPSILON {
            0.0
        } else {
            p.sub(self.p1).dot(self.p2.sub(self.p1)) / self.length
        }
    }
}
