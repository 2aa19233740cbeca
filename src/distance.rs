//! Distance metrics and per-metric radius caps (§3 "Distance metrics",
//! §6 "Radii").

/// The distance metrics the bounded-BFS and shortest-path engines can track
/// simultaneously (up to 4 active at once, per §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DistanceType {
    Straight,
    Walking,
    Steps,
    Angular,
    Axmeter,
    Weights,
}

/// A bundle of per-distance-type radius caps. A `None` cap means the metric
/// is disabled / unbounded (`+inf`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Radii {
    pub straight: Option<f64>,
    pub walking: Option<f64>,
    pub steps: Option<u32>,
    pub angular: Option<f64>,
    pub axmeter: Option<f64>,
}

impl Radii {
    pub fn unbounded() -> Self {
        Radii::default()
    }

    pub fn straight(r: f64) -> Self {
        Radii {
            straight: Some(r),
            ..Radii::default()
        }
    }

    pub fn is_active(&self, dt: DistanceType) -> bool {
        match dt {
            DistanceType::Straight => self.straight.is_some(),
            DistanceType::Walking => self.walking.is_some(),
            DistanceType::Steps => self.steps.is_some(),
            DistanceType::Angular => self.angular.is_some(),
            DistanceType::Axmeter => self.axmeter.is_some(),
            DistanceType::Weights => false,
        }
    }

    pub fn any_active(&self) -> bool {
        self.straight.is_some()
            || self.walking.is_some()
            || self.steps.is_some()
            || self.angular.is_some()
            || self.axmeter.is_some()
    }

    /// True when the only active cap is the straight-line radius. Several
    /// kernels (reach, attraction-distance) special-case this into a
    /// brute-force Euclidean sweep instead of a full graph traversal.
    pub fn straight_line_only(&self) -> bool {
        self.straight.is_some()
            && self.walking.is_none()
            && self.steps.is_none()
            && self.angular.is_none()
            && self.axmeter.is_none()
    }

    pub fn to_limits(&self) -> Limits {
        let mut mask = 0u32;
        if self.straight.is_some() {
            mask |= Limits::MASK_STRAIGHT;
        }
        if self.walking.is_some() {
            mask |= Limits::MASK_WALKING;
        }
        if self.steps.is_some() {
            mask |= Limits::MASK_TURNS;
        }
        if self.angular.is_some() {
            mask |= Limits::MASK_ANGLE;
        }
        if self.axmeter.is_some() {
            mask |= Limits::MASK_AXMETER;
        }
        Limits {
            mask,
            straight_sqr: self.straight.map(|s| (s * s) as f32).unwrap_or(f32::MAX),
            walking: self.walking.unwrap_or(f64::MAX) as f32,
            turns: self.steps.map(|s| s as i32).unwrap_or(i32::MAX),
            angle: self.angular.unwrap_or(f64::MAX) as f32,
            axmeter: self.axmeter.unwrap_or(f64::MAX) as f32,
        }
    }

    pub fn from_limits(limits: &Limits) -> Self {
        Radii {
            straight: (limits.mask & Limits::MASK_STRAIGHT != 0)
                .then(|| (limits.straight_sqr as f64).sqrt()),
            walking: (limits.mask & Limits::MASK_WALKING != 0).then(|| limits.walking as f64),
            steps: (limits.mask & Limits::MASK_TURNS != 0).then(|| limits.turns as u32),
            angular: (limits.mask & Limits::MASK_ANGLE != 0).then(|| limits.angle as f64),
            axmeter: (limits.mask & Limits::MASK_AXMETER != 0).then(|| limits.axmeter as f64),
        }
    }
}

/// Legacy bit-mask radius representation, kept only for the
/// `Radii <-> Limits` round-trip (testable property 8).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    pub mask: u32,
    pub straight_sqr: f32,
    pub walking: f32,
    pub turns: i32,
    pub angle: f32,
    pub axmeter: f32,
}

impl Limits {
    pub const MASK_STRAIGHT: u32 = 0x01;
    pub const MASK_WALKING: u32 = 0x02;
    pub const MASK_TURNS: u32 = 0x04;
    pub const MASK_ANGLE: u32 = 0x08;
    pub const MASK_AXMETER: u32 = 0x10;
}
