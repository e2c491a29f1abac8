//! 2D point math and axis-aligned bounds.
//!
//! Every operation returns a new value; nothing mutates through a shared
//! reference, so a position can be stored in several places safely.
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 2D point/vector value type.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Vec2 {
    /// The origin.
    pub const ZERO: Self = Self::new(0., 0.);

    /// Create a new value.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Length of the vector.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    pub fn distance(self, rhs: Self) -> f64 {
        (rhs - self).length()
    }

    /// Dot product.
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Unit vector with the same direction. The zero vector is unchanged.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0. {
            self / len
        } else {
            self
        }
    }

    /// Linear interpolation toward another point.
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        self + (rhs - self) * t
    }

    /// Offset by a distance `d0` along the direction `a0`.
    pub fn pla(self, d0: f64, a0: f64) -> Self {
        Self::new(self.x + d0 * a0.cos(), self.y + d0 * a0.sin())
    }

    /// Direction angle toward another point.
    ///
    /// Coincident points give `atan2(0, 0)`, which is zero. The chain
    /// solver relies on this staying deterministic.
    pub fn angle_to(self, rhs: Self) -> f64 {
        (rhs.y - self.y).atan2(rhs.x - self.x)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// An axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    /// Lower corner
    pub min: Vec2,
    /// Upper corner
    pub max: Vec2,
}

impl Bounds {
    /// A zero-size box at a single point.
    pub const fn from_point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    /// Grow to include a point.
    pub fn expand(&mut self, p: Vec2) {
        self.min = Vec2::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Vec2::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    /// The smallest box covering both boxes.
    pub fn union(mut self, rhs: Self) -> Self {
        self.expand(rhs.min);
        self.expand(rhs.max);
        self
    }

    /// Grow by a margin on every side.
    pub fn pad(self, margin: f64) -> Self {
        let m = Vec2::new(margin, margin);
        Self { min: self.min - m, max: self.max + m }
    }

    /// Center of the box.
    pub fn center(self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Extent on the X axis.
    pub fn width(self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent on the Y axis.
    pub fn height(self) -> f64 {
        self.max.y - self.min.y
    }
}
