use std::time::Duration;

use crate::foundation::error::{StrataError, StrataResult};

pub use kurbo::{Point, Vec2};

/// Monotonic frame counter of a view.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The index following this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Create a validated frame rate.
    pub fn new(num: u32, den: u32) -> StrataResult<Self> {
        if den == 0 {
            return Err(StrataError::config("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(StrataError::config("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Length of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Length of one frame as a [`Duration`].
    pub fn frame_interval(self) -> Duration {
        Duration::from_secs_f64(self.frame_duration_secs())
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 50, den: 1 }
    }
}

/// Immutable 2D point or vector.
///
/// Rotations use screen coordinates (y grows downward), so positive degrees turn clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vector2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

#[allow(clippy::should_implement_trait)]
impl Vector2 {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a vector from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    pub fn add(self, b: Self) -> Self {
        Self::new(self.x + b.x, self.y + b.y)
    }

    /// The vector pointing the opposite way from the origin.
    pub fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }

    /// `self + (-b)`.
    pub fn sub(self, b: Self) -> Self {
        self.add(b.neg())
    }

    /// Rotate this point around `pivot` by `degrees`.
    pub fn rotate_around(self, pivot: Self, degrees: f64) -> Self {
        let angle = self.angle_from(pivot) + degrees.to_radians();
        let offset = Vec2::from_angle(angle) * self.distance(pivot);
        (pivot.to_point() + offset).into()
    }

    /// Direction of this point as seen from `pivot`, in radians.
    pub fn angle_from(self, pivot: Self) -> f64 {
        (self.to_point() - pivot.to_point()).atan2()
    }

    /// Euclidean distance to `pivot`.
    pub fn distance(self, pivot: Self) -> f64 {
        self.to_point().distance(pivot.to_point())
    }

    /// Both coordinates are strictly less than those of `p`.
    pub fn lt(self, p: Self) -> bool {
        self.x < p.x && self.y < p.y
    }

    /// Both coordinates are strictly greater than those of `p`.
    pub fn gt(self, p: Self) -> bool {
        self.x > p.x && self.y > p.y
    }

    /// Convert to a `kurbo` point.
    pub fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Convert to a `kurbo` vector.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Point> for Vector2 {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl std::ops::Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector2::add(self, rhs)
    }
}

impl std::ops::Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Vector2::sub(self, rhs)
    }
}

impl std::ops::Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Vector2::neg(self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
