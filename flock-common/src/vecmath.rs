use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A simple 2D vector struct.
///
/// The in-place operations (`normalize`, `limit`, `set_magnitude`, `divide`)
/// never divide by an exact zero: the vector is left unchanged instead.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2.
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Creates a zero vector.
    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Calculates the length (magnitude) of the vector.
    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Calculates the Euclidean distance to another vector (point).
    pub fn distance(&self, other: Vec2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns the vector scaled by a scalar value.
    pub fn scale(&self, scalar: f32) -> Self {
        Vec2 { x: self.x * scalar, y: self.y * scalar }
    }

    /// Divides both components by `n` in place. No-op when `n` is exactly zero.
    pub fn divide(&mut self, n: f32) {
        if n != 0.0 {
            self.x /= n;
            self.y /= n;
        }
    }

    /// Rescales the vector to unit length in place. The zero vector stays zero.
    pub fn normalize(&mut self) {
        let m = self.length();
        self.divide(m);
    }

    /// Clamps the magnitude to `max`, keeping the direction.
    pub fn limit(&mut self, max: f32) {
        if self.length() > max {
            self.normalize();
            *self = self.scale(max);
        }
    }

    /// Normalizes then scales to `n`. No-op on the zero vector.
    pub fn set_magnitude(&mut self, n: f32) {
        if self.length() != 0.0 {
            self.normalize();
            *self = self.scale(n);
        }
    }

    /// Angle of the vector in radians, measured from the +x axis.
    pub fn heading(&self) -> f32 {
        vec_to_angle(*self)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        self.scale(scalar)
    }
}

/// Converts an angle (in radians) to a unit vector.
pub fn angle_to_vec(angle_rad: f32) -> Vec2 {
    Vec2::new(angle_rad.cos(), angle_rad.sin())
}

/// Converts a vector to an angle (in radians).
/// Uses atan2 for quadrant correctness.
pub fn vec_to_angle(vec: Vec2) -> f32 {
    vec.y.atan2(vec.x)
}
