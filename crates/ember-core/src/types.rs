//! Planar point/vector types and polar conversions

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};

/// A 2D point or vector in surface pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn to_polar(self) -> Polar {
        cartesian_to_polar(self)
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
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
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

/// A vector in polar form: heading in radians and magnitude
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polar {
    pub angle: f32,
    pub magnitude: f32,
}

impl Polar {
    pub const fn new(angle: f32, magnitude: f32) -> Self {
        Self { angle, magnitude }
    }

    pub fn to_cartesian(self) -> Vec2 {
        polar_to_cartesian(self)
    }
}

/// `x = m·cos(a)`, `y = m·sin(a)`
pub fn polar_to_cartesian(p: Polar) -> Vec2 {
    let (sin, cos) = p.angle.sin_cos();
    Vec2 {
        x: p.magnitude * cos,
        y: p.magnitude * sin,
    }
}

/// Inverse of [`polar_to_cartesian`]; the angle lies in `(-π, π]`
pub fn cartesian_to_polar(v: Vec2) -> Polar {
    Polar {
        angle: v.y.atan2(v.x),
        magnitude: v.x.hypot(v.y),
    }
}

pub fn deg_to_rad(d: f32) -> f32 {
    d * (std::f32::consts::PI / 180.0)
}

pub fn rad_to_deg(r: f32) -> f32 {
    r * (180.0 / std::f32::consts::PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);

        assert_eq!(a + b, Vec2::new(5.0, 8.0));
        assert_eq!(b - a, Vec2::new(3.0, 4.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert!(((b - a).length() - 5.0).abs() < 1e-6);

        let mut c = a;
        c += b;
        c *= 0.5;
        assert_eq!(c, Vec2::new(2.5, 4.0));
    }

    #[test]
    fn test_polar_to_cartesian_axes() {
        let right = polar_to_cartesian(Polar::new(0.0, 3.0));
        assert!((right.x - 3.0).abs() < 1e-6);
        assert!(right.y.abs() < 1e-6);

        let down = polar_to_cartesian(Polar::new(FRAC_PI_2, 2.0));
        assert!(down.x.abs() < 1e-6);
        assert!((down.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_cartesian_to_polar() {
        let p = cartesian_to_polar(Vec2::new(-1.0, 0.0));
        assert!((p.angle - PI).abs() < 1e-6);
        assert!((p.magnitude - 1.0).abs() < 1e-6);

        let v = Vec2::new(3.0, -4.0);
        let back = v.to_polar().to_cartesian();
        assert!((back.x - v.x).abs() < 1e-5);
        assert!((back.y - v.y).abs() < 1e-5);
    }

    #[test]
    fn test_degree_conversions() {
        assert!((deg_to_rad(180.0) - PI).abs() < 1e-6);
        assert!((rad_to_deg(FRAC_PI_2) - 90.0).abs() < 1e-4);
    }
}
