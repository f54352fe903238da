use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub};

/// A vector in 3D space. Also used as a linear RGB color.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A linear RGB color, nominally within 0-1 per channel.
pub type Color = Vector3;

impl Vector3 {
    /// Instantiate a new Vector3.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0., 0., 0.)
    }

    pub const fn one() -> Self {
        Self::new(1., 1., 1.)
    }

    pub const fn up() -> Self {
        Self::new(0., 1., 0.)
    }

    /// Find the dot product between two Vector3s.
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross two Vector3s.
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: -self.x * other.z + self.z * other.x,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Find the magnitude of this Vector3.
    pub fn magnitude(self) -> f64 {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    /// Normalize this Vector3 by dividing it by its own magnitude.
    pub fn normalize(self) -> Self {
        self / self.magnitude()
    }

    /// Clamp every component into 0-1.
    pub fn clamp01(self) -> Self {
        Self {
            x: self.x.clamp(0., 1.),
            y: self.y.clamp(0., 1.),
            z: self.z.clamp(0., 1.),
        }
    }

    /// Whether every component is exactly zero.
    pub fn is_zero(self) -> bool {
        self.x == 0. && self.y == 0. && self.z == 0.
    }

    /// Component by axis index, 0 through 2.
    pub fn axis(self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Convert a color to a 24-bit RGB triple, truncating after scaling.
    pub fn to_rgb8(self) -> [u8; 3] {
        let c = self.clamp01();
        [(c.x * 255.) as u8, (c.y * 255.) as u8, (c.z * 255.) as u8]
    }
}

impl From<image::Rgb<u8>> for Vector3 {
    fn from(rgb: image::Rgb<u8>) -> Self {
        let [r, g, b] = rgb.0;
        Self::new(r as f64 / 255., g as f64 / 255., b as f64 / 255.)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x * rhs.x,
            y: self.y * rhs.y,
            z: self.z * rhs.z,
        }
    }
}

impl MulAssign for Vector3 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Self::Output {
        rhs * self
    }
}

impl Div for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x / rhs.x,
            y: self.y / rhs.y,
            z: self.z / rhs.z,
        }
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}
