use std::ops::Mul;

use super::Vector3;

/// An affine transform: a 3x3 linear part plus a translation (`x`, `y`, `z`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
    pub m20: f64,
    pub m21: f64,
    pub m22: f64,
}

impl Matrix {
    /// Create a translation matrix.
    pub fn translation(v: Vector3) -> Self {
        Matrix {
            x: v.x,
            y: v.y,
            z: v.z,
            ..Default::default()
        }
    }

    /// Create a (possibly non-uniform) scale matrix.
    pub fn scale(s: Vector3) -> Self {
        Matrix {
            m00: s.x,
            m11: s.y,
            m22: s.z,
            ..Default::default()
        }
    }

    #[rustfmt::skip]
    fn euler_matrices(x: f64, y: f64, z: f64) -> (Self, Self, Self) {
        (
            Matrix { x: 0., y: 0., z: 0., m00: 1., m01: 0., m02: 0., m10: 0., m11: x.cos(), m12: -x.sin(), m20: 0., m21: x.sin(), m22: x.cos() },
            Matrix { x: 0., y: 0., z: 0., m00: y.cos(), m01: 0., m02: y.sin(), m10: 0., m11: 1., m12: 0., m20: -y.sin(), m21: 0., m22: y.cos() },
            Matrix { x: 0., y: 0., z: 0., m00: z.cos(), m01: -z.sin(), m02: 0., m10: z.sin(), m11: z.cos(), m12: 0., m20: 0., m21: 0., m22: 1. },
        )
    }

    /// Create a new rotation matrix from Euler angles (radians) applied in XYZ order.
    pub fn from_euler_xyz(x: f64, y: f64, z: f64) -> Self {
        let (a, b, c) = Self::euler_matrices(x, y, z);
        a * b * c
    }

    /// Get the rowed components of this matrix.
    #[rustfmt::skip]
    pub fn rowed_components(self) -> [[f64; 4]; 4] {
        [
            [self.m00, self.m01, self.m02, self.x],
            [self.m10, self.m11, self.m12, self.y],
            [self.m20, self.m21, self.m22, self.z],
            [0., 0., 0., 1.],
        ]
    }

    /// The linear part transposed, with no translation.
    pub fn transpose_linear(self) -> Self {
        Matrix {
            x: 0.,
            y: 0.,
            z: 0.,
            m00: self.m00,
            m01: self.m10,
            m02: self.m20,
            m10: self.m01,
            m11: self.m11,
            m12: self.m21,
            m20: self.m02,
            m21: self.m12,
            m22: self.m22,
        }
    }

    /// Transform a direction. Translation is ignored.
    pub fn transform_vector(self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.m00 * v.x + self.m01 * v.y + self.m02 * v.z,
            self.m10 * v.x + self.m11 * v.y + self.m12 * v.z,
            self.m20 * v.x + self.m21 * v.y + self.m22 * v.z,
        )
    }

    /// Transform a position.
    pub fn transform_point(self, p: Vector3) -> Vector3 {
        self.transform_vector(p) + Vector3::new(self.x, self.y, self.z)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self {
            x: 0.,
            y: 0.,
            z: 0.,
            m00: 1.,
            m01: 0.,
            m02: 0.,
            m10: 0.,
            m11: 1.,
            m12: 0.,
            m20: 0.,
            m21: 0.,
            m22: 1.,
        }
    }
}

impl Mul for Matrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let a = self.rowed_components();
        let b = rhs.rowed_components();
        let mut o = [[0.; 4]; 4];

        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    o[i][j] += a[i][k] * b[k][j];
                }
            }
        }

        Self {
            x: o[0][3],
            y: o[1][3],
            z: o[2][3],
            m00: o[0][0],
            m01: o[0][1],
            m02: o[0][2],
            m10: o[1][0],
            m11: o[1][1],
            m12: o[1][2],
            m20: o[2][0],
            m21: o[2][1],
            m22: o[2][2],
        }
    }
}
