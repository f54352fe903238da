use crate::math::{Ray, Vector3};

/// A pinhole camera. Maps normalized image-plane coordinates to world rays.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    eye: Vector3,
    look: Vector3,
    u: Vector3,
    v: Vector3,
    fov: f64,
    aspect_ratio: f64,
}

impl Default for Camera {
    /// Looking down `-z` from the origin with a 53.13 degree field of view, which
    /// gives an image plane of height 1 at distance 1.
    fn default() -> Self {
        Self::new(
            Vector3::zero(),
            Vector3::new(0., 0., -1.),
            Vector3::up(),
            53.13,
            1.,
        )
    }
}

impl Camera {
    /// Build a camera at `eye` looking at `look_at`. `fov` is the vertical field
    /// of view in degrees, `aspect_ratio` is width over height.
    pub fn new(eye: Vector3, look_at: Vector3, up: Vector3, fov: f64, aspect_ratio: f64) -> Self {
        let look = (look_at - eye).normalize();
        let right = look.cross(up).normalize();
        let true_up = right.cross(look);

        let normalized_height = 2. * (fov.to_radians() * 0.5).tan();

        Self {
            eye,
            look,
            u: right * (normalized_height * aspect_ratio),
            v: true_up * normalized_height,
            fov,
            aspect_ratio,
        }
    }

    /// The primary ray through `(x, y)` in 0-1, with `y = 0` at the bottom.
    pub fn ray_through(&self, x: f64, y: f64) -> Ray {
        let dir = self.look + self.u * (x - 0.5) + self.v * (y - 0.5);
        Ray::new(self.eye, dir.normalize())
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn eye(&self) -> Vector3 {
        self.eye
    }

    /// Project a direction back onto the image plane. `None` when it points
    /// behind the camera.
    pub fn project(&self, direction: Vector3) -> Option<(f64, f64)> {
        let l = direction.dot(self.look);
        if l <= 0. {
            return None;
        }

        let du = direction.dot(self.u) / self.u.dot(self.u);
        let dv = direction.dot(self.v) / self.v.dot(self.v);
        Some((du / l + 0.5, dv / l + 0.5))
    }
}
