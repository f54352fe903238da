use super::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    /// Instantiate a new Ray. The direction is not normalized here; shading code
    /// expects it to be unit length for primary and secondary rays.
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// The point at parameter `t` along this ray.
    pub fn at(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Reflect this ray off of a position and a normal. The mirror direction
    /// does not depend on which way the normal faces.
    pub fn reflect(&self, pos: Vector3, normal: Vector3) -> Ray {
        let incoming = -self.direction;
        let dir = normal * (2. * normal.dot(incoming)) - incoming;
        Ray::new(pos, dir.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_at() {
        let r = Ray::new(Vector3::new(0., 0., -2.), Vector3::new(0., 0., 1.));
        assert_eq!(r.at(1.5), Vector3::new(0., 0., -0.5));
    }

    #[test]
    fn test_reflect_off_floor() {
        let r = Ray::new(Vector3::zero(), Vector3::new(1., -1., 0.).normalize());
        let out = r.reflect(Vector3::zero(), Vector3::up());
        let expected = Vector3::new(1., 1., 0.).normalize();
        assert_abs_diff_eq!(out.direction.x, expected.x, epsilon = 1e-12);
        assert_abs_diff_eq!(out.direction.y, expected.y, epsilon = 1e-12);
        assert_abs_diff_eq!(out.direction.z, 0., epsilon = 1e-12);

        // flipping the normal mirrors the same way
        let flipped = r.reflect(Vector3::zero(), -Vector3::up());
        assert_abs_diff_eq!(flipped.direction.y, expected.y, epsilon = 1e-12);
    }
}
