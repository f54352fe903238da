use crate::{math::Ray, scene::EPSILON};

use super::{Hit, Intersect};

/// A sphere of radius 0.5 centered at the origin, matching the unit box. Radius
/// and placement come from the object's transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

const RADIUS: f64 = 0.5;

impl Intersect for Sphere {
    fn intersect_local(&self, ray: &Ray) -> Option<Hit> {
        let a = ray.direction.dot(ray.direction);
        let b = ray.origin.dot(ray.direction);
        let c = ray.origin.dot(ray.origin) - RADIUS * RADIUS;

        let discriminant = b * b - a * c;
        if discriminant < 0. {
            return None;
        }

        let root = discriminant.sqrt();
        let near = (-b - root) / a;
        let far = (-b + root) / a;

        // prefer the near root, fall back to the far one when starting inside
        let t = if near > EPSILON {
            near
        } else if far > EPSILON {
            far
        } else {
            return None;
        };

        Some(Hit::new(t, ray.at(t).normalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_outside_hit() {
        let ray = Ray::new(Vector3::new(0., 0., -2.), Vector3::new(0., 0., 1.));
        let hit = Sphere.intersect_local(&ray).unwrap();
        assert_abs_diff_eq!(hit.t, 1.5);
        assert_eq!(hit.normal, Vector3::new(0., 0., -1.));
    }

    #[test]
    fn test_inside_hit_keeps_outward_normal() {
        let ray = Ray::new(Vector3::zero(), Vector3::new(0., 1., 0.));
        let hit = Sphere.intersect_local(&ray).unwrap();
        assert_abs_diff_eq!(hit.t, 0.5);
        assert_eq!(hit.normal, Vector3::new(0., 1., 0.));
    }

    #[test]
    fn test_miss() {
        let ray = Ray::new(Vector3::new(0., 1., -2.), Vector3::new(0., 0., 1.));
        assert!(Sphere.intersect_local(&ray).is_none());
        let behind = Ray::new(Vector3::new(0., 0., 2.), Vector3::new(0., 0., 1.));
        assert!(Sphere.intersect_local(&behind).is_none());
    }
}
