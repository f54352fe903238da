use crate::{
    math::{Ray, Vector3},
    scene::EPSILON,
};

use super::{Hit, Intersect};

/// The infinite plane `y = 0`, facing `+y`. Orientation and placement come from
/// the object's transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plane;

impl Intersect for Plane {
    fn intersect_local(&self, ray: &Ray) -> Option<Hit> {
        let denom = ray.direction.y;
        if denom.abs() < EPSILON {
            return None;
        }

        let t = -ray.origin.y / denom;
        if t > EPSILON {
            Some(Hit::new(t, Vector3::up()))
        } else {
            None
        }
    }
}
