use crate::{
    math::{Ray, Vector3},
    scene::EPSILON,
};

use super::{Hit, Intersect};

/// The half-extent of the unit box on every axis.
const HALF: f64 = 0.5;

/// An axis-aligned unit box centered at the origin. Size and placement come
/// from the object's transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cuboid;

fn axis_normal(axis: usize, sign: f64) -> Vector3 {
    match axis {
        0 => Vector3::new(sign, 0., 0.),
        1 => Vector3::new(0., sign, 0.),
        _ => Vector3::new(0., 0., sign),
    }
}

impl Intersect for Cuboid {
    /// Slab test against the three pairs of planes. When the ray starts inside
    /// the box the exit face is reported instead of the entry face behind it.
    fn intersect_local(&self, ray: &Ray) -> Option<Hit> {
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        let mut n_near = Vector3::zero();
        let mut n_far = Vector3::zero();

        for axis in 0..3 {
            let origin = ray.origin.axis(axis);
            let dir = ray.direction.axis(axis);

            if dir.abs() < EPSILON {
                // parallel to this pair of planes
                if !(-HALF..=HALF).contains(&origin) {
                    return None;
                }
                continue;
            }

            let mut t1 = (-HALF - origin) / dir;
            let mut t2 = (HALF - origin) / dir;
            let mut n1 = axis_normal(axis, -1.);
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
                n1 = -n1;
            }

            if t1 > t_near {
                t_near = t1;
                n_near = n1;
            }
            if t2 < t_far {
                t_far = t2;
                n_far = -n1;
            }

            // box is missed or is behind the ray
            if t_near > t_far || t_far < EPSILON {
                return None;
            }
        }

        // every axis was parallel; only a zero direction gets here
        if t_far.is_infinite() {
            return None;
        }

        if t_near > EPSILON {
            Some(Hit::new(t_near, n_near))
        } else {
            Some(Hit::new(t_far, n_far))
        }
    }
}
