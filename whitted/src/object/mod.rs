mod cuboid;
mod plane;
mod sphere;

use std::fmt;

use crate::{
    material::Material,
    math::{Matrix, Ray, Vector3},
};

pub use cuboid::*;
pub use plane::*;
pub use sphere::*;

/// The result of a ray intersection in a primitive's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Ray parameter of the hit, always greater than `EPSILON`.
    pub t: f64,

    /// Unit outward normal, per the primitive's convention. It is not flipped to
    /// face the ray origin.
    pub normal: Vector3,
}

impl Hit {
    pub fn new(t: f64, normal: Vector3) -> Self {
        Self { t, normal }
    }
}

/// A trait that represents any primitive that can be intersected by a Ray in its
/// own object space.
pub trait Intersect: fmt::Debug + Send + Sync {
    /// Find the nearest intersection with `t > EPSILON`, if any. The ray
    /// direction is unit length.
    fn intersect_local(&self, ray: &Ray) -> Option<Hit>;
}

/// Placement of a primitive in the world: translate * rotate * scale. Only the
/// world-to-local matrix is kept; normals go back through its transpose.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    to_local: Matrix,
}

impl Transform {
    /// Build a transform from a translation, XYZ Euler rotation in radians, and scale.
    /// Returns `None` when a scale component is zero or not finite.
    pub fn new(translate: Vector3, rotate: Vector3, scale: Vector3) -> Option<Self> {
        let degenerate = |s: f64| s == 0. || !s.is_finite();
        if degenerate(scale.x) || degenerate(scale.y) || degenerate(scale.z) {
            return None;
        }

        let rotation = Matrix::from_euler_xyz(rotate.x, rotate.y, rotate.z);
        let to_local = Matrix::scale(Vector3::one() / scale)
            * rotation.transpose_linear()
            * Matrix::translation(-translate);

        Some(Self { to_local })
    }

    pub fn translation(translate: Vector3) -> Self {
        Self {
            to_local: Matrix::translation(-translate),
        }
    }

    /// Move a world ray into local space. The local direction is normalized;
    /// the returned factor converts a local ray parameter back to world units.
    /// `None` when the direction has no length.
    pub fn ray_to_local(&self, ray: &Ray) -> Option<(Ray, f64)> {
        let direction = self.to_local.transform_vector(ray.direction);
        let length = direction.magnitude();
        if length == 0. || !length.is_finite() {
            return None;
        }

        let local = Ray::new(self.to_local.transform_point(ray.origin), direction / length);
        Some((local, 1. / length))
    }

    /// Move a local normal into world space with the inverse transpose.
    pub fn normal_to_world(&self, normal: Vector3) -> Vector3 {
        self.to_local
            .transpose_linear()
            .transform_vector(normal)
            .normalize()
    }
}

/// A primitive placed in the scene with a material.
#[derive(Debug)]
pub struct SceneObject {
    pub shape: Box<dyn Intersect>,
    pub transform: Transform,
    pub material: Material,
}

impl SceneObject {
    pub fn new(shape: impl Intersect + 'static, transform: Transform, material: Material) -> Self {
        Self {
            shape: Box::new(shape),
            transform,
            material,
        }
    }

    /// Intersect a world-space ray with this object.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let (local, to_world) = self.transform.ray_to_local(ray)?;
        let hit = self.shape.intersect_local(&local)?;

        Some(Intersection {
            t: hit.t * to_world,
            normal: self.transform.normal_to_world(hit.normal),
            material: &self.material,
            object: self,
        })
    }
}

/// A world-space intersection, borrowed from the scene that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'s> {
    pub t: f64,
    pub normal: Vector3,
    pub material: &'s Material,
    pub object: &'s SceneObject,
}

impl Intersection<'_> {
    /// The world position of this hit along `ray`.
    pub fn point(&self, ray: &Ray) -> Vector3 {
        ray.at(self.t)
    }
}
