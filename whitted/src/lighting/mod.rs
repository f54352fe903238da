mod ambient;
mod directional;
mod point;

use enum_dispatch::enum_dispatch;

use crate::{
    math::{Color, Ray, Vector3},
    scene::{Scene, EPSILON},
};

pub use ambient::*;
pub use directional::*;
pub use point::*;

/// What every light exposes to the shading model.
#[enum_dispatch]
pub trait LightSource {
    /// The color of this light.
    fn color(&self) -> Color;

    /// Falloff with distance from the light, in 0-1.
    fn distance_attenuation(&self, point: Vector3) -> f64;

    /// The light color reaching `point` after passing the scene's geometry.
    /// Opaque occluders block it fully; transparent ones tint it by `kt`.
    fn shadow_attenuation(&self, scene: &Scene, point: Vector3) -> Color;

    /// Unit vector from `point` toward the light.
    fn direction(&self, point: Vector3) -> Vector3;
}

/// A light in the scene. Variants are dispatched by tag.
#[enum_dispatch(LightSource)]
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Ambient,
    Directional,
    Point,
}

impl Light {
    /// Ambient lights only feed the scene's ambient term.
    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient(_))
    }
}

/// March a shadow ray from `point` along `dir`, tinting `color` by every other
/// transparent surface it crosses. The toggle keeps the entry and exit faces of
/// one transparent object from both attenuating. With `light_distance` set, hits
/// beyond the light are ignored.
pub(crate) fn transmitted_light(
    scene: &Scene,
    point: Vector3,
    dir: Vector3,
    color: Color,
    light_distance: Option<f64>,
) -> Color {
    let mut result = color;
    let mut ray = Ray::new(point, dir);
    let mut remaining = light_distance;
    let mut second_face = false;

    while let Some(hit) = scene.intersect(&ray) {
        if let Some(remaining) = remaining.as_mut() {
            *remaining -= hit.t;
            if *remaining < EPSILON {
                // occluder sits behind the light
                return result;
            }
        }

        if !hit.material.is_transmissive() {
            return Vector3::zero();
        }

        ray = Ray::new(ray.at(hit.t) + dir * EPSILON, dir);
        if let Some(remaining) = remaining.as_mut() {
            *remaining -= EPSILON;
        }

        if !second_face {
            result *= hit.material.kt;
        }
        second_face = !second_face;
    }

    result
}
