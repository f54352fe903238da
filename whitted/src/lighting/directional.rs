use crate::{
    math::{Color, Vector3},
    scene::Scene,
};

use super::{transmitted_light, LightSource};

/// A directional light, which has no position, just a vector direction that is
/// true for all points in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Directional {
    /// The color of this light.
    pub color: Color,

    /// The unit direction the light travels in.
    pub orientation: Vector3,
}

impl Directional {
    /// Create a directional light. The orientation is normalized.
    pub fn new(color: Color, orientation: Vector3) -> Self {
        Self {
            color,
            orientation: orientation.normalize(),
        }
    }
}

impl LightSource for Directional {
    fn color(&self) -> Color {
        self.color
    }

    /// Infinitely far away, so there is no falloff.
    fn distance_attenuation(&self, _point: Vector3) -> f64 {
        1.
    }

    fn shadow_attenuation(&self, scene: &Scene, point: Vector3) -> Color {
        transmitted_light(scene, point, self.direction(point), self.color, None)
    }

    fn direction(&self, _point: Vector3) -> Vector3 {
        -self.orientation
    }
}
