use crate::{
    math::{Color, Vector3},
    scene::Scene,
};

use super::LightSource;

/// An ambient light. It is never occluded and has no meaningful direction; its
/// color is folded into the scene's ambient term.
#[derive(Debug, Clone, PartialEq)]
pub struct Ambient {
    pub color: Color,
}

impl Ambient {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl LightSource for Ambient {
    fn color(&self) -> Color {
        self.color
    }

    fn distance_attenuation(&self, _point: Vector3) -> f64 {
        1.
    }

    fn shadow_attenuation(&self, _scene: &Scene, _point: Vector3) -> Color {
        Vector3::one()
    }

    fn direction(&self, _point: Vector3) -> Vector3 {
        Vector3::one().normalize()
    }
}
