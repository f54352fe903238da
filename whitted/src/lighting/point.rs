use crate::{
    math::{Color, Vector3},
    scene::Scene,
};

use super::{transmitted_light, LightSource};

/// A point light, which is a light that emits in all directions from a specified position.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    /// The color of this light.
    pub color: Color,

    /// The position in space of this light.
    pub position: Vector3,

    /// Constant term of the attenuation polynomial.
    pub constant: f64,

    /// Linear term of the attenuation polynomial.
    pub linear: f64,

    /// Quadratic term of the attenuation polynomial.
    pub quadratic: f64,
}

impl Default for Point {
    fn default() -> Self {
        Self {
            color: Vector3::one(),
            position: Vector3::zero(),
            constant: 1.,
            linear: 0.,
            quadratic: 0.,
        }
    }
}

impl Point {
    pub fn new(color: Color, position: Vector3) -> Self {
        Self {
            color,
            position,
            ..Default::default()
        }
    }

    /// Set the constant, linear and quadratic attenuation coefficients.
    pub fn with_attenuation(mut self, constant: f64, linear: f64, quadratic: f64) -> Self {
        self.constant = constant;
        self.linear = linear;
        self.quadratic = quadratic;
        self
    }
}

impl LightSource for Point {
    fn color(&self) -> Color {
        self.color
    }

    /// `1 / (c0 + c1 d + c2 d^2)`, never above 1.
    fn distance_attenuation(&self, point: Vector3) -> f64 {
        let d = (point - self.position).magnitude();
        let coeff = self.constant + self.linear * d + self.quadratic * d * d;
        if coeff > 1. {
            1. / coeff
        } else {
            1.
        }
    }

    fn shadow_attenuation(&self, scene: &Scene, point: Vector3) -> Color {
        let distance = (self.position - point).magnitude();
        transmitted_light(
            scene,
            point,
            self.direction(point),
            self.color,
            Some(distance),
        )
    }

    fn direction(&self, point: Vector3) -> Vector3 {
        (self.position - point).normalize()
    }
}
