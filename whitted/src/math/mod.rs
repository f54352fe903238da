mod matrix;
mod ray;
mod vector;

pub use matrix::*;
pub use ray::*;
pub use vector::*;

/// The result of bending a direction across an interface between two media.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Refraction {
    /// The transmitted direction, not normalized.
    Transmitted(Vector3),

    /// The sine of the transmitted angle exceeds one; no ray leaves the surface.
    TotalInternalReflection,
}

/// Bend `incoming` (unit length) through a surface whose `normal` faces the
/// incoming side, using Snell's law with `nr = n_from / n_to`.
pub fn refract(incoming: Vector3, normal: Vector3, nr: f64) -> Refraction {
    let toward = -incoming;
    let cos_i = normal.dot(toward).clamp(-1., 1.);
    let sin_i = (1. - cos_i * cos_i).sqrt();
    let sin_t = sin_i * nr;
    if sin_t > 1. {
        return Refraction::TotalInternalReflection;
    }

    let cos_t = (1. - sin_t * sin_t).sqrt();
    Refraction::Transmitted(normal * (nr * cos_i - cos_t) - toward * nr)
}
