use std::path::Path;

use crate::{
    error::RenderError,
    math::{Color, Vector3},
};

/// Anything that can be shown behind the scene where rays escape. Sampled in
/// image-plane coordinates; black outside `[0, 1) x [0, 1)`.
pub trait Background: Send + Sync + std::fmt::Debug {
    fn sample(&self, u: f64, v: f64) -> Color;
}

fn in_unit_square(u: f64, v: f64) -> bool {
    (0. ..1.).contains(&u) && (0. ..1.).contains(&v)
}

/// A solid color background.
#[derive(Debug, Clone)]
pub struct SolidBackground(pub Color);

impl Background for SolidBackground {
    fn sample(&self, u: f64, v: f64) -> Color {
        if in_unit_square(u, v) {
            self.0
        } else {
            Vector3::zero()
        }
    }
}

/// A background image stretched over the image plane. `v = 0` is the bottom row.
#[derive(Debug, Clone)]
pub struct ImageBackground {
    tex: image::RgbImage,
}

impl ImageBackground {
    pub fn new(tex: image::RgbImage) -> Self {
        Self { tex }
    }

    /// Load a background from an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let tex = image::open(path)?.to_rgb8();
        Ok(Self::new(tex))
    }
}

impl Background for ImageBackground {
    fn sample(&self, u: f64, v: f64) -> Color {
        let (w, h) = (self.tex.width(), self.tex.height());
        if !in_unit_square(u, v) || w == 0 || h == 0 {
            return Vector3::zero();
        }

        let x = ((u * w as f64) as u32).min(w - 1);
        let y = (((1. - v) * h as f64) as u32).min(h - 1);
        (*self.tex.get_pixel(x, y)).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> ImageBackground {
        // top row red, bottom row blue
        let tex = image::RgbImage::from_fn(2, 2, |_, y| {
            if y == 0 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        ImageBackground::new(tex)
    }

    #[test]
    fn test_bottom_is_v_zero() {
        let bg = gradient();
        assert_eq!(bg.sample(0.25, 0.), Vector3::new(0., 0., 1.));
        assert_eq!(bg.sample(0.75, 0.99), Vector3::new(1., 0., 0.));
    }

    #[test]
    fn test_outside_unit_square_is_black() {
        let bg = gradient();
        assert_eq!(bg.sample(1., 0.5), Vector3::zero());
        assert_eq!(bg.sample(0.5, -0.01), Vector3::zero());
        assert_eq!(SolidBackground(Vector3::one()).sample(0.5, 1.), Vector3::zero());
        assert_eq!(SolidBackground(Vector3::one()).sample(0.5, 0.5), Vector3::one());
    }
}
