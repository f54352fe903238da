use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use indicatif::ProgressBar;
use log::{debug, info, trace};
use rayon::prelude::*;

use crate::{
    error::RenderError,
    math::{Color, Vector3},
    tracer::Tracer,
};

/// A shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A finished (or partly finished) frame of linear colors, top row first.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Frame {
    fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vector3::zero(); width as usize * height as usize],
        }
    }

    /// The color at column `x`, row `y` from the top.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(self.pixel(x, y).to_rgb8())
        })
    }

    /// Write the frame out; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        self.to_image().save(path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Complete,

    /// The token was flipped mid-render. Rows that were never started are black.
    Cancelled { rows_traced: u32 },
}

#[derive(Debug, Clone)]
pub struct Render {
    pub frame: Frame,
    pub status: RenderStatus,
}

/// The image height matching the camera's aspect ratio, rounded to nearest.
pub fn height_for(width: u32, aspect_ratio: f64) -> u32 {
    (width as f64 / aspect_ratio + 0.5) as u32
}

/// Trace every pixel of a `width` x `height` frame, one scanline per task.
/// The token is polled before each scanline.
pub fn render(
    tracer: &Tracer,
    width: u32,
    height: u32,
    cancel: &CancelToken,
    progress: &ProgressBar,
) -> Result<Render, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyFrame { width, height });
    }

    info!("rendering {}x{} with {:?}", width, height, tracer.options());
    let start = Instant::now();

    let mut frame = Frame::black(width, height);
    let (w, h) = (width as f64, height as f64);

    let rows_traced = frame
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .map(|(j, row)| {
            if cancel.is_cancelled() {
                return false;
            }

            let y = (height as usize - 1 - j) as f64 / h;
            for (i, pixel) in row.iter_mut().enumerate() {
                *pixel = tracer.trace(i as f64 / w, y);
            }

            trace!("row {} done", j);
            progress.inc(1);
            true
        })
        .filter(|traced| *traced)
        .count() as u32;

    let status = if rows_traced < height {
        debug!("render cancelled after {} of {} rows", rows_traced, height);
        RenderStatus::Cancelled { rows_traced }
    } else {
        RenderStatus::Complete
    };

    info!(
        "traced {} rows in {:.2}s",
        rows_traced,
        start.elapsed().as_secs_f64()
    );

    Ok(Render { frame, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        material::Material,
        object::{Cuboid, SceneObject, Transform},
        scene::Scene,
        tracer::TraceOptions,
    };

    /// A white box filling the lower half of the default camera's view.
    fn half_scene() -> Scene {
        let transform =
            Transform::new(Vector3::new(0., -50.5, -1.), Vector3::zero(), Vector3::one() * 100.).unwrap();
        Scene {
            objects: vec![SceneObject::new(
                Cuboid,
                transform,
                Material {
                    ke: Vector3::one(),
                    ..Default::default()
                },
            )],
            ..Default::default()
        }
    }

    #[test]
    fn test_rows_are_top_down() {
        let scene = half_scene();
        let tracer = Tracer::new(&scene, TraceOptions::default());
        let render = render(&tracer, 4, 4, &CancelToken::new(), &ProgressBar::hidden()).unwrap();

        assert_eq!(render.status, RenderStatus::Complete);
        assert_eq!(render.frame.pixel(0, 0), Vector3::zero());
        assert_eq!(render.frame.pixel(3, 3), Vector3::one());

        let image = render.frame.to_image();
        assert_eq!(image.get_pixel(1, 3).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_empty_frame_is_an_error() {
        let scene = Scene::default();
        let tracer = Tracer::new(&scene, TraceOptions::default());
        let result = render(&tracer, 0, 10, &CancelToken::new(), &ProgressBar::hidden());
        assert!(matches!(
            result,
            Err(RenderError::EmptyFrame { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_cancelled_before_start_stays_black() {
        let scene = half_scene();
        let tracer = Tracer::new(&scene, TraceOptions::default());
        let cancel = CancelToken::new();
        cancel.clone().cancel();
        assert!(cancel.is_cancelled());

        let render = render(&tracer, 8, 8, &cancel, &ProgressBar::hidden()).unwrap();
        assert_eq!(render.status, RenderStatus::Cancelled { rows_traced: 0 });
        assert!(render.frame.pixels.iter().all(|c| c.is_zero()));
    }

    #[test]
    fn test_height_rounds_to_nearest() {
        assert_eq!(height_for(512, 1.), 512);
        assert_eq!(height_for(640, 16. / 9.), 360);
        assert_eq!(height_for(101, 2.), 51);
    }
}
