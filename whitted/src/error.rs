use thiserror::Error;

/// Errors raised by the render driver and by loading image resources.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render an empty frame ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
