pub mod background;
pub mod camera;
pub mod error;
pub mod lighting;
pub mod material;
pub mod math;
pub mod media;
pub mod object;
pub mod render;
pub mod scene;
pub mod tracer;

pub use error::RenderError;
pub use render::{render, CancelToken, Frame, Render, RenderStatus};
pub use scene::Scene;
pub use tracer::{TraceOptions, Tracer};
