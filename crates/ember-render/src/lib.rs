//! Ember Render - Drawing surfaces
//!
//! Two `Surface` implementations:
//! - `RasterSurface` — software canvas over an RGBA image, saved as PNG
//! - `RecordingSurface` — logs every call as a `DrawCommand`

mod raster;
mod recording;

pub use raster::{compose_row, save_row_png, RasterSurface};
pub use recording::{DrawCommand, PaintedCircle, RecordingSurface};
