//! The 2D drawing surface particles are painted onto

use crate::color::Color;
use crate::types::Vec2;

/// Canvas-style immediate-mode drawing surface.
///
/// Mirrors the subset of the HTML canvas 2D context the particle demos use.
/// Paint state (global alpha, fill color) persists between calls until
/// changed or until `restore` pops a state pushed by `save`.
pub trait Surface {
    /// Surface dimensions in pixels
    fn size(&self) -> (u32, u32);

    /// Erase the whole surface to transparent
    fn clear(&mut self);

    /// Push the current paint state
    fn save(&mut self);

    /// Pop the last saved paint state; no-op if the stack is empty
    fn restore(&mut self);

    fn set_global_alpha(&mut self, alpha: f32);

    fn set_fill_color(&mut self, color: Color);

    /// Start a new path, discarding any pending one
    fn begin_path(&mut self);

    /// Add a circular arc around `center` to the current path
    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32);

    /// Fill the current path with the fill color at the global alpha
    fn fill(&mut self);
}
