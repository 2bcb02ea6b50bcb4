//! Frame system trait

use ember_core::{Surface, Vec2};

/// Something the frame loop updates and draws once per frame
///
/// Layers are processed in registration order. `update` always runs before
/// `draw` within a frame, and pointer input for the frame is delivered
/// before either.
pub trait FrameSystem {
    /// Advance by one frame; `dt` is the frame delta as a multiple of the
    /// target frame time (1.0 at exactly the target rate)
    fn update(&mut self, dt: f32);

    /// Paint the current state; the surface has already been cleared
    fn draw(&self, surface: &mut dyn Surface);

    /// A pointer click landed at `at` in surface coordinates
    fn pointer(&mut self, at: Vec2);

    /// True when there is nothing left to animate, letting the loop skip
    /// the clear/update/draw work for this layer
    fn is_idle(&self) -> bool;

    /// Human-readable name, also used to target pointer events
    fn name(&self) -> &str;
}
