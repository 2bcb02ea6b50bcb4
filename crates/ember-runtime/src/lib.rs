//! Ember Runtime - Frame loop infrastructure
//!
//! Provides the building blocks of the per-frame driver:
//! - `FrameClock` — frame delta as a ratio against a target refresh rate
//! - `PointerEvent` — click input, optionally aimed at one named layer
//! - `FrameSystem` — trait for anything updated and drawn once per frame
//! - `FrameLoop` — drains input, then updates and draws each layer

mod clock;
mod event;
mod frame_loop;
mod system;

pub use clock::FrameClock;
pub use event::PointerEvent;
pub use frame_loop::{FrameLoop, FrameReport, Layer};
pub use system::FrameSystem;
