//! Per-frame driver: input, then clear/update/draw per layer

use crate::clock::FrameClock;
use crate::event::PointerEvent;
use crate::system::FrameSystem;
use ember_core::Surface;
use std::collections::VecDeque;

/// A frame system paired with the surface it draws onto
pub struct Layer<T, S> {
    pub system: T,
    pub surface: S,
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    /// Pointer events delivered before the update
    pub events: usize,
    /// Layers cleared, updated and drawn
    pub drawn: usize,
    /// Idle layers left untouched
    pub skipped: usize,
}

/// Drives a set of layers one frame at a time.
///
/// Each frame first drains queued pointer events, so a click pushed between
/// frames is applied before the next update, then clears, updates and
/// draws every layer in registration order.
pub struct FrameLoop<T, S> {
    layers: Vec<Layer<T, S>>,
    /// Pointer input waiting for the next frame, oldest first
    pending: VecDeque<PointerEvent>,
    /// Leave idle layers alone instead of clearing and redrawing them
    pub skip_idle: bool,
    frame: u64,
}

impl<T: FrameSystem, S: Surface> Default for FrameLoop<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FrameSystem, S: Surface> FrameLoop<T, S> {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            pending: VecDeque::new(),
            skip_idle: false,
            frame: 0,
        }
    }

    pub fn with_skip_idle(mut self, skip_idle: bool) -> Self {
        self.skip_idle = skip_idle;
        self
    }

    /// Register a layer; returns its index
    pub fn add_layer(&mut self, system: T, surface: S) -> usize {
        log::debug!("[frame] Added layer '{}'", system.name());
        self.layers.push(Layer { system, surface });
        self.layers.len() - 1
    }

    pub fn layers(&self) -> &[Layer<T, S>] {
        &self.layers
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer<T, S>> {
        self.layers.get_mut(index)
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Queue pointer input for the next frame
    pub fn push_pointer(&mut self, event: PointerEvent) {
        self.pending.push_back(event);
    }

    /// Pointer events queued for the next frame
    pub fn pending_pointer(&self) -> usize {
        self.pending.len()
    }

    /// Run one frame with delta ratio `dt`
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };

        while let Some(event) = self.pending.pop_front() {
            report.events += 1;
            let PointerEvent::Click { at, .. } = event;
            let mut delivered = 0;
            for layer in &mut self.layers {
                if event.targets(layer.system.name()) {
                    layer.system.pointer(at);
                    delivered += 1;
                }
            }
            if delivered == 0 {
                log::debug!("[frame] Pointer event matched no layer: {:?}", event);
            }
        }

        let skip_idle = self.skip_idle;
        for layer in &mut self.layers {
            if skip_idle && layer.system.is_idle() {
                report.skipped += 1;
                continue;
            }
            layer.surface.clear();
            layer.system.update(dt);
            layer.system.draw(&mut layer.surface);
            report.drawn += 1;
        }

        report
    }

    /// Run `frames` frames with deltas from `clock`, handing every report
    /// and the loop itself to `on_frame` after each frame
    pub fn run<F>(&mut self, clock: &mut FrameClock, frames: u64, mut on_frame: F)
    where
        F: FnMut(&FrameReport, &mut Self),
    {
        for _ in 0..frames {
            let dt = clock.tick();
            let report = self.frame(dt);
            on_frame(&report, self);
        }
    }
}
