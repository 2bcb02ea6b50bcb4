//! Pointer input events

use ember_core::Vec2;

/// Pointer input delivered to frame systems at the start of a frame
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Click at `at` (surface pixels). `target` names one layer; `None`
    /// delivers to every layer.
    Click { at: Vec2, target: Option<String> },
}

impl PointerEvent {
    pub fn click(at: Vec2) -> Self {
        PointerEvent::Click { at, target: None }
    }

    pub fn click_on(target: impl Into<String>, at: Vec2) -> Self {
        PointerEvent::Click {
            at,
            target: Some(target.into()),
        }
    }

    /// Whether this event should reach the layer called `name`
    pub fn targets(&self, name: &str) -> bool {
        match self {
            PointerEvent::Click { target, .. } => target.as_deref().map_or(true, |t| t == name),
        }
    }
}
