//! Surface that records draw calls instead of painting

use ember_core::{Color, Surface, Vec2};
use serde::Serialize;

/// One recorded `Surface` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    Save,
    Restore,
    GlobalAlpha {
        alpha: f32,
    },
    FillColor {
        color: Color,
    },
    BeginPath,
    Arc {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    Fill,
}

/// A filled arc reconstructed from the command log with the paint state
/// in effect at the time of the fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintedCircle {
    pub center: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy)]
struct PaintState {
    alpha: f32,
    color: Color,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            color: Color::BLACK,
        }
    }
}

pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Circles visible on the surface: every fill since the last `Clear`,
    /// with the alpha and color that applied when it was filled
    pub fn circles(&self) -> Vec<PaintedCircle> {
        let mut state = PaintState::default();
        let mut stack = Vec::new();
        let mut path = Vec::new();
        let mut painted = Vec::new();

        for cmd in &self.commands {
            match cmd {
                DrawCommand::Clear => painted.clear(),
                DrawCommand::Save => stack.push(state),
                DrawCommand::Restore => {
                    if let Some(s) = stack.pop() {
                        state = s;
                    }
                }
                DrawCommand::GlobalAlpha { alpha } => state.alpha = *alpha,
                DrawCommand::FillColor { color } => state.color = *color,
                DrawCommand::BeginPath => path.clear(),
                DrawCommand::Arc { center, radius, .. } => path.push((*center, *radius)),
                DrawCommand::Fill => {
                    painted.extend(path.iter().map(|&(center, radius)| PaintedCircle {
                        center,
                        radius,
                        alpha: state.alpha,
                        color: state.color,
                    }));
                }
            }
        }
        painted
    }

    /// True when every `Save` has a matching `Restore`
    pub fn is_balanced(&self) -> bool {
        let mut depth: i64 = 0;
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::GlobalAlpha { alpha });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillColor { color });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
}
