//! CLI command implementations

pub mod presets;
pub mod render;
pub mod scene;
pub mod simulate;
