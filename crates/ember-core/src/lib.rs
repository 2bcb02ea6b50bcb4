//! Ember Core - Foundational types for the Ember particle demos
//!
//! This crate provides the core types that all other Ember crates depend on:
//! - `Vec2`, `Polar` - Planar points/vectors and their polar form
//! - `Color` - RGBA color with CSS-style parsing (names, hex, HSL)
//! - `Surface` - The 2D drawing surface particles are painted onto
//! - Error types and Result alias

mod color;
mod error;
mod surface;
mod types;

pub use color::Color;
pub use error::{EmberError, Result};
pub use surface::Surface;
pub use types::{cartesian_to_polar, deg_to_rad, polar_to_cartesian, rad_to_deg, Polar, Vec2};

/// A full turn in radians
pub const TWO_PI: f32 = std::f32::consts::TAU;
