//! Arcane Duel - a real-time 2D mage duel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spells, projectiles, enemy AI, game loop)
//! - `renderer`: Flat-color triangle scene and the WebGPU pipeline that draws it
//! - `hud`: Text primitives for the font collaborator
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences

pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the nominal frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame time fed to the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (screen space, y grows downward)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 760.0;
    /// Projectiles further than this outside the arena are discarded
    pub const ARENA_MARGIN: f32 = 30.0;

    /// Body radii, also used for hit tests
    pub const PLAYER_RADIUS: f32 = 32.0;
    pub const ENEMY_RADIUS: f32 = 36.0;

    /// Visual ring growth (units per second) and removal radius
    pub const RING_GROWTH: f32 = 150.0;
    pub const RING_MAX_RADIUS: f32 = 120.0;

    /// Screen shake decay (units per second)
    pub const SHAKE_DECAY: f32 = 30.0;
}

/// Wrap an angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Unit direction from `from` toward `to`, falling back to +X when the two
/// points coincide.
#[inline]
pub fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(Vec2::X)
}
