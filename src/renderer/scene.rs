//! Scene construction
//!
//! Turns a [`GameState`] into one flat-color triangle list in arena
//! coordinates. Layering, back to front: background lines and stars, rings,
//! projectiles, mages, sparks, the HUD frames, and the end-of-duel overlay.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shapes::{bar, circle, rect, ring, streak};
use super::vertex::{Vertex, colors, rgba};
use crate::Settings;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, ENEMY_RADIUS, PLAYER_RADIUS, RING_MAX_RADIUS};
use crate::hud::layout;
use crate::sim::spells::SpellId;
use crate::sim::state::{EnemyPhase, GameState, Mage};

/// Leftward star drift (units per second)
const STAR_DRIFT: f32 = 35.0;
/// Spacing of the horizontal floor lines
const FLOOR_SPACING: f32 = 30.0;
/// Seconds of travel drawn behind a projectile
const TAIL_TIME: f32 = 0.04;
/// Spark radius at full life
const SPARK_RADIUS: f32 = 4.0;
const SPARK_FULL_LIFE: f32 = 0.7;
/// Barrier cap, used to scale the shield ring thickness
const SHIELD_FULL: f32 = 26.0;

#[derive(Debug, Clone, Copy)]
struct Star {
    pos: Vec2,
    twinkle: f32,
}

/// Drifting background stars.
///
/// Has its own RNG so the background never consumes simulation randomness.
#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    rng: Pcg32,
}

impl Starfield {
    pub fn new(seed: u64, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0.0..ARENA_WIDTH),
                    rng.random_range(0.0..ARENA_HEIGHT),
                ),
                twinkle: rng.random_range(0.0..std::f32::consts::TAU),
            })
            .collect();
        Self { stars, rng }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Drift left, wrapping to the right edge at a fresh height
    pub fn update(&mut self, dt: f32) {
        for star in &mut self.stars {
            star.pos.x -= STAR_DRIFT * dt;
            if star.pos.x < 0.0 {
                star.pos.x = ARENA_WIDTH;
                star.pos.y = self.rng.random_range(0.0..ARENA_HEIGHT);
            }
        }
    }
}

/// Camera offset for the current shake amount.
///
/// Derived from the tick counter rather than an RNG so drawing stays a pure
/// function of the state.
pub fn shake_offset(state: &GameState, settings: &Settings) -> Vec2 {
    if !settings.effective_screen_shake() || state.screen_shake <= 0.0 {
        return Vec2::ZERO;
    }
    let t = state.time_ticks as f32;
    Vec2::new((t * 12.9898).sin(), (t * 78.233).cos()) * state.screen_shake
}

/// Build the full frame. `time` is wall-clock seconds, used for twinkle and
/// pulsing only.
pub fn build_scene(
    state: &GameState,
    settings: &Settings,
    stars: &Starfield,
    time: f32,
) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(8192);
    let cam = shake_offset(state, settings);
    let segments = settings.quality.circle_segments();

    background(&mut out, stars, cam, settings, time);

    if settings.rings {
        for r in &state.rings {
            let alpha = (1.0 - r.radius / RING_MAX_RADIUS).clamp(0.1, 1.0);
            ring(
                &mut out,
                r.pos + cam,
                (r.radius - 2.0).max(0.0),
                r.radius,
                rgba(r.color, alpha),
                segments,
            );
        }
    }

    for p in &state.projectiles {
        let pos = p.pos + cam;
        if settings.quality.glow_enabled() {
            circle(&mut out, pos, p.radius * 2.0, rgba(p.color, 0.27), segments);
        }
        streak(
            &mut out,
            pos - p.vel * TAIL_TIME,
            pos,
            p.radius * 0.2,
            p.radius * 0.8,
            rgba(p.color, 0.5),
        );
        let wobble = if settings.reduced_motion {
            0.0
        } else {
            2.0 * p.pulse.sin()
        };
        circle(
            &mut out,
            pos,
            (p.radius + wobble).max(2.0),
            rgba(p.color, 1.0),
            segments,
        );
    }

    let enemy_color = if state.enemy_brain.phase == EnemyPhase::Desperate {
        colors::ENEMY_DESPERATE
    } else {
        colors::ENEMY
    };
    mage(
        &mut out,
        &state.player,
        PLAYER_RADIUS,
        colors::PLAYER,
        colors::PLAYER_CORE,
        cam,
        segments,
    );
    mage(
        &mut out,
        &state.enemy,
        ENEMY_RADIUS,
        enemy_color,
        colors::ENEMY_CORE,
        cam,
        segments,
    );

    for spark in state.particles.iter().take(settings.max_particles()) {
        let radius = (SPARK_RADIUS * spark.life / SPARK_FULL_LIFE).max(1.0);
        circle(&mut out, spark.pos + cam, radius, rgba(spark.color, 1.0), 6);
    }

    hud_frames(&mut out, state);

    if state.winner.is_some() {
        rect(
            &mut out,
            Vec2::ZERO,
            Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            colors::OVERLAY,
        );
    }

    out
}

fn background(out: &mut Vec<Vertex>, stars: &Starfield, cam: Vec2, settings: &Settings, time: f32) {
    for (i, star) in stars.stars.iter().enumerate() {
        let twinkle = if settings.reduced_motion {
            0.5
        } else {
            0.5 + 0.5 * (time * 2.0 + star.twinkle + i as f32 * 0.37).sin()
        };
        let mut color = colors::STAR;
        color[3] *= 0.4 + 0.6 * twinkle;
        rect(out, star.pos + cam * 0.3 - Vec2::ONE, Vec2::splat(2.0), color);
    }

    let mut y = layout::PANEL_HEIGHT + 12.0;
    while y < ARENA_HEIGHT {
        let mut color = colors::FLOOR_LINE;
        if !settings.reduced_motion {
            color[3] *= 0.8 + 0.2 * (y * 0.04 + time * 2.0).sin();
        }
        rect(
            out,
            Vec2::new(0.0, y) + cam * 0.2,
            Vec2::new(ARENA_WIDTH, 2.0),
            color,
        );
        y += FLOOR_SPACING;
    }
    rect(
        out,
        Vec2::new(ARENA_WIDTH * 0.5 - 1.0, layout::PANEL_HEIGHT) + cam * 0.2,
        Vec2::new(2.0, ARENA_HEIGHT - layout::PANEL_HEIGHT),
        colors::CENTER_LINE,
    );
}

fn mage(
    out: &mut Vec<Vertex>,
    mage: &Mage,
    radius: f32,
    body: [f32; 4],
    core: [f32; 4],
    cam: Vec2,
    segments: u32,
) {
    let pos = mage.pos + cam;
    if mage.burn > 0.0 {
        ring(out, pos, radius + 2.0, radius + 2.0 + mage.burn * 2.0, colors::BURN, segments);
    }
    if mage.slow > 0.0 {
        ring(out, pos, radius + 2.0, radius + 2.0 + mage.slow * 3.0, colors::SLOW, segments);
    }
    circle(out, pos, radius, body, segments);
    circle(out, pos, radius * 0.45, core, segments);
    if mage.shield > 0.0 {
        let thickness = 2.0 + 4.0 * (mage.shield / SHIELD_FULL).min(1.0);
        ring(out, pos, radius + 8.0, radius + 8.0 + thickness, colors::SHIELD, segments);
    }
}

/// Panels, gauges and spell cards behind the HUD text
fn hud_frames(out: &mut Vec<Vertex>, state: &GameState) {
    use layout::*;

    rect(out, Vec2::ZERO, Vec2::new(ARENA_WIDTH, PANEL_HEIGHT), colors::PANEL);

    let gauges = [
        (PLAYER_HP_BAR, HP_BAR_HEIGHT, state.player.hp_ratio(), colors::HP),
        (
            PLAYER_MANA_BAR,
            MANA_BAR_HEIGHT,
            state.player.mana / state.player.mana_max,
            colors::MANA,
        ),
        (ENEMY_HP_BAR, HP_BAR_HEIGHT, state.enemy.hp_ratio(), colors::HP),
        (
            ENEMY_MANA_BAR,
            MANA_BAR_HEIGHT,
            state.enemy.mana / state.enemy.mana_max,
            colors::MANA,
        ),
    ];
    for (origin, height, ratio, fill) in gauges {
        bar(out, origin, Vec2::new(BAR_WIDTH, height), ratio, fill, colors::BAR_BACK);
    }

    for spell in SpellId::ALL {
        let origin = card_origin(spell.index());
        let def = spell.def();
        if spell == state.selected_spell {
            rect(
                out,
                origin - Vec2::splat(2.0),
                CARD_SIZE + Vec2::splat(4.0),
                rgba(def.color, 1.0),
            );
        }
        rect(out, origin, CARD_SIZE, colors::PANEL);
        let remaining = state.cooldown(spell) / def.cooldown;
        if remaining > 0.0 {
            rect(
                out,
                origin,
                Vec2::new(CARD_SIZE.x * remaining.min(1.0), CARD_SIZE.y),
                colors::COOLDOWN,
            );
        }
    }
}
