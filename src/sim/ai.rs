//! Enemy controller
//!
//! ## Phases
//! 1. desperate: hp ratio below [`DESPERATE_HP_RATIO`] (always wins)
//! 2. recover: mana below [`RECOVER_MANA`]
//! 3. pressure: otherwise
//!
//! The phase is recomputed from scratch every frame, so it can flip on
//! consecutive ticks near a threshold.
//!
//! Three timers run independently: a think timer choosing a movement intent,
//! a cast timer choosing spells, and a dash cooldown for dodging incoming
//! player projectiles.

use glam::Vec2;
use rand::Rng;

use super::cast::cast;
use super::collision::any_within;
use super::spells::SpellId;
use super::state::{EnemyPhase, GameEvent, GameState, Owner};
use crate::aim_direction;

pub const DESPERATE_HP_RATIO: f32 = 0.35;
pub const RECOVER_MANA: f32 = 45.0;
/// The enemy will not start a cast at or below this much mana
pub const MIN_CAST_MANA: f32 = 12.0;
/// Mana the enemy channels back when casting in recover phase
pub const RECOVER_MANA_BONUS: f32 = 8.0;

/// Player projectiles closer than this trigger a dash
pub const DODGE_RANGE: f32 = 120.0;
pub const DASH_DISTANCE: f32 = 140.0;

/// Preferred distance to the player per phase
const PRESSURE_DISTANCE: f32 = 430.0;
const KITE_DISTANCE: f32 = 520.0;
/// Tolerance band around the preferred distance
const TOO_CLOSE_BAND: f32 = 40.0;
const TOO_FAR_BAND: f32 = 70.0;

/// Phase for a given health ratio and mana
pub fn phase_for(hp_ratio: f32, mana: f32) -> EnemyPhase {
    if hp_ratio < DESPERATE_HP_RATIO {
        EnemyPhase::Desperate
    } else if mana < RECOVER_MANA {
        EnemyPhase::Recover
    } else {
        EnemyPhase::Pressure
    }
}

/// Run one frame of enemy behaviour
pub fn tick_enemy<R: Rng>(state: &mut GameState, rng: &mut R, dt: f32) {
    let phase = phase_for(state.enemy.hp_ratio(), state.enemy.mana);
    if phase != state.enemy_brain.phase {
        log::debug!(
            "enemy phase {} -> {}",
            state.enemy_brain.phase.as_str(),
            phase.as_str()
        );
        state.enemy_brain.phase = phase;
    }

    think(state, rng, dt);
    dodge(state, rng, dt);
    try_cast(state, rng, dt);

    let enemy = &mut state.enemy;
    enemy.pos += enemy.vel * dt;
    enemy.pos = state.tuning.enemy_region.clamp(enemy.pos);
}

/// Pick a movement intent when the think timer expires; the velocity is kept
/// until the next expiry.
fn think<R: Rng>(state: &mut GameState, rng: &mut R, dt: f32) {
    let brain = &mut state.enemy_brain;
    brain.think_timer -= dt;
    if brain.think_timer > 0.0 {
        return;
    }
    brain.think_timer = rng.random_range(0.22..=0.42);

    let to_player = state.player.pos - state.enemy.pos;
    let dist = to_player.length();
    let toward = aim_direction(state.enemy.pos, state.player.pos);
    let desired = match brain.phase {
        EnemyPhase::Pressure => PRESSURE_DISTANCE,
        EnemyPhase::Recover | EnemyPhase::Desperate => KITE_DISTANCE,
    };

    let (vel, intent) = if dist < desired - TOO_CLOSE_BAND {
        (-toward * rng.random_range(120.0f32..=180.0), "Defensive reposition")
    } else if dist > desired + TOO_FAR_BAND {
        (toward * rng.random_range(90.0f32..=140.0), "Aggressive approach")
    } else {
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        (
            Vec2::new(0.0, sign * rng.random_range(110.0..=170.0)),
            "Lateral strafe",
        )
    };
    state.enemy.vel = vel;
    brain.intent = intent.to_string();
}

/// Sidestep vertically when a player projectile is close and the dash is ready
fn dodge<R: Rng>(state: &mut GameState, rng: &mut R, dt: f32) {
    state.enemy_brain.dash_timer -= dt;
    let threatened = any_within(
        state.enemy.pos,
        DODGE_RANGE,
        state
            .projectiles
            .iter()
            .filter(|p| p.owner == Owner::Player)
            .map(|p| &p.pos),
    );
    if threatened && state.enemy_brain.dash_timer <= 0.0 {
        state.enemy_brain.dash_timer = rng.random_range(1.4..=2.2);
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        state.enemy.pos.y += sign * DASH_DISTANCE;
        state.events.push(GameEvent::Dash);
    }
}

/// Cast when the cast timer has expired and there is mana to spend
fn try_cast<R: Rng>(state: &mut GameState, rng: &mut R, dt: f32) {
    state.enemy_brain.cast_timer -= dt;
    if state.enemy_brain.cast_timer > 0.0 || state.enemy.mana <= MIN_CAST_MANA {
        return;
    }

    let (spell, next, intent) = match state.enemy_brain.phase {
        EnemyPhase::Desperate => {
            let spell = if rng.random_bool(0.7) {
                SpellId::Wave
            } else {
                SpellId::Orb
            };
            (spell, rng.random_range(0.35..=0.75), "Sine burst")
        }
        EnemyPhase::Recover => {
            state.enemy.restore_mana(RECOVER_MANA_BONUS);
            (SpellId::Lance, rng.random_range(0.9..=1.2), "Mana recovery")
        }
        EnemyPhase::Pressure => {
            let spell = if rng.random_bool(0.5) {
                SpellId::Lance
            } else {
                SpellId::Orb
            };
            (spell, rng.random_range(0.55..=0.95), "Ballistic pressure")
        }
    };
    state.enemy_brain.cast_timer = next;
    state.enemy_brain.intent = intent.to_string();
    cast(state, rng, spell, Owner::Enemy);
}
