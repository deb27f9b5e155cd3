//! Projectile simulation and hit resolution
//!
//! Each projectile takes exactly one of four exits per tick, checked in a
//! fixed order: lifetime, arena bounds, hit on the enemy, hit on the player.
//! Anything else survives to the next tick.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, outside_arena};
use super::state::{GameEvent, GameState, Owner, Particle, Projectile, Ring};
use crate::consts::{ENEMY_RADIUS, PLAYER_RADIUS};

/// Render pulse speed (radians per second)
const PULSE_RATE: f32 = 8.0;

/// Colour of impact feedback when the player is struck
pub const PLAYER_HURT_COLOR: [f32; 3] = [1.0, 110.0 / 255.0, 140.0 / 255.0];

/// Why a projectile left play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Alive,
    Expired,
    OutOfBounds,
    Struck(Owner),
}

/// Integrate one projectile and decide its fate against the current
/// combatant positions. Does not apply damage.
pub fn advance(p: &mut Projectile, dt: f32, player_pos: Vec2, enemy_pos: Vec2) -> Fate {
    p.pos += p.vel * dt;
    p.life -= dt;
    p.pulse += dt * PULSE_RATE;

    if p.life <= 0.0 {
        return Fate::Expired;
    }
    if outside_arena(p.pos) {
        return Fate::OutOfBounds;
    }
    match p.owner {
        Owner::Player if circles_overlap(p.pos, p.radius, enemy_pos, ENEMY_RADIUS) => {
            Fate::Struck(Owner::Enemy)
        }
        Owner::Enemy if circles_overlap(p.pos, p.radius, player_pos, PLAYER_RADIUS) => {
            Fate::Struck(Owner::Player)
        }
        _ => Fate::Alive,
    }
}

/// Advance every live projectile by `dt` and resolve hits
pub fn tick_projectiles<R: Rng>(state: &mut GameState, rng: &mut R, dt: f32) {
    let mut alive = Vec::with_capacity(state.projectiles.len());
    for mut p in std::mem::take(&mut state.projectiles) {
        match advance(&mut p, dt, state.player.pos, state.enemy.pos) {
            Fate::Alive => alive.push(p),
            Fate::Expired | Fate::OutOfBounds => {}
            Fate::Struck(target) => resolve_hit(state, rng, &p, target),
        }
    }
    state.projectiles = alive;
}

/// Apply a projectile's damage and status to `target`, plus feedback
pub fn resolve_hit<R: Rng>(state: &mut GameState, rng: &mut R, p: &Projectile, target: Owner) {
    let tuning = &state.tuning;
    let (absorb, ring_color, shake_bump, shake_cap, sparks, spark_speed, spark_life) = match target {
        Owner::Enemy => (tuning.enemy.shield_absorb, p.color, 2.4, 9.0, 8, 90.0, 0.2..0.6),
        Owner::Player => (
            tuning.player.shield_absorb,
            PLAYER_HURT_COLOR,
            3.0,
            12.0,
            10,
            120.0,
            0.25..0.7,
        ),
    };
    let (burn_per_hit, burn_cap) = (tuning.burn_per_hit, tuning.burn_cap);
    let (slow_per_hit, slow_cap) = (tuning.slow_per_hit, tuning.slow_cap);

    let mage = state.mage_mut(target);
    let effective = (p.damage - mage.shield).max(0.0);
    mage.shield = (mage.shield - p.damage * absorb).max(0.0);
    mage.take_damage(effective);
    match target {
        Owner::Enemy => {
            mage.burn = (mage.burn + burn_per_hit).min(burn_cap);
            state.combo += 1;
        }
        Owner::Player => {
            mage.slow = (mage.slow + slow_per_hit).min(slow_cap);
            state.combo = 0;
        }
    }

    state.rings.push(Ring {
        pos: p.pos,
        radius: p.radius * 1.2,
        color: ring_color,
    });
    state.screen_shake = (state.screen_shake + shake_bump).min(shake_cap);
    for _ in 0..sparks {
        let vel = Vec2::new(
            rng.random_range(-spark_speed..=spark_speed),
            rng.random_range(-spark_speed..=spark_speed),
        );
        state.push_particle(Particle {
            pos: p.pos,
            vel,
            life: rng.random_range(spark_life.clone()),
            color: ring_color,
        });
    }
    state.events.push(GameEvent::Hit {
        target,
        damage: effective,
    });
}
