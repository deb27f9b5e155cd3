//! Cast resolution
//!
//! Turns a spell request into projectiles. The player is gated by mana and
//! cooldown; the enemy controller regulates itself and only pays a
//! discounted cost.

use glam::Vec2;
use rand::Rng;

use super::spells::{School, SpellId};
use super::state::{GameEvent, GameState, Owner, Projectile, Ring};
use crate::aim_direction;

/// Lateral velocity of the outer sine projectiles (units/s)
pub const SINE_FAN_SPEED: f32 = 120.0;
/// Maximum angular spread of a quadratic orb (radians)
pub const QUADRATIC_SPREAD: f32 = 0.2;
/// Radius of the ring left at the caster by a quadratic orb
pub const CAST_RING_RADIUS: f32 = 16.0;

pub const UNAVAILABLE_MESSAGE: &str = "Spell unavailable (mana/cooldown).";

/// True if the player could cast `spell` right now
pub fn player_can_cast(state: &GameState, spell: SpellId) -> bool {
    state.player.mana >= spell.def().mana_cost && state.cooldown(spell) <= 0.0
}

/// Cast `spell` from `owner` at its opponent.
///
/// Returns true iff at least one projectile was queued. A rejected player
/// cast leaves mana, cooldowns and projectiles untouched.
pub fn cast<R: Rng>(state: &mut GameState, rng: &mut R, spell: SpellId, owner: Owner) -> bool {
    let def = spell.def();

    match owner {
        Owner::Player => {
            if !player_can_cast(state, spell) {
                state.set_message(UNAVAILABLE_MESSAGE);
                state.events.push(GameEvent::CastRejected { spell });
                return false;
            }
            state.cooldowns[spell.index()] = def.cooldown;
            state.player.spend_mana(def.mana_cost);
            state.last_player_spell = Some(spell);
        }
        Owner::Enemy => {
            let cost = def.mana_cost * state.tuning.enemy_cost_factor;
            state.enemy.spend_mana(cost);
        }
    }

    let power = def.power(&state.channels);
    let origin = state.mage(owner).pos;
    let target = state.mage(owner.opponent()).pos;
    let direction = aim_direction(origin, target);
    let speed = def.launch_speed(power);
    let damage = def.projectile_damage(power);

    let spawned_before = state.projectiles.len();
    let base = Projectile {
        pos: origin,
        vel: direction * speed,
        radius: def.size,
        color: def.color,
        damage,
        owner,
        life: def.life,
        pulse: 0.0,
    };

    match def.school {
        School::Sine => {
            let perp = direction.perp();
            for k in [-1.0, 0.0, 1.0] {
                state.projectiles.push(Projectile {
                    vel: direction * speed + perp * (k * SINE_FAN_SPEED),
                    pulse: rng.random_range(0.0..std::f32::consts::TAU),
                    ..base.clone()
                });
            }
        }
        School::Quadratic => {
            let spread = rng.random_range(-QUADRATIC_SPREAD..=QUADRATIC_SPREAD);
            state.projectiles.push(Projectile {
                vel: Vec2::from_angle(spread).rotate(direction) * speed,
                radius: def.size + (power * 2.0).floor(),
                ..base
            });
            state.rings.push(Ring {
                pos: origin,
                radius: CAST_RING_RADIUS,
                color: def.color,
            });
        }
        School::Linear => state.projectiles.push(base),
    }

    let spawned = state.projectiles.len() > spawned_before;
    if spawned {
        log::debug!(
            "{:?} cast {} (power {:.2}, mana left {:.1})",
            owner,
            def.name,
            power,
            state.mage(owner).mana
        );
        state.events.push(GameEvent::SpellCast { owner, spell });
    }
    spawned
}
