//! Demo AI for the player side
//!
//! Drives the player when nobody is at the controls: track the enemy
//! vertically, put up a barrier against incoming fire, and throw whichever
//! ready spell hits hardest with the current channels.

use glam::Vec2;

use super::cast::player_can_cast;
use super::channels::ChannelStep;
use super::collision::any_within;
use super::spells::SpellId;
use super::state::{GameState, Owner};
use super::tick::{InputEvent, TickInput};

/// Enemy projectiles closer than this count as a threat
pub const THREAT_RANGE: f32 = 150.0;
/// Barrier is only raised while the shield is below this
pub const LOW_SHIELD: f32 = 6.0;
/// Vertical offset to the enemy that is close enough
const TRACK_DEAD_ZONE: f32 = 8.0;
/// Keep some mana in reserve for a barrier when possible
const MANA_RESERVE: f32 = 18.0;
/// Linear coefficient the autopilot works the `a` channel toward
const TARGET_A: f32 = 6.0;
/// Ticks between channel adjustments
const TUNE_INTERVAL: u64 = 30;

/// Fill `input` with the autopilot's choices for this tick
pub fn drive(state: &GameState, input: &mut TickInput) {
    let player = &state.player;

    // Track enemy's y, drift toward the middle of the player region in x
    let dy = state.enemy.pos.y - player.pos.y;
    let region = &state.tuning.player_region;
    let home_x = (region.min.x + region.max.x) * 0.5;
    let dx = home_x - player.pos.x;
    input.move_dir = Vec2::new(
        if dx.abs() > TRACK_DEAD_ZONE { dx.signum() } else { 0.0 },
        if dy.abs() > TRACK_DEAD_ZONE { dy.signum() } else { 0.0 },
    );

    let threatened = any_within(
        player.pos,
        THREAT_RANGE,
        state
            .projectiles
            .iter()
            .filter(|p| p.owner == Owner::Enemy)
            .map(|p| &p.pos),
    );
    if threatened && player.shield < LOW_SHIELD && player.mana >= state.tuning.barrier_cost {
        input.events.push(InputEvent::Barrier);
        return;
    }

    if state.time_ticks % TUNE_INTERVAL == 0 && state.channels.a < TARGET_A {
        input.events.push(InputEvent::Step(ChannelStep::AUp));
    }

    if let Some(spell) = best_ready_spell(state) {
        input.events.push(InputEvent::Cast(spell));
    }
}

/// The castable spell with the highest volley damage that still leaves a
/// barrier's worth of mana
pub fn best_ready_spell(state: &GameState) -> Option<SpellId> {
    let ready = SpellId::ALL
        .into_iter()
        .filter(|&spell| player_can_cast(state, spell))
        .filter(|&spell| state.player.mana - spell.def().mana_cost >= MANA_RESERVE);
    ready.max_by(|a, b| {
        let da = a.def().volley_damage(a.def().power(&state.channels));
        let db = b.def().volley_damage(b.def().power(&state.channels));
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}
