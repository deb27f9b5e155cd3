//! Fixed timestep simulation tick
//!
//! Core game loop that advances the duel deterministically. One call runs
//! every per-frame phase in a fixed order; see [`tick`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ai::tick_enemy;
use super::autopilot;
use super::cast::cast;
use super::channels::ChannelStep;
use super::projectiles::tick_projectiles;
use super::spells::SpellId;
use super::state::{GameEvent, GameState, Owner};
use crate::consts::{RING_GROWTH, RING_MAX_RADIUS, SHAKE_DECAY};

pub const BARRIER_MESSAGE: &str = "Barrier active.";
pub const BARRIER_DENIED_MESSAGE: &str = "Barrier unavailable (mana).";

/// Per-1/60 s damping applied to spark velocity
const PARTICLE_DRAG: f32 = 0.96;

/// Discrete player action, applied once at the start of a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Nudge one equation channel
    Step(ChannelStep),
    /// Select and cast a spell
    Cast(SpellId),
    /// Trade mana for shield
    Barrier,
    /// Typed equation assignments, e.g. `a=2.5, w=1.2`
    SubmitText(String),
    /// Start a new duel (only honoured once a winner is latched)
    Restart,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held movement direction, any length (normalized before use)
    pub move_dir: Vec2,
    /// One-shot actions in the order they were pressed
    pub events: Vec<InputEvent>,
    /// Demo mode - AI plays the player side
    pub autopilot: bool,
}

impl TickInput {
    pub fn with_event(event: InputEvent) -> Self {
        Self {
            events: vec![event],
            ..Default::default()
        }
    }
}

/// Advance the duel by one timestep.
///
/// Order: input events, mana regen, status decay, burn, cooldowns, player
/// movement, enemy AI, projectiles, visual effects, terminal check. Once a
/// winner is latched nothing moves until a restart event arrives.
pub fn tick<R: Rng>(state: &mut GameState, rng: &mut R, input: &TickInput, dt: f32) {
    let mut input = input.clone();
    if input.autopilot && state.winner.is_none() {
        autopilot::drive(state, &mut input);
    }

    for event in &input.events {
        apply_event(state, rng, event);
    }

    if state.winner.is_some() {
        return;
    }

    regen(state, dt);
    decay_status(state, dt);
    apply_burn(state, dt);
    for cd in &mut state.cooldowns {
        *cd = (*cd - dt).max(0.0);
    }
    move_player(state, input.move_dir, dt);
    tick_enemy(state, rng, dt);
    tick_projectiles(state, rng, dt);
    tick_effects(state, dt);

    state.time_ticks += 1;
    check_winner(state);
}

fn apply_event<R: Rng>(state: &mut GameState, rng: &mut R, event: &InputEvent) {
    if state.winner.is_some() {
        if *event == InputEvent::Restart {
            log::info!("duel restarted");
            state.reset();
        }
        return;
    }

    match event {
        InputEvent::Step(step) => state.channels.step(*step),
        InputEvent::Cast(spell) => {
            state.selected_spell = *spell;
            cast(state, rng, *spell, Owner::Player);
        }
        InputEvent::Barrier => raise_barrier(state),
        InputEvent::SubmitText(text) => match state.channels.apply_text(text) {
            Ok(count) => {
                let ch = state.channels;
                state.set_message(format!(
                    "Equation set ({count}): a={:.1} b={:.1} c={:.1} ω={:.1} φ={:.1}",
                    ch.a, ch.b, ch.c, ch.omega, ch.phi
                ));
            }
            Err(err) => state.set_message(format!("Invalid equation: {err}")),
        },
        InputEvent::Restart => {}
    }
}

fn raise_barrier(state: &mut GameState) {
    let (cost, gain, cap) = (
        state.tuning.barrier_cost,
        state.tuning.barrier_gain,
        state.tuning.barrier_cap,
    );
    if state.player.mana < cost {
        state.set_message(BARRIER_DENIED_MESSAGE);
        return;
    }
    state.player.spend_mana(cost);
    state.player.shield = (state.player.shield + gain).min(cap);
    state.set_message(BARRIER_MESSAGE);
    state.events.push(GameEvent::BarrierRaised);
}

fn regen(state: &mut GameState, dt: f32) {
    let (player_regen, enemy_regen) = (state.tuning.player.mana_regen, state.tuning.enemy.mana_regen);
    state.player.restore_mana(player_regen * dt);
    state.enemy.restore_mana(enemy_regen * dt);
}

fn decay_status(state: &mut GameState, dt: f32) {
    let tuning = &state.tuning;
    state
        .player
        .decay_status(tuning.player.shield_decay, tuning.status_decay, dt);
    state
        .enemy
        .decay_status(tuning.enemy.shield_decay, tuning.status_decay, dt);
}

fn apply_burn(state: &mut GameState, dt: f32) {
    let dps = state.tuning.burn_dps;
    for mage in [&mut state.player, &mut state.enemy] {
        let damage = mage.burn * dt * dps;
        mage.take_damage(damage);
    }
}

fn move_player(state: &mut GameState, dir: Vec2, dt: f32) {
    let dir = dir.normalize_or_zero();
    let speed = state.tuning.player_speed * state.tuning.slow_multiplier(state.player.slow);
    state.player.vel = dir * speed;
    let pos = state.player.pos + state.player.vel * dt;
    state.player.pos = state.tuning.player_region.clamp(pos);
}

/// Grow rings, integrate sparks, relax the screen shake
fn tick_effects(state: &mut GameState, dt: f32) {
    for ring in &mut state.rings {
        ring.radius += RING_GROWTH * dt;
    }
    state.rings.retain(|r| r.radius < RING_MAX_RADIUS);

    let drag = PARTICLE_DRAG.powf(dt * 60.0);
    for p in &mut state.particles {
        p.pos += p.vel * dt;
        p.vel *= drag;
        p.life -= dt;
    }
    state.particles.retain(|p| p.life > 0.0);

    state.screen_shake = (state.screen_shake - SHAKE_DECAY * dt).max(0.0);
}

/// Latch the winner; an enemy knockout takes precedence
fn check_winner(state: &mut GameState) {
    let winner = if state.enemy.is_dead() {
        Owner::Player
    } else if state.player.is_dead() {
        Owner::Enemy
    } else {
        return;
    };
    log::info!(
        "duel over after {} ticks: {:?} wins (player hp {:.1}, enemy hp {:.1})",
        state.time_ticks,
        winner,
        state.player.hp,
        state.enemy.hp
    );
    state.winner = Some(winner);
    state.events.push(GameEvent::Victory { winner });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{Particle, Projectile, Ring};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    #[test]
    fn test_regen_and_cooldowns() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.player.mana = 50.0;
        state.cooldowns = [0.01, 0.5, 0.0];
        tick(&mut state, &mut rng, &TickInput::default(), SIM_DT);
        assert!((state.player.mana - (50.0 + 12.0 * SIM_DT)).abs() < 1e-4);
        assert_eq!(state.cooldowns[0], 0.0);
        assert!((state.cooldowns[1] - (0.5 - SIM_DT)).abs() < 1e-6);
        assert_eq!(state.cooldowns[2], 0.0);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_burn_damages_enemy() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.enemy.burn = 2.0;
        let hp = state.enemy.hp;
        tick(&mut state, &mut rng, &TickInput::default(), SIM_DT);
        // Burn decays before it ticks
        let burn = 2.0 - SIM_DT;
        assert!((state.enemy.hp - (hp - burn * SIM_DT * 3.2)).abs() < 1e-3);
    }

    #[test]
    fn test_player_movement_slowed_and_clamped() {
        let mut state = GameState::new();
        let mut rng = rng();
        let input = TickInput {
            move_dir: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        let x = state.player.pos.x;
        tick(&mut state, &mut rng, &input, SIM_DT);
        assert!((state.player.pos.x - (x + 260.0 * SIM_DT)).abs() < 1e-3);

        state.player.slow = 2.0;
        let x = state.player.pos.x;
        tick(&mut state, &mut rng, &input, SIM_DT);
        // Slow decays before movement reads it
        let slow = 2.0 - SIM_DT;
        let expected = x + 260.0 * (1.0 - 0.2 * slow) * SIM_DT;
        assert!((state.player.pos.x - expected).abs() < 1e-3);

        state.player.pos = Vec2::new(575.0, 659.0);
        let input = TickInput {
            move_dir: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        tick(&mut state, &mut rng, &input, SIM_DT);
        assert_eq!(state.player.pos, Vec2::new(576.0, 660.0));
    }

    #[test]
    fn test_cast_event_selects_and_casts() {
        let mut state = GameState::new();
        let mut rng = rng();
        let input = TickInput::with_event(InputEvent::Cast(SpellId::Orb));
        tick(&mut state, &mut rng, &input, SIM_DT);
        assert_eq!(state.selected_spell, SpellId::Orb);
        assert!(state.projectiles.iter().any(|p| p.owner == Owner::Player));
        assert!(state.cooldown(SpellId::Orb) > 0.0);
    }

    #[test]
    fn test_channel_step_event() {
        let mut state = GameState::new();
        let mut rng = rng();
        let a = state.channels.a;
        tick(
            &mut state,
            &mut rng,
            &TickInput::with_event(InputEvent::Step(ChannelStep::AUp)),
            SIM_DT,
        );
        assert_eq!(state.channels.a, a + 0.5);
    }

    #[test]
    fn test_barrier() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.player.shield = 20.0;
        let mana = state.player.mana;
        tick(
            &mut state,
            &mut rng,
            &TickInput::with_event(InputEvent::Barrier),
            SIM_DT,
        );
        assert!(state.player.shield <= 26.0);
        assert!(state.player.shield > 25.9);
        assert!(state.player.mana < mana - 17.0);
        assert_eq!(state.message, BARRIER_MESSAGE);
        assert!(state.events.contains(&GameEvent::BarrierRaised));
    }

    #[test]
    fn test_barrier_denied_without_mana() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.player.mana = 10.0;
        tick(
            &mut state,
            &mut rng,
            &TickInput::with_event(InputEvent::Barrier),
            SIM_DT,
        );
        assert_eq!(state.player.shield, 0.0);
        assert_eq!(state.message, BARRIER_DENIED_MESSAGE);
    }

    #[test]
    fn test_submit_text_updates_or_reports() {
        let mut state = GameState::new();
        let mut rng = rng();
        tick(
            &mut state,
            &mut rng,
            &TickInput::with_event(InputEvent::SubmitText("a=4, w=2".into())),
            SIM_DT,
        );
        assert_eq!(state.channels.a, 4.0);
        assert_eq!(state.channels.omega, 2.0);
        assert!(state.message.starts_with("Equation set"));

        let before = state.channels;
        tick(
            &mut state,
            &mut rng,
            &TickInput::with_event(InputEvent::SubmitText("a=1, q=2".into())),
            SIM_DT,
        );
        assert_eq!(state.channels, before);
        assert!(state.message.starts_with("Invalid equation"));
    }

    #[test]
    fn test_restart_ignored_during_play() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.player.hp = 100.0;
        tick(
            &mut state,
            &mut rng,
            &TickInput::with_event(InputEvent::Restart),
            SIM_DT,
        );
        assert_eq!(state.player.hp, 100.0);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_winner_latched_and_frozen() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.enemy.hp = 0.0;
        tick(&mut state, &mut rng, &TickInput::default(), SIM_DT);
        assert_eq!(state.winner, Some(Owner::Player));
        assert!(state.events.contains(&GameEvent::Victory {
            winner: Owner::Player
        }));

        let frozen = state.clone();
        let input = TickInput {
            move_dir: Vec2::X,
            events: vec![
                InputEvent::Cast(SpellId::Lance),
                InputEvent::Barrier,
                InputEvent::Step(ChannelStep::AUp),
            ],
            autopilot: true,
        };
        for _ in 0..10 {
            tick(&mut state, &mut rng, &input, SIM_DT);
        }
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_enemy_knockout_takes_precedence() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.enemy.hp = 0.0;
        state.player.hp = 0.0;
        tick(&mut state, &mut rng, &TickInput::default(), SIM_DT);
        assert_eq!(state.winner, Some(Owner::Player));
    }

    #[test]
    fn test_restart_after_win() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.channels.a = 7.0;
        state.player.hp = 0.0;
        tick(&mut state, &mut rng, &TickInput::default(), SIM_DT);
        assert_eq!(state.winner, Some(Owner::Enemy));

        tick(
            &mut state,
            &mut rng,
            &TickInput::with_event(InputEvent::Restart),
            SIM_DT,
        );
        assert_eq!(state.winner, None);
        assert_eq!(state.player.hp, state.player.hp_max);
        assert_eq!(state.channels.a, 2.0);
        assert!(state.projectiles.iter().all(|p| p.owner == Owner::Enemy));
    }

    #[test]
    fn test_effects_expire() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.rings.push(Ring {
            pos: Vec2::ZERO,
            radius: RING_MAX_RADIUS - 1.0,
            color: [1.0; 3],
        });
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            life: 0.01,
            color: [1.0; 3],
        });
        state.screen_shake = 0.2;
        tick(&mut state, &mut rng, &TickInput::default(), SIM_DT);
        assert!(state.rings.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.screen_shake, 0.0);
    }

    #[test]
    fn test_particle_drag() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            life: 1.0,
            color: [1.0; 3],
        });
        tick(&mut state, &mut rng, &TickInput::default(), SIM_DT);
        assert!((state.particles[0].vel.x - 96.0).abs() < 1e-3);
    }

    #[test]
    fn test_player_projectile_damages_enemy_through_tick() {
        let mut state = GameState::new();
        let mut rng = rng();
        state.enemy_brain.dash_timer = 100.0;
        state.projectiles.push(Projectile {
            pos: state.enemy.pos,
            vel: Vec2::ZERO,
            radius: 10.0,
            color: [1.0; 3],
            damage: 30.0,
            owner: Owner::Player,
            life: 1.0,
            pulse: 0.0,
        });
        let hp = state.enemy.hp;
        tick(&mut state, &mut rng, &TickInput::default(), SIM_DT);
        assert!(state.enemy.hp < hp);
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput::with_event(InputEvent::Cast(SpellId::Wave)),
            TickInput {
                move_dir: Vec2::new(0.0, -1.0),
                ..Default::default()
            },
            TickInput::with_event(InputEvent::Step(ChannelStep::OmegaUp)),
            TickInput::default(),
        ];

        let run = || {
            let mut state = GameState::new();
            let mut rng = Pcg32::seed_from_u64(99999);
            for _ in 0..120 {
                for input in &inputs {
                    tick(&mut state, &mut rng, input, SIM_DT);
                }
            }
            state
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_autopilot_duel_keeps_invariants() {
        let mut state = GameState::new();
        let mut rng = Pcg32::seed_from_u64(7);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..60 * 60 * 5 {
            tick(&mut state, &mut rng, &input, SIM_DT);
            assert!(state.invariants_hold());
            if state.winner.is_some() {
                break;
            }
        }
        assert!(state.time_ticks > 0);
        assert!(state.last_player_spell.is_some());
    }
}
