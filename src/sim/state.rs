//! Game state and core simulation types
//!
//! Everything the duel needs between frames lives in [`GameState`]. The RNG
//! is deliberately not part of it: randomized operations take `&mut impl Rng`
//! so tests can pin outcomes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::channels::EquationChannels;
use super::spells::{SPELL_COUNT, SpellId};
use crate::tuning::{MageTuning, Tuning};

/// Which side a projectile or event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

impl Owner {
    pub fn opponent(self) -> Owner {
        match self {
            Owner::Player => Owner::Enemy,
            Owner::Enemy => Owner::Player,
        }
    }
}

/// A combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mage {
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: f32,
    pub hp_max: f32,
    pub mana: f32,
    pub mana_max: f32,
    /// Damage absorption pool
    pub shield: f32,
    /// Damage-over-time stacks
    pub burn: f32,
    /// Movement penalty stacks
    pub slow: f32,
}

impl Mage {
    pub fn new(tuning: &MageTuning) -> Self {
        Self {
            pos: tuning.start_pos,
            vel: Vec2::ZERO,
            hp: tuning.hp_max,
            hp_max: tuning.hp_max,
            mana: tuning.mana_max,
            mana_max: tuning.mana_max,
            shield: 0.0,
            burn: 0.0,
            slow: 0.0,
        }
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.hp_max > 0.0 {
            self.hp / self.hp_max
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Add mana, capped at the maximum
    pub fn restore_mana(&mut self, amount: f32) {
        self.mana = (self.mana + amount).min(self.mana_max);
    }

    /// Remove mana, floored at zero
    pub fn spend_mana(&mut self, amount: f32) {
        self.mana = (self.mana - amount).max(0.0);
    }

    /// Remove health, floored at zero
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
    }

    /// Decay shield, burn and slow by one frame's worth
    pub fn decay_status(&mut self, shield_rate: f32, status_rate: f32, dt: f32) {
        self.shield = (self.shield - shield_rate * dt).max(0.0);
        self.burn = (self.burn - status_rate * dt).max(0.0);
        self.slow = (self.slow - status_rate * dt).max(0.0);
    }
}

/// A spell projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Units per second
    pub vel: Vec2,
    pub radius: f32,
    pub color: [f32; 3],
    pub damage: f32,
    pub owner: Owner,
    /// Seconds left before it fizzles
    pub life: f32,
    /// Render-only oscillation accumulator
    pub pulse: f32,
}

/// Expanding circle drawn on casts and impacts (no gameplay effect)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [f32; 3],
}

/// Impact spark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub color: [f32; 3],
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Feedback for the audio/visual collaborators, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SpellCast { owner: Owner, spell: SpellId },
    CastRejected { spell: SpellId },
    Hit { target: Owner, damage: f32 },
    BarrierRaised,
    Dash,
    Victory { winner: Owner },
}

/// Enemy behavioral mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    Pressure,
    Recover,
    Desperate,
}

impl EnemyPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            EnemyPhase::Pressure => "pressure",
            EnemyPhase::Recover => "recover",
            EnemyPhase::Desperate => "desperate",
        }
    }
}

/// Enemy controller memory: phase, timers and the last stated intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBrain {
    pub phase: EnemyPhase,
    pub intent: String,
    pub think_timer: f32,
    pub cast_timer: f32,
    pub dash_timer: f32,
}

impl Default for EnemyBrain {
    fn default() -> Self {
        Self {
            phase: EnemyPhase::Pressure,
            intent: "Opening stance".to_string(),
            think_timer: 0.0,
            cast_timer: 0.9,
            dash_timer: 2.4,
        }
    }
}

/// Complete duel state (deterministic given the same RNG stream)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub player: Mage,
    pub enemy: Mage,
    pub channels: EquationChannels,
    /// Remaining player cooldown per spell, indexed by [`SpellId::index`]
    pub cooldowns: [f32; SPELL_COUNT],
    pub selected_spell: SpellId,
    pub last_player_spell: Option<SpellId>,
    pub projectiles: Vec<Projectile>,
    pub enemy_brain: EnemyBrain,
    /// Consecutive player hits since the player was last struck
    pub combo: u32,
    /// Latched once either side drops to zero hp
    pub winner: Option<Owner>,
    /// Status line shown to the player
    pub message: String,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub rings: Vec<Ring>,
    pub particles: Vec<Particle>,
    pub screen_shake: f32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

pub const OPENING_MESSAGE: &str = "Tune the equation channels (1-9), then cast (F/G/H).";
pub const RESTART_MESSAGE: &str = "New duel. Adjust the coefficients and cast your forms.";

impl GameState {
    /// New duel with the default balance table
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            player: Mage::new(&tuning.player),
            enemy: Mage::new(&tuning.enemy),
            tuning,
            channels: EquationChannels::default(),
            cooldowns: [0.0; SPELL_COUNT],
            selected_spell: SpellId::Lance,
            last_player_spell: None,
            projectiles: Vec::new(),
            enemy_brain: EnemyBrain::default(),
            combo: 0,
            winner: None,
            message: OPENING_MESSAGE.to_string(),
            time_ticks: 0,
            rings: Vec::new(),
            particles: Vec::new(),
            screen_shake: 0.0,
            events: Vec::new(),
        }
    }

    /// Reinitialize every field except the balance table
    pub fn reset(&mut self) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::with_tuning(tuning);
        self.message = RESTART_MESSAGE.to_string();
    }

    pub fn mage(&self, owner: Owner) -> &Mage {
        match owner {
            Owner::Player => &self.player,
            Owner::Enemy => &self.enemy,
        }
    }

    pub fn mage_mut(&mut self, owner: Owner) -> &mut Mage {
        match owner {
            Owner::Player => &mut self.player,
            Owner::Enemy => &mut self.enemy,
        }
    }

    pub fn cooldown(&self, spell: SpellId) -> f32 {
        self.cooldowns[spell.index()]
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add a spark, dropping it if the cap is reached
    pub fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() < MAX_PARTICLES {
            self.particles.push(particle);
        }
    }

    /// Check the invariants that must hold between frames
    pub fn invariants_hold(&self) -> bool {
        [&self.player, &self.enemy].iter().all(|m| {
            (0.0..=m.hp_max).contains(&m.hp)
                && (0.0..=m.mana_max).contains(&m.mana)
                && m.shield >= 0.0
                && m.burn >= 0.0
                && m.slow >= 0.0
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
