//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Randomness only through an injected, seeded RNG
//! - Stable iteration order (insertion order of every entity list)
//! - No rendering or platform dependencies

pub mod ai;
pub mod autopilot;
pub mod cast;
pub mod channels;
pub mod collision;
pub mod projectiles;
pub mod session;
pub mod spells;
pub mod state;
pub mod tick;

pub use cast::{cast, player_can_cast};
pub use channels::{Channel, ChannelParseError, ChannelStep, EquationChannels};
pub use session::Session;
pub use spells::{SPELLS, School, SpellDef, SpellId, spell_power};
pub use state::{
    EnemyBrain, EnemyPhase, GameEvent, GameState, Mage, Owner, Particle, Projectile, Ring,
};
pub use tick::{InputEvent, TickInput, tick};
