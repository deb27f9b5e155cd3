//! Data-driven game balance
//!
//! Every number that shapes the duel but is not part of a spell definition
//! lives here. Defaults reproduce the standard duel; alternative rule sets
//! are plain JSON documents layered over the defaults and validated before
//! they reach a [`crate::sim::GameState`].

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Starting stats and per-second rates for one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MageTuning {
    pub start_pos: Vec2,
    pub hp_max: f32,
    pub mana_max: f32,
    /// Mana regenerated per second
    pub mana_regen: f32,
    /// Shield lost per second
    pub shield_decay: f32,
    /// Fraction of raw projectile damage the shield loses per hit taken
    pub shield_absorb: f32,
}

/// Axis-aligned movement region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min: Vec2,
    pub max: Vec2,
}

impl Region {
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        pos.clamp(self.min, self.max)
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.cmpge(self.min).all() && pos.cmple(self.max).all()
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: MageTuning,
    pub enemy: MageTuning,

    /// Burn and slow stacks lost per second
    pub status_decay: f32,
    /// Burn damage per stack per second
    pub burn_dps: f32,
    /// Burn stacks added per player hit, and cap
    pub burn_per_hit: f32,
    pub burn_cap: f32,
    /// Slow stacks added per enemy hit, and cap
    pub slow_per_hit: f32,
    pub slow_cap: f32,

    /// Barrier action: mana cost, shield gained, shield cap
    pub barrier_cost: f32,
    pub barrier_gain: f32,
    pub barrier_cap: f32,

    /// Player movement speed and slow penalty per stack (capped)
    pub player_speed: f32,
    pub slow_penalty_per_stack: f32,
    pub slow_penalty_cap: f32,
    pub player_region: Region,
    pub enemy_region: Region,

    /// Enemy mana discount factor on casts
    pub enemy_cost_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: MageTuning {
                start_pos: Vec2::new(220.0, ARENA_HEIGHT * 0.5),
                hp_max: 180.0,
                mana_max: 120.0,
                mana_regen: 12.0,
                shield_decay: 2.2,
                shield_absorb: 0.30,
            },
            enemy: MageTuning {
                start_pos: Vec2::new(ARENA_WIDTH - 220.0, ARENA_HEIGHT * 0.5),
                hp_max: 260.0,
                mana_max: 200.0,
                mana_regen: 9.0,
                shield_decay: 1.5,
                shield_absorb: 0.35,
            },
            status_decay: 1.0,
            burn_dps: 3.2,
            burn_per_hit: 0.7,
            burn_cap: 4.0,
            slow_per_hit: 0.35,
            slow_cap: 2.0,
            barrier_cost: 18.0,
            barrier_gain: 12.0,
            barrier_cap: 26.0,
            player_speed: 260.0,
            slow_penalty_per_stack: 0.2,
            slow_penalty_cap: 0.6,
            player_region: Region {
                min: Vec2::new(90.0, 120.0),
                max: Vec2::new(ARENA_WIDTH * 0.45, ARENA_HEIGHT - 100.0),
            },
            enemy_region: Region {
                min: Vec2::new(ARENA_WIDTH * 0.55, 130.0),
                max: Vec2::new(ARENA_WIDTH - 120.0, ARENA_HEIGHT - 110.0),
            },
            enemy_cost_factor: 0.7,
        }
    }
}

/// Why a balance table was rejected
#[derive(Debug)]
pub enum TuningError {
    Json(serde_json::Error),
    Invalid { field: String, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Json(err) => write!(f, "malformed tuning: {}", err),
            TuningError::Invalid { field, reason } => write!(f, "{} {}", field, reason),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Json(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Json(err)
    }
}

fn invalid(field: impl Into<String>, reason: &'static str) -> TuningError {
    TuningError::Invalid {
        field: field.into(),
        reason,
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite number >= 0"))
    }
}

fn positive(field: &str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be a finite number > 0"))
    }
}

fn fraction(field: &str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must lie in [0, 1]"))
    }
}

/// Recursively overlay `patch` onto `base`; objects merge, anything else
/// replaces
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

impl MageTuning {
    fn validate(&self, side: &str) -> Result<(), TuningError> {
        if !self.start_pos.is_finite() {
            return Err(invalid(format!("{side}.start_pos"), "must be finite"));
        }
        positive(&format!("{side}.hp_max"), self.hp_max)?;
        positive(&format!("{side}.mana_max"), self.mana_max)?;
        non_negative(&format!("{side}.mana_regen"), self.mana_regen)?;
        non_negative(&format!("{side}.shield_decay"), self.shield_decay)?;
        fraction(&format!("{side}.shield_absorb"), self.shield_absorb)
    }
}

impl Region {
    fn validate(&self, name: &str) -> Result<(), TuningError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid(name, "corners must be finite"));
        }
        if !self.min.cmple(self.max).all() {
            return Err(invalid(name, "min must not exceed max"));
        }
        Ok(())
    }
}

impl Tuning {
    /// Parse a balance table layered over the defaults, so a partial
    /// document (nested tables included) only changes the fields it names.
    /// The result is validated.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let patch: Value = serde_json::from_str(json)?;
        let mut table = serde_json::to_value(Tuning::default())?;
        merge(&mut table, patch);
        let tuning: Tuning = serde_json::from_value(table)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value a duel relies on to keep hp and mana in range
    pub fn validate(&self) -> Result<(), TuningError> {
        self.player.validate("player")?;
        self.enemy.validate("enemy")?;

        for (field, value) in [
            ("status_decay", self.status_decay),
            ("burn_dps", self.burn_dps),
            ("burn_per_hit", self.burn_per_hit),
            ("burn_cap", self.burn_cap),
            ("slow_per_hit", self.slow_per_hit),
            ("slow_cap", self.slow_cap),
            ("barrier_cost", self.barrier_cost),
            ("barrier_gain", self.barrier_gain),
            ("barrier_cap", self.barrier_cap),
            ("player_speed", self.player_speed),
            ("slow_penalty_per_stack", self.slow_penalty_per_stack),
        ] {
            non_negative(field, value)?;
        }
        fraction("slow_penalty_cap", self.slow_penalty_cap)?;
        fraction("enemy_cost_factor", self.enemy_cost_factor)?;

        self.player_region.validate("player_region")?;
        self.enemy_region.validate("enemy_region")?;
        if !self.player_region.contains(self.player.start_pos) {
            return Err(invalid("player.start_pos", "must lie inside player_region"));
        }
        if !self.enemy_region.contains(self.enemy.start_pos) {
            return Err(invalid("enemy.start_pos", "must lie inside enemy_region"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Movement speed multiplier for a given number of slow stacks
    pub fn slow_multiplier(&self, slow: f32) -> f32 {
        1.0 - (slow * self.slow_penalty_per_stack).min(self.slow_penalty_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "burn_dps": 5.0 }"#).unwrap();
        assert_eq!(tuning.burn_dps, 5.0);
        assert_eq!(tuning.barrier_cost, Tuning::default().barrier_cost);
        assert_eq!(tuning.player, Tuning::default().player);
    }

    #[test]
    fn test_json_roundtrip_preserves_table() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ burn_dps: }").is_err());
    }

    #[test]
    fn test_partial_nested_table_keeps_side_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "hp_max": 100 } }"#).unwrap();
        let defaults = Tuning::default();
        assert_eq!(tuning.player.hp_max, 100.0);
        assert_eq!(tuning.player.mana_max, defaults.player.mana_max);
        assert_eq!(tuning.player.start_pos, defaults.player.start_pos);
        assert_eq!(tuning.enemy, defaults.enemy);

        let tuning = Tuning::from_json(r#"{ "enemy_region": { "max": [1200, 700] } }"#).unwrap();
        assert_eq!(tuning.enemy_region.min, defaults.enemy_region.min);
        assert_eq!(tuning.enemy_region.max, Vec2::new(1200.0, 700.0));
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        let cases = [
            (r#"{ "enemy_cost_factor": -5.0 }"#, "enemy_cost_factor"),
            (r#"{ "enemy_cost_factor": 1.5 }"#, "enemy_cost_factor"),
            (r#"{ "player": { "hp_max": -1 } }"#, "player.hp_max"),
            (r#"{ "player": { "hp_max": 0 } }"#, "player.hp_max"),
            (r#"{ "enemy": { "mana_max": -5 } }"#, "enemy.mana_max"),
            (r#"{ "enemy": { "mana_regen": -1 } }"#, "enemy.mana_regen"),
            (r#"{ "player": { "shield_decay": -0.5 } }"#, "player.shield_decay"),
            (r#"{ "player": { "shield_absorb": 1.2 } }"#, "player.shield_absorb"),
            (r#"{ "barrier_cost": -18 }"#, "barrier_cost"),
            (r#"{ "barrier_cap": -1 }"#, "barrier_cap"),
            (r#"{ "burn_dps": -3 }"#, "burn_dps"),
            (r#"{ "status_decay": -1 }"#, "status_decay"),
            (r#"{ "slow_cap": -2 }"#, "slow_cap"),
            (r#"{ "player_speed": -260 }"#, "player_speed"),
            (r#"{ "slow_penalty_cap": 2.0 }"#, "slow_penalty_cap"),
            (
                r#"{ "player_region": { "min": [500, 120], "max": [90, 660] } }"#,
                "player_region",
            ),
            (
                r#"{ "enemy_region": { "min": [704, 700], "max": [1160, 650] } }"#,
                "enemy_region",
            ),
            (r#"{ "player": { "start_pos": [1000, 380] } }"#, "player.start_pos"),
        ];
        for (json, expected) in cases {
            match Tuning::from_json(json) {
                Err(TuningError::Invalid { field, .. }) => assert_eq!(field, expected, "{json}"),
                other => panic!("{json} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = Tuning::from_json(r#"{ "player": { "mana_max": -5 } }"#).unwrap_err();
        assert_eq!(err.to_string(), "player.mana_max must be a finite number > 0");

        let err = Tuning::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, TuningError::Json(_)));
        assert!(err.to_string().starts_with("malformed tuning"));
    }

    #[test]
    fn test_accepted_table_starts_a_valid_duel() {
        let tuning = Tuning::from_json(
            r#"{ "enemy_cost_factor": 1.0, "player": { "hp_max": 100, "mana_max": 60 } }"#,
        )
        .unwrap();
        let state = crate::sim::GameState::with_tuning(tuning);
        assert!(state.invariants_hold());
        assert_eq!(state.player.hp, 100.0);
        assert_eq!(state.player.mana, 60.0);
    }

    #[test]
    fn test_slow_multiplier_caps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.slow_multiplier(0.0), 1.0);
        assert!((tuning.slow_multiplier(1.0) - 0.8).abs() < 1e-6);
        assert!((tuning.slow_multiplier(10.0) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_regions_are_on_their_own_halves() {
        let tuning = Tuning::default();
        assert!(tuning.player_region.max.x < tuning.enemy_region.min.x);
        assert!(tuning.player_region.contains(tuning.player.start_pos));
        assert!(tuning.enemy_region.contains(tuning.enemy.start_pos));
    }
}
