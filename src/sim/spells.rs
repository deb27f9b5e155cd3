//! Spell catalog and the power formula
//!
//! Spells are static data. Their strength at cast time comes from the live
//! equation channels through a school-specific formula.

use serde::{Deserialize, Serialize};

use super::channels::EquationChannels;

/// Mathematical family of a spell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum School {
    Linear,
    Quadratic,
    Sine,
}

impl School {
    /// Inclusive range the power of this school is clamped to
    pub const fn power_range(self) -> (f32, f32) {
        match self {
            School::Linear => (0.4, 2.5),
            School::Quadratic => (0.5, 2.8),
            School::Sine => (0.5, 2.4),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            School::Linear => "Linear",
            School::Quadratic => "Quadratic",
            School::Sine => "Sine",
        }
    }
}

/// Index into [`SPELLS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellId {
    Lance,
    Orb,
    Wave,
}

impl SpellId {
    pub const ALL: [SpellId; SPELL_COUNT] = [SpellId::Lance, SpellId::Orb, SpellId::Wave];

    pub const fn index(self) -> usize {
        match self {
            SpellId::Lance => 0,
            SpellId::Orb => 1,
            SpellId::Wave => 2,
        }
    }

    pub fn def(self) -> &'static SpellDef {
        &SPELLS[self.index()]
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct SpellDef {
    pub id: SpellId,
    pub name: &'static str,
    pub school: School,
    /// Linear RGB, 0-1
    pub color: [f32; 3],
    pub mana_cost: f32,
    /// Seconds between player casts
    pub cooldown: f32,
    /// Projectile speed before power scaling (units/s)
    pub speed: f32,
    /// Projectile radius
    pub size: f32,
    pub base_damage: f32,
    /// Projectile lifetime in seconds
    pub life: f32,
    /// Equation shown on the spell card
    pub equation: &'static str,
}

const fn rgb(r: u8, g: u8, b: u8) -> [f32; 3] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// Number of spells in the catalog
pub const SPELL_COUNT: usize = 3;

pub static SPELLS: [SpellDef; SPELL_COUNT] = [
    SpellDef {
        id: SpellId::Lance,
        name: "Linear Lance",
        school: School::Linear,
        color: rgb(110, 220, 255),
        mana_cost: 18.0,
        cooldown: 0.4,
        speed: 540.0,
        size: 10.0,
        base_damage: 16.0,
        life: 2.9,
        equation: "E = a·x + b",
    },
    SpellDef {
        id: SpellId::Orb,
        name: "Quadratic Orb",
        school: School::Quadratic,
        color: rgb(230, 120, 255),
        mana_cost: 28.0,
        cooldown: 1.0,
        speed: 420.0,
        size: 14.0,
        base_damage: 34.0,
        life: 3.6,
        equation: "E = ax² + bx + c",
    },
    SpellDef {
        id: SpellId::Wave,
        name: "Sine Wave",
        school: School::Sine,
        color: rgb(130, 255, 180),
        mana_cost: 22.0,
        cooldown: 0.7,
        speed: 470.0,
        size: 11.0,
        base_damage: 22.0,
        life: 3.0,
        equation: "E = A·sin(ωx+φ)",
    },
];

/// Power multiplier of a school for the given channels
pub fn spell_power(school: School, ch: &EquationChannels) -> f32 {
    let raw = match school {
        School::Linear => ch.a.abs() * 0.25 + ch.b.abs() * 0.16,
        School::Quadratic => ch.a.abs() * 0.2 + ch.b.abs() * 0.12 + ch.c.abs() * 0.07,
        School::Sine => ch.a.abs() * 0.19 + ch.omega.abs() * 0.32 + ch.phi.sin().abs(),
    };
    let (min, max) = school.power_range();
    raw.clamp(min, max)
}

impl SpellDef {
    pub fn power(&self, ch: &EquationChannels) -> f32 {
        spell_power(self.school, ch)
    }

    /// Launch speed at a given power
    pub fn launch_speed(&self, power: f32) -> f32 {
        self.speed * (0.85 + power * 0.22)
    }

    /// Damage carried by a single projectile at a given power
    pub fn projectile_damage(&self, power: f32) -> f32 {
        match self.school {
            School::Sine => self.base_damage * power * 0.7,
            _ => self.base_damage * power,
        }
    }

    /// Total damage if every projectile of one cast lands
    pub fn volley_damage(&self, power: f32) -> f32 {
        match self.school {
            School::Sine => self.projectile_damage(power) * 3.0,
            _ => self.projectile_damage(power),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_channels_linear_power() {
        let ch = EquationChannels::default();
        let power = spell_power(School::Linear, &ch);
        assert!((power - 0.66).abs() < 1e-5, "power was {power}");
    }

    #[test]
    fn test_catalog_ids_match_slots() {
        for id in SpellId::ALL {
            assert_eq!(id.def().id, id);
        }
    }

    #[test]
    fn test_quadratic_floor_applies() {
        let ch = EquationChannels {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            ..EquationChannels::default()
        };
        assert_eq!(spell_power(School::Quadratic, &ch), 0.5);
    }

    #[test]
    fn test_sine_volley_exceeds_single_projectile() {
        let wave = SpellId::Wave.def();
        let p = 1.0;
        assert!(wave.volley_damage(p) > wave.projectile_damage(p));
        assert!((wave.projectile_damage(p) - 22.0 * 0.7).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_power_stays_in_school_range(
            a in -1.0e4f32..1.0e4,
            b in -1.0e4f32..1.0e4,
            c in -1.0e4f32..1.0e4,
            omega in -1.0e4f32..1.0e4,
            phi in -1.0e4f32..1.0e4,
        ) {
            let ch = EquationChannels { a, b, c, omega, phi };
            for school in [School::Linear, School::Quadratic, School::Sine] {
                let (min, max) = school.power_range();
                let power = spell_power(school, &ch);
                prop_assert!(power >= min && power <= max);
            }
        }
    }
}
