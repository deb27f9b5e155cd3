//! Presentation settings
//!
//! Nothing here touches the simulation: two duels with different settings
//! play out identically and only draw differently.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum sparks drawn per frame
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 160,
            QualityPreset::High => 256,
        }
    }

    /// Background stars
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 80,
            QualityPreset::High => 140,
        }
    }

    /// Triangle fan segments for a full circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 40,
        }
    }

    /// Whether projectiles get a soft outer glow
    pub fn glow_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Impact sparks
    pub particles: bool,
    /// Expanding rings on hits and orb casts
    pub rings: bool,

    // === HUD ===
    /// Key help line at the bottom of the screen
    pub show_help: bool,
    /// Enemy phase and intent readout
    pub show_enemy_intent: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no pulsing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            particles: true,
            rings: true,

            show_help: true,
            show_enemy_intent: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.rings = false;
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective spark cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_low_preset_trims_effects() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.rings);
        assert_eq!(settings.quality.star_count(), 0);
        assert!(settings.max_particles() < Settings::default().max_particles());
    }

    #[test]
    fn test_particles_toggle() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"quality":"High"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.screen_shake);
    }
}
