//! HUD text
//!
//! Produces positioned text items for whatever font renderer the host
//! provides. Boxes, bars and card frames behind the text are drawn by
//! [`crate::renderer::scene`] from the same [`layout`] constants.

use glam::Vec2;

use crate::Settings;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::renderer::vertex::rgba;
use crate::sim::spells::SpellId;
use crate::sim::state::{EnemyPhase, GameState, Owner};

/// Screen positions shared by the HUD and the scene
pub mod layout {
    use glam::Vec2;

    use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

    /// Height of the top panel
    pub const PANEL_HEIGHT: f32 = 118.0;

    pub const BAR_WIDTH: f32 = 320.0;
    pub const HP_BAR_HEIGHT: f32 = 16.0;
    pub const MANA_BAR_HEIGHT: f32 = 14.0;
    pub const PLAYER_HP_BAR: Vec2 = Vec2::new(24.0, 56.0);
    pub const PLAYER_MANA_BAR: Vec2 = Vec2::new(24.0, 78.0);
    pub const ENEMY_HP_BAR: Vec2 = Vec2::new(ARENA_WIDTH - 344.0, 56.0);
    pub const ENEMY_MANA_BAR: Vec2 = Vec2::new(ARENA_WIDTH - 344.0, 78.0);

    pub const CARD_SIZE: Vec2 = Vec2::new(300.0, 80.0);
    pub const CARD_STRIDE: f32 = 314.0;
    pub const CARD_LEFT: f32 = 16.0;
    pub const CARD_TOP: f32 = ARENA_HEIGHT - 96.0;

    /// Top-left corner of the card for catalog slot `index`
    pub fn card_origin(index: usize) -> Vec2 {
        Vec2::new(CARD_LEFT + CARD_STRIDE * index as f32, CARD_TOP)
    }
}

/// Relative font size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Title,
    Body,
    Small,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    /// Top-left corner in arena coordinates
    pub pos: Vec2,
    pub text: String,
    pub color: [f32; 4],
    pub size: TextSize,
    /// Center horizontally on `pos.x` instead of left-aligning
    pub centered: bool,
}

impl HudText {
    fn new(pos: Vec2, text: impl Into<String>, color: [f32; 4], size: TextSize) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            size,
            centered: false,
        }
    }

    fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

pub const TITLE: &str = "ARCANE EQUATION: BATTLE OF FORMS";
pub const KEY_HELP: &str = "1/2:a± 3/4:b± 5/6:c± 7/8:ω± 9:φ+ | F/G/H: cast | Space: barrier";
const CAST_KEYS: [&str; 3] = ["F", "G", "H"];

const TEXT: [f32; 4] = [0.93, 0.92, 1.0, 1.0];
const ACCENT: [f32; 4] = [1.0, 0.85, 0.45, 1.0];
const DIM: [f32; 4] = [0.82, 0.82, 1.0, 1.0];
const GOOD: [f32; 4] = [0.5, 1.0, 0.7, 1.0];
const BAD: [f32; 4] = [1.0, 0.43, 0.55, 1.0];
const INTENT: [f32; 4] = [1.0, 0.8, 0.8, 1.0];

/// Text lines for the current frame
pub fn build_hud(state: &GameState, settings: &Settings) -> Vec<HudText> {
    use layout::*;

    let mut out = Vec::with_capacity(24);
    out.push(HudText::new(Vec2::new(20.0, 10.0), TITLE, ACCENT, TextSize::Title));

    let player = &state.player;
    out.push(HudText::new(
        PLAYER_HP_BAR + Vec2::new(4.0, 38.0),
        format!(
            "Mage HP {:.0}/{:.0} | Mana {:.0}",
            player.hp, player.hp_max, player.mana
        ),
        TEXT,
        TextSize::Small,
    ));

    let enemy = &state.enemy;
    out.push(HudText::new(
        ENEMY_HP_BAR + Vec2::new(6.0, 38.0),
        format!(
            "Archon HP {:.0}/{:.0} | Phase: {}",
            enemy.hp,
            enemy.hp_max,
            state.enemy_brain.phase.as_str()
        ),
        if state.enemy_brain.phase == EnemyPhase::Desperate {
            BAD
        } else {
            TEXT
        },
        TextSize::Small,
    ));
    if settings.show_enemy_intent {
        out.push(HudText::new(
            ENEMY_HP_BAR + Vec2::new(6.0, 58.0),
            format!("Intent: {}", state.enemy_brain.intent),
            INTENT,
            TextSize::Small,
        ));
    }

    out.push(HudText::new(
        Vec2::new(350.0, 58.0),
        channels_line(state),
        TEXT,
        TextSize::Body,
    ));
    if settings.show_help {
        out.push(HudText::new(
            Vec2::new(350.0, 86.0),
            KEY_HELP,
            DIM,
            TextSize::Small,
        ));
    }

    for spell in SpellId::ALL {
        let origin = card_origin(spell.index());
        let def = spell.def();
        let color = rgba(def.color, 1.0);
        out.push(HudText::new(
            origin + Vec2::new(10.0, 8.0),
            format!("{} - {}", CAST_KEYS[spell.index()], def.name),
            TEXT,
            TextSize::Small,
        ));
        out.push(HudText::new(
            origin + Vec2::new(10.0, 28.0),
            def.equation,
            DIM,
            TextSize::Small,
        ));
        out.push(HudText::new(
            origin + Vec2::new(10.0, 50.0),
            card_stats(state, spell),
            color,
            TextSize::Small,
        ));
    }

    let last = state
        .last_player_spell
        .map_or("none", |spell| spell.def().name);
    out.push(HudText::new(
        Vec2::new(980.0, ARENA_HEIGHT - 50.0),
        format!("Combo: x{} | Last spell: {}", state.combo, last),
        GOOD,
        TextSize::Small,
    ));
    out.push(HudText::new(
        Vec2::new(980.0, ARENA_HEIGHT - 28.0),
        state.message.clone(),
        TEXT,
        TextSize::Small,
    ));

    if let Some(winner) = state.winner {
        let center = Vec2::new(ARENA_WIDTH * 0.5, ARENA_HEIGHT * 0.5);
        let (title, color) = match winner {
            Owner::Player => ("Arcane Victory", GOOD),
            Owner::Enemy => ("Occult Defeat", BAD),
        };
        out.push(
            HudText::new(center - Vec2::new(0.0, 40.0), title, color, TextSize::Title).centered(),
        );
        out.push(
            HudText::new(
                center + Vec2::new(0.0, 12.0),
                "R: restart | Esc: quit",
                TEXT,
                TextSize::Body,
            )
            .centered(),
        );
    }

    out
}

/// "Channels: a=2.0  b=1.0 ..." readout
pub fn channels_line(state: &GameState) -> String {
    let ch = &state.channels;
    format!(
        "Channels: a={:.1}  b={:.1}  c={:.1}  ω={:.1}  φ={:.2}",
        ch.a, ch.b, ch.c, ch.omega, ch.phi
    )
}

/// "Power 0.66 | Mana 18 | CD 0.00s" line of a spell card
pub fn card_stats(state: &GameState, spell: SpellId) -> String {
    let def = spell.def();
    format!(
        "Power {:.2} | Mana {:.0} | CD {:.2}s",
        def.power(&state.channels),
        def.mana_cost,
        state.cooldown(spell).max(0.0)
    )
}
