//! Arcane Duel entry point
//!
//! Windowing, fonts and input belong to the host. On its own the binary
//! runs a headless attract-mode duel (autopilot against the enemy AI) as a
//! smoke run of the whole frame path: every frame's scene and HUD are built
//! exactly as a host would before drawing, and their peak sizes are logged
//! with the outcome.

use arcane_duel::Settings;
use arcane_duel::consts::SIM_DT;
use arcane_duel::hud::build_hud;
use arcane_duel::renderer::{Starfield, build_scene};
use arcane_duel::sim::{GameEvent, Session, TickInput};

/// Fixed seed so attract runs are reproducible
const ATTRACT_SEED: u64 = 0x0A2C_A4E5;
/// Give up after ten minutes of simulated play
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Log a progress line this often
const REPORT_EVERY: u32 = 60 * 10;

fn main() {
    env_logger::init();
    log::info!("Arcane Duel (native) starting attract mode...");

    let settings = Settings::default();
    let mut stars = Starfield::new(ATTRACT_SEED, settings.quality.star_count());
    let mut session = Session::new(ATTRACT_SEED);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut casts = 0u32;
    let mut hits = 0u32;
    let mut frame = 0u32;
    let mut peak_vertices = 0usize;
    let mut peak_hud = 0usize;
    while frame < MAX_FRAMES && session.state.winner.is_none() {
        session.advance(SIM_DT, &input);
        stars.update(SIM_DT);

        for event in session.state.drain_events() {
            match event {
                GameEvent::SpellCast { .. } => casts += 1,
                GameEvent::Hit { .. } => hits += 1,
                _ => {}
            }
            log::trace!("{event:?}");
        }

        let time = frame as f32 * SIM_DT;
        let vertices = build_scene(&session.state, &settings, &stars, time);
        let hud = build_hud(&session.state, &settings);
        peak_vertices = peak_vertices.max(vertices.len());
        peak_hud = peak_hud.max(hud.len());

        if frame % REPORT_EVERY == 0 {
            let state = &session.state;
            log::debug!(
                "t={:.0}s player {:.0}/{:.0} enemy {:.0}/{:.0} phase {} ({} vertices, {} hud lines)",
                time,
                state.player.hp,
                state.player.hp_max,
                state.enemy.hp,
                state.enemy.hp_max,
                state.enemy_brain.phase.as_str(),
                vertices.len(),
                hud.len()
            );
        }
        frame += 1;
    }
    log::info!("frame path: {frame} frames, peak {peak_vertices} vertices, {peak_hud} hud lines");

    let state = &session.state;
    match state.winner {
        Some(winner) => log::info!(
            "attract duel finished: {winner:?} wins after {:.1}s ({casts} casts, {hits} hits)",
            state.time_ticks as f32 * SIM_DT
        ),
        None => log::info!(
            "attract duel stopped undecided after {:.1}s ({casts} casts, {hits} hits)",
            state.time_ticks as f32 * SIM_DT
        ),
    }
}
