//! Simulation command handler.
//!
//! Plays many sessions back to back against the pure engine with a simulated
//! player and prints aggregate figures as JSON. Nothing sleeps: the clock of
//! a Survival round is run out by delivering ticks directly.

use crate::cli::Player;
use crate::config;
use crate::error::CliError;
use crate::ui;
use mathquiz_bot::autoplay::{AutoplayReport, autoplay};
use mathquiz_bot::responders::Noisy;
use mathquiz_bot::{Responder, create_responder};
use mathquiz_engine::engine::{EngineConfig, GameController};
use mathquiz_engine::state::Mode;
use serde::{Deserialize, Serialize};
use std::io::Write;

// Keeps the player's random stream apart from the session's.
const PLAYER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub mode: Option<Mode>,
    pub sessions: u32,
    pub player: Player,
    pub accuracy: Option<f64>,
    pub seed: Option<u64>,
    pub max_rounds: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    pub mode: Mode,
    pub player: String,
    pub seed: u64,
    pub sessions: u32,
    pub mean_score: f64,
    pub max_score: u32,
    pub victories: u32,
    pub mean_wrong_attempts: f64,
    /// Sessions still running when the round limit was reached.
    pub unfinished: u32,
}

/// Handle the sim command.
///
/// Session `i` is seeded with `seed + i`, so a whole run is reproducible from
/// the base seed printed in the report. Mode and seed fall back to the
/// resolved configuration.
pub fn handle_sim_command(
    opts: SimOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.sessions == 0 {
        return Err(CliError::InvalidInput("--sessions must be at least 1".into()));
    }
    if opts.max_rounds == 0 {
        return Err(CliError::InvalidInput("--max-rounds must be at least 1".into()));
    }
    if let Some(accuracy) = opts.accuracy {
        if !(0.0..=1.0).contains(&accuracy) {
            return Err(CliError::InvalidInput(format!(
                "--accuracy must be between 0 and 1, got {}",
                accuracy
            )));
        }
        if opts.player != Player::Noisy {
            ui::warn_parameter_unused(err, "accuracy", "only the noisy player uses it")?;
        }
    }

    let resolved = config::load_with_sources()?.config;
    let mode = opts.mode.unwrap_or(resolved.mode);
    let base_seed = opts.seed.or(resolved.seed).unwrap_or_else(rand::random);

    tracing::info!(
        mode = %mode,
        player = opts.player.as_str(),
        sessions = opts.sessions,
        seed = base_seed,
        "starting simulation"
    );

    let mut reports = Vec::with_capacity(opts.sessions as usize);
    for i in 0..opts.sessions {
        let seed = base_seed.wrapping_add(u64::from(i));
        let mut player = build_player(&opts, seed ^ PLAYER_SEED_SALT)?;
        let mut game = GameController::new(EngineConfig::new(mode).with_seed(seed));
        let report = autoplay(&mut game, player.as_mut(), opts.max_rounds);
        tracing::debug!(
            session = i,
            seed,
            score = report.score,
            wrong_attempts = report.wrong_attempts,
            victory = report.victory,
            "simulated session finished"
        );
        reports.push(report);
    }

    let summary = summarize(mode, &opts, base_seed, &reports);
    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    Ok(())
}

fn build_player(opts: &SimOptions, seed: u64) -> Result<Box<dyn Responder>, CliError> {
    if let (Player::Noisy, Some(accuracy)) = (opts.player, opts.accuracy) {
        return Ok(Box::new(Noisy::new(accuracy, seed)));
    }
    create_responder(opts.player.as_str(), seed)
        .ok_or_else(|| CliError::InvalidInput(format!("unknown player: {}", opts.player.as_str())))
}

fn summarize(mode: Mode, opts: &SimOptions, seed: u64, reports: &[AutoplayReport]) -> SimReport {
    let n = reports.len().max(1) as f64;
    let total_score: u64 = reports.iter().map(|r| u64::from(r.score)).sum();
    let total_wrong: u64 = reports.iter().map(|r| u64::from(r.wrong_attempts)).sum();
    let count = |pred: fn(&AutoplayReport) -> bool| reports.iter().filter(|r| pred(r)).count() as u32;

    SimReport {
        mode,
        player: opts.player.as_str().to_string(),
        seed,
        sessions: reports.len() as u32,
        mean_score: total_score as f64 / n,
        max_score: reports.iter().map(|r| r.score).max().unwrap_or(0),
        victories: count(|r| r.victory),
        mean_wrong_attempts: total_wrong as f64 / n,
        unfinished: count(|r| !r.finished),
    }
}
