//! Synchronous play-through of a session against the pure controller, with
//! clock ticks and transitions delivered by hand.

use crate::{Responder, Response};
use mathquiz_engine::engine::GameController;
use mathquiz_engine::state::Phase;
use mathquiz_engine::timer::TickOutcome;

/// Final figures of one automated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayReport {
    pub score: u32,
    pub wrong_attempts: u32,
    pub lives: u8,
    pub victory: bool,
    /// `false` when the session was still running at the round limit, or a
    /// waiting player stalled a Classic session.
    pub finished: bool,
    /// Questions the player was shown.
    pub rounds: usize,
}

/// Plays `game` with `player` until it ends or `max_rounds` questions have
/// been shown.
///
/// A [`Response::Wait`] in Survival runs the round clock out; in Classic there
/// is no clock, so waiting stops the play-through.
pub fn autoplay(
    game: &mut GameController,
    player: &mut dyn Responder,
    max_rounds: usize,
) -> AutoplayReport {
    let mut rounds = 0;
    while !game.state().is_game_over() && rounds < max_rounds {
        debug_assert_eq!(game.state().phase(), Phase::Active);
        rounds += 1;

        match player.respond(&game.state().round()) {
            Response::Answer(raw) => {
                game.submit_answer(&raw);
            }
            Response::Wait => {
                if !game.clock_running() {
                    break;
                }
                run_clock_out(game);
            }
        }

        if let Some(ticket) = game.pending_transition() {
            game.complete_transition(ticket.id);
        }
    }

    let state = game.state();
    AutoplayReport {
        score: state.score(),
        wrong_attempts: state.wrong_attempts(),
        lives: state.lives(),
        victory: state.phase() == Phase::Victory,
        finished: state.is_game_over(),
        rounds,
    }
}

fn run_clock_out(game: &mut GameController) {
    let round_id = game.state().round_id();
    while let TickOutcome::Counted { .. } = game.tick(round_id) {}
}
