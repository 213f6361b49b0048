use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::EngineError;
use crate::pairs::{PairQueue, CLASSIC_PAIR_COUNT};
use crate::round::Round;
use crate::rules::{
    parse_answer, round_duration_for_score, DEFAULT_FEEDBACK_DELAY_MS, MAX_FEEDBACK_DELAY_MS,
};
use crate::state::{Mode, Phase, SessionState, Snapshot};
use crate::timer::TickOutcome;

/// Settings fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub mode: Mode,
    /// Seed for the ChaCha20 stream; `None` draws one at construction time.
    pub seed: Option<u64>,
    /// Delay between judging an answer and showing the next question.
    pub feedback_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Classic,
            seed: None,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
        }
    }
}

impl EngineConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_feedback_delay_ms(mut self, delay_ms: u64) -> Self {
        self.feedback_delay_ms = delay_ms;
        self
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.feedback_delay_ms > MAX_FEEDBACK_DELAY_MS {
            return Err(EngineError::InvalidFeedbackDelay {
                delay_ms: self.feedback_delay_ms,
                maximum_ms: MAX_FEEDBACK_DELAY_MS,
            });
        }
        Ok(())
    }
}

/// Handle for the single deferred round transition a session may have pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTicket {
    pub id: u64,
    pub delay_ms: u64,
}

impl TransitionTicket {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// How a submission was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    /// Empty or non-numeric input, a finished session, or a round that was
    /// already answered correctly. Nothing changed.
    Ignored,
}

/// Inputs the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit(String),
    /// One clock second elapsed for the round identified by `round_id`.
    Tick { round_id: u64 },
    /// The deferred transition identified by `ticket` fired.
    TransitionElapsed { ticket: u64 },
    Reset,
}

/// What [`GameController::dispatch`] did with an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Answer(Outcome),
    Tick(TickOutcome),
    /// The pending transition completed and a round is active again.
    Advanced,
    /// The transition ticket no longer matched and was dropped.
    Discarded,
    Reset,
}

#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    ticket: TransitionTicket,
    /// The transition brings in a new round instead of asking again.
    retires_round: bool,
    /// The round on screen was answered correctly; late submissions are
    /// ignored so it cannot score twice.
    answered: bool,
}

/// Quiz round engine: owns the session state, the Classic queue and the
/// random stream, and turns events into the next state.
///
/// The controller never sleeps or spawns. Timing is the caller's job: it reads
/// [`GameController::pending_transition`] and [`GameController::clock_running`]
/// after every event and feeds back `TransitionElapsed` and `Tick` events.
///
/// # Examples
///
/// ```
/// use mathquiz_engine::engine::{EngineConfig, GameController, Outcome};
/// use mathquiz_engine::state::{Mode, Phase};
///
/// let mut game = GameController::new(EngineConfig::new(Mode::Classic).with_seed(7));
/// let answer = game.state().round().correct_answer().to_string();
///
/// assert_eq!(game.submit_answer(&answer), Outcome::Correct);
/// assert_eq!(game.state().score(), 1);
/// assert_eq!(game.state().phase(), Phase::RoundTransition);
///
/// let ticket = game.pending_transition().expect("transition scheduled");
/// assert!(game.complete_transition(ticket.id));
/// assert_eq!(game.snapshot().remaining_pair_count, 35);
/// ```
#[derive(Debug)]
pub struct GameController {
    config: EngineConfig,
    seed: u64,
    rng: ChaCha20Rng,
    state: SessionState,
    queue: PairQueue,
    pending: Option<PendingTransition>,
    next_round_id: u64,
    next_ticket: u64,
}

impl GameController {
    pub fn new(config: EngineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let (queue, round) = Self::deal(config.mode, &mut rng);
        let state = SessionState::fresh(config.mode, round, 1, 0);
        Self {
            config,
            seed,
            rng,
            state,
            queue,
            pending: None,
            next_round_id: 2,
            next_ticket: 1,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The seed actually in use, including one drawn for an unseeded config.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn queue(&self) -> &PairQueue {
        &self.queue
    }

    pub fn snapshot(&self) -> Snapshot {
        let s = &self.state;
        let total_pairs = match s.mode {
            Mode::Classic => CLASSIC_PAIR_COUNT,
            Mode::Survival => 0,
        };
        Snapshot {
            mode: s.mode,
            a: s.round.a,
            b: s.round.b,
            score: s.score,
            lives: s.lives,
            wrong_attempts: s.wrong_attempts,
            seconds_left: s.timer.seconds_left(),
            round_duration: s.timer.round_duration(),
            game_over: s.game_over,
            is_victory: s.phase == Phase::Victory,
            remaining_pair_count: self.queue.len(),
            total_pairs,
            phase: s.phase,
            round_id: s.round_id,
            epoch: s.epoch,
        }
    }

    pub fn pending_transition(&self) -> Option<TransitionTicket> {
        self.pending.map(|p| p.ticket)
    }

    /// Whether ticks currently mean anything: Survival with a round on screen.
    pub fn clock_running(&self) -> bool {
        self.state.mode.is_timed() && self.state.phase == Phase::Active
    }

    pub fn dispatch(&mut self, event: Event) -> Applied {
        match event {
            Event::Submit(raw) => Applied::Answer(self.submit_answer(&raw)),
            Event::Tick { round_id } => Applied::Tick(self.tick(round_id)),
            Event::TransitionElapsed { ticket } => {
                if self.complete_transition(ticket) {
                    Applied::Advanced
                } else {
                    Applied::Discarded
                }
            }
            Event::Reset => {
                self.reset();
                Applied::Reset
            }
        }
    }

    /// Judges a raw answer against the current round.
    ///
    /// While a transition is pending the answer is still compared against the
    /// round on screen, in submission order. A late correct answer after a
    /// Survival miss or timeout scores and replaces the pending transition.
    /// Once the round on screen has been answered correctly, further
    /// submissions are ignored until the next round.
    pub fn submit_answer(&mut self, raw: &str) -> Outcome {
        if self.state.game_over {
            return Outcome::Ignored;
        }
        let Some(value) = parse_answer(raw) else {
            return Outcome::Ignored;
        };
        if self.pending.is_some_and(|p| p.answered) {
            return Outcome::Ignored;
        }

        if self.state.round.is_correct(value) {
            self.register_hit();
            Outcome::Correct
        } else {
            self.register_miss();
            Outcome::Incorrect
        }
    }

    /// Delivers one clock second for the round `round_id`.
    pub fn tick(&mut self, round_id: u64) -> TickOutcome {
        if round_id != self.state.round_id {
            return TickOutcome::Stale;
        }
        if !self.state.mode.is_timed() || self.state.game_over {
            return TickOutcome::Inert;
        }
        if self.state.timer.timeout_in_flight() {
            return TickOutcome::Suppressed;
        }
        if self.state.phase != Phase::Active {
            return TickOutcome::Inert;
        }

        let outcome = self.state.timer.tick();
        if outcome == TickOutcome::TimedOut {
            self.register_miss();
        }
        outcome
    }

    /// Completes the pending transition if `ticket` still identifies it.
    ///
    /// Returns `false` for superseded or unknown tickets, leaving the state
    /// untouched.
    pub fn complete_transition(&mut self, ticket: u64) -> bool {
        let pending = match self.pending {
            Some(p) if p.ticket.id == ticket => p,
            _ => return false,
        };
        self.pending = None;

        if pending.retires_round {
            let next = match self.state.mode {
                Mode::Survival => Round::random(&mut self.rng),
                Mode::Classic => match self.queue.front() {
                    Some(pair) => pair.into(),
                    None => {
                        self.finish(Phase::Victory);
                        return false;
                    }
                },
            };
            self.state.round = next;
            self.state.round_id = self.allocate_round_id();
        }

        self.state.timer.restart();
        self.state.timer.clear_latch();
        self.state.phase = Phase::Active;
        true
    }

    /// Starts the session over in the same mode.
    ///
    /// Any pending transition is dropped, so a late delivery of its ticket is
    /// discarded. The random stream continues rather than being reseeded.
    pub fn reset(&mut self) {
        self.pending = None;
        let (queue, round) = Self::deal(self.config.mode, &mut self.rng);
        self.queue = queue;
        let round_id = self.allocate_round_id();
        let epoch = self.state.epoch + 1;
        self.state = SessionState::fresh(self.config.mode, round, round_id, epoch);
    }

    fn deal(mode: Mode, rng: &mut ChaCha20Rng) -> (PairQueue, Round) {
        match mode {
            Mode::Classic => {
                let queue = PairQueue::generate(rng);
                // the full set is never empty
                let round = queue.front().map(Round::from).unwrap_or(Round::new(2, 2));
                (queue, round)
            }
            Mode::Survival => (PairQueue::default(), Round::random(rng)),
        }
    }

    fn register_hit(&mut self) {
        self.state.score += 1;
        match self.state.mode {
            Mode::Survival => {
                let duration = round_duration_for_score(self.state.score);
                self.state.timer.set_duration(duration);
                self.schedule_transition(true, true);
            }
            Mode::Classic => {
                self.queue.dequeue();
                if self.queue.is_empty() {
                    self.finish(Phase::Victory);
                } else {
                    self.schedule_transition(true, true);
                }
            }
        }
    }

    fn register_miss(&mut self) {
        self.state.wrong_attempts += 1;
        match self.state.mode {
            Mode::Survival => {
                self.state.lives = self.state.lives.saturating_sub(1);
                if self.state.lives == 0 {
                    self.finish(Phase::GameOver);
                    return;
                }
                self.state.timer.restart();
                self.schedule_transition(true, false);
            }
            // the same pair is asked again after the feedback delay
            Mode::Classic => self.schedule_transition(false, false),
        }
    }

    fn schedule_transition(&mut self, retires_round: bool, answered: bool) {
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(PendingTransition {
            ticket: TransitionTicket {
                id,
                delay_ms: self.config.feedback_delay_ms,
            },
            retires_round,
            answered,
        });
        self.state.phase = Phase::RoundTransition;
    }

    fn finish(&mut self, phase: Phase) {
        self.pending = None;
        self.state.game_over = true;
        self.state.phase = phase;
    }

    fn allocate_round_id(&mut self) -> u64 {
        let id = self.next_round_id;
        self.next_round_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::OperandPair;

    fn survival(seed: u64) -> GameController {
        GameController::new(EngineConfig::new(Mode::Survival).with_seed(seed))
    }

    fn classic_with_queue(pairs: &[(u8, u8)]) -> GameController {
        let mut game = GameController::new(EngineConfig::new(Mode::Classic).with_seed(1));
        game.queue = PairQueue::from_pairs(pairs.iter().map(|&(a, b)| OperandPair::new(a, b)));
        game.state.round = game.queue.front().map(Round::from).expect("non-empty");
        game
    }

    fn wrong_answer(game: &GameController) -> String {
        (game.state().round().correct_answer() + 1).to_string()
    }

    fn advance(game: &mut GameController) {
        let ticket = game.pending_transition().expect("pending transition");
        assert!(game.complete_transition(ticket.id));
    }

    #[test]
    fn classic_scenario_two_by_two_first() {
        let mut game = classic_with_queue(&[(2, 2), (3, 5), (4, 4)]);
        let before = game.queue().len();

        assert_eq!(game.submit_answer("4"), Outcome::Correct);
        assert_eq!(game.state().score(), 1);
        assert_eq!(game.queue().len(), before - 1);
        advance(&mut game);
        assert_eq!(game.state().round(), Round::new(3, 5));
        assert_eq!(game.state().phase(), Phase::Active);
    }

    #[test]
    fn classic_incorrect_keeps_round_and_lives() {
        let mut game = classic_with_queue(&[(6, 7), (2, 9)]);
        let round_id = game.state().round_id();

        assert_eq!(game.submit_answer("41"), Outcome::Incorrect);
        assert_eq!(game.state().wrong_attempts(), 1);
        assert_eq!(game.state().lives(), 3);
        assert_eq!(game.queue().len(), 2);
        advance(&mut game);
        assert_eq!(game.state().round(), Round::new(6, 7));
        assert_eq!(game.state().round_id(), round_id);
    }

    #[test]
    fn classic_retry_during_feedback_is_judged() {
        let mut game = classic_with_queue(&[(6, 7), (2, 9)]);
        game.submit_answer("1");
        let first = game.pending_transition().expect("pending");

        assert_eq!(game.submit_answer("42"), Outcome::Correct);
        let second = game.pending_transition().expect("replaced");
        assert_ne!(first.id, second.id);
        assert!(!game.complete_transition(first.id));
        assert!(game.complete_transition(second.id));
        assert_eq!(game.state().round(), Round::new(2, 9));
    }

    #[test]
    fn classic_last_pair_ends_in_victory_without_transition() {
        let mut game = classic_with_queue(&[(9, 9)]);
        assert_eq!(game.submit_answer("81"), Outcome::Correct);
        assert!(game.state().is_game_over());
        assert_eq!(game.state().phase(), Phase::Victory);
        assert!(game.pending_transition().is_none());
        assert!(game.snapshot().is_victory);
        assert_eq!(game.submit_answer("81"), Outcome::Ignored);
        assert_eq!(game.state().score(), 1);
    }

    #[test]
    fn survival_correct_shrinks_duration_at_five() {
        let mut game = survival(3);
        for _ in 0..5 {
            let answer = game.state().round().correct_answer().to_string();
            assert_eq!(game.submit_answer(&answer), Outcome::Correct);
            advance(&mut game);
        }
        assert_eq!(game.state().score(), 5);
        assert_eq!(game.state().round_duration(), 4);
        assert_eq!(game.state().seconds_left(), 4);
    }

    #[test]
    fn survival_miss_costs_a_life_and_draws_new_round() {
        let mut game = survival(11);
        let round_id = game.state().round_id();
        let wrong = wrong_answer(&game);

        assert_eq!(game.submit_answer(&wrong), Outcome::Incorrect);
        assert_eq!(game.state().lives(), 2);
        assert_eq!(game.state().phase(), Phase::RoundTransition);
        advance(&mut game);
        assert_ne!(game.state().round_id(), round_id);
    }

    #[test]
    fn survival_retired_round_ignores_late_answers() {
        let mut game = survival(12);
        let answer = game.state().round().correct_answer().to_string();
        game.submit_answer(&answer);
        assert_eq!(game.submit_answer(&answer), Outcome::Ignored);
        assert_eq!(game.submit_answer("0"), Outcome::Ignored);
        assert_eq!(game.state().score(), 1);
        assert_eq!(game.state().lives(), 3);
    }

    #[test]
    fn survival_late_answer_after_miss_is_judged_against_round_on_screen() {
        let mut game = survival(14);
        let round = game.state().round();
        let wrong = wrong_answer(&game);
        game.submit_answer(&wrong);
        let after_miss = game.pending_transition().expect("pending");

        let answer = round.correct_answer().to_string();
        assert_eq!(game.submit_answer(&answer), Outcome::Correct);
        assert_eq!(game.state().score(), 1);
        assert_eq!(game.state().lives(), 2);
        let after_hit = game.pending_transition().expect("replaced");
        assert_ne!(after_miss.id, after_hit.id);

        assert_eq!(game.submit_answer(&answer), Outcome::Ignored);
        assert_eq!(game.state().score(), 1);
        assert!(!game.complete_transition(after_miss.id));
        assert!(game.complete_transition(after_hit.id));
        assert_eq!(game.state().phase(), Phase::Active);
    }

    #[test]
    fn survival_late_answer_after_timeout_scores() {
        let mut game = survival(15);
        let id = game.state().round_id();
        for _ in 0..5 {
            game.tick(id);
        }
        assert_eq!(game.state().phase(), Phase::RoundTransition);
        assert_eq!(game.state().lives(), 2);

        let answer = game.state().round().correct_answer().to_string();
        assert_eq!(game.submit_answer(&answer), Outcome::Correct);
        assert_eq!(game.state().score(), 1);
        advance(&mut game);
        assert!(!game.state().timeout_in_flight());
        assert_ne!(game.state().round_id(), id);
    }

    #[test]
    fn survival_third_miss_ends_game_without_new_round() {
        let mut game = survival(13);
        for _ in 0..2 {
            let wrong = wrong_answer(&game);
            game.submit_answer(&wrong);
            advance(&mut game);
        }
        let round = game.state().round();
        let wrong = wrong_answer(&game);
        game.submit_answer(&wrong);

        assert_eq!(game.state().lives(), 0);
        assert!(game.state().is_game_over());
        assert_eq!(game.state().phase(), Phase::GameOver);
        assert!(game.pending_transition().is_none());
        assert_eq!(game.state().round(), round);
    }

    #[test]
    fn ticks_count_down_then_time_out() {
        let mut game = survival(21);
        let id = game.state().round_id();
        for left in [4, 3, 2, 1] {
            assert_eq!(game.tick(id), TickOutcome::Counted { seconds_left: left });
        }
        assert_eq!(game.tick(id), TickOutcome::TimedOut);
        assert_eq!(game.state().wrong_attempts(), 1);
        assert_eq!(game.state().lives(), 2);
        assert!(game.state().timeout_in_flight());
        assert_eq!(game.tick(id), TickOutcome::Suppressed);
        assert_eq!(game.state().lives(), 2);

        advance(&mut game);
        assert!(!game.state().timeout_in_flight());
        assert_eq!(game.state().seconds_left(), 5);
        assert_eq!(game.tick(id), TickOutcome::Stale);
    }

    #[test]
    fn ticks_are_inert_in_classic_and_after_game_over() {
        let mut game = GameController::new(EngineConfig::new(Mode::Classic).with_seed(2));
        let id = game.state().round_id();
        assert_eq!(game.tick(id), TickOutcome::Inert);
        assert_eq!(game.state().seconds_left(), 5);

        let mut game = survival(4);
        for _ in 0..3 {
            let wrong = wrong_answer(&game);
            game.submit_answer(&wrong);
            if let Some(t) = game.pending_transition() {
                game.complete_transition(t.id);
            }
        }
        let id = game.state().round_id();
        assert_eq!(game.tick(id), TickOutcome::Inert);
    }

    #[test]
    fn ticks_during_feedback_after_correct_are_inert() {
        let mut game = survival(8);
        let id = game.state().round_id();
        let answer = game.state().round().correct_answer().to_string();
        game.submit_answer(&answer);
        assert_eq!(game.tick(id), TickOutcome::Inert);
    }

    #[test]
    fn reset_drops_pending_transition() {
        let mut game = survival(30);
        let wrong = wrong_answer(&game);
        game.submit_answer(&wrong);
        let stale = game.pending_transition().expect("pending");

        game.reset();
        assert!(game.pending_transition().is_none());
        assert_eq!(game.state().epoch(), 1);
        assert!(!game.complete_transition(stale.id));
        assert_eq!(game.state().lives(), 3);
        assert_eq!(game.state().phase(), Phase::Active);
    }

    #[test]
    fn dispatch_routes_events() {
        let mut game = survival(40);
        assert_eq!(
            game.dispatch(Event::Submit("abc".into())),
            Applied::Answer(Outcome::Ignored)
        );
        let id = game.state().round_id();
        assert_eq!(
            game.dispatch(Event::Tick { round_id: id }),
            Applied::Tick(TickOutcome::Counted { seconds_left: 4 })
        );
        assert_eq!(
            game.dispatch(Event::TransitionElapsed { ticket: 99 }),
            Applied::Discarded
        );
        assert_eq!(game.dispatch(Event::Reset), Applied::Reset);
        assert_eq!(game.state().seconds_left(), 5);
    }

    #[test]
    fn config_rejects_long_feedback_delay() {
        let cfg = EngineConfig::new(Mode::Classic).with_feedback_delay_ms(60_000);
        assert_eq!(
            cfg.validate(),
            Err(EngineError::InvalidFeedbackDelay {
                delay_ms: 60_000,
                maximum_ms: MAX_FEEDBACK_DELAY_MS
            })
        );
        assert!(EngineConfig::default().validate().is_ok());
    }
}
