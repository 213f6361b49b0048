use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;
use crate::round::Round;
use crate::rules::{BASE_ROUND_SECS, STARTING_LIVES};
use crate::timer::RoundTimer;

/// Session mode, chosen when the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every pair from the Classic set exactly once, no clock, no lives.
    Classic,
    /// Endless random rounds against a shrinking clock with three lives.
    Survival,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Survival => "survival",
        }
    }

    /// Whether the round clock runs in this mode.
    pub fn is_timed(&self) -> bool {
        matches!(self, Mode::Survival)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "classique" => Ok(Mode::Classic),
            "survival" | "survie" => Ok(Mode::Survival),
            _ => Err(EngineError::UnknownMode(s.to_string())),
        }
    }
}

/// Where the session sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// A question is on screen and the clock (if any) is running.
    Active,
    /// An answer was judged; the next question appears after the feedback delay.
    RoundTransition,
    /// Survival ran out of lives.
    GameOver,
    /// Classic cleared every pair.
    Victory,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Victory)
    }
}

/// The authoritative record of one play session.
///
/// Only [`crate::engine::GameController`] mutates it; everything else reads it
/// through the getters or a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) mode: Mode,
    pub(crate) lives: u8,
    pub(crate) score: u32,
    pub(crate) wrong_attempts: u32,
    pub(crate) game_over: bool,
    pub(crate) phase: Phase,
    pub(crate) round: Round,
    pub(crate) round_id: u64,
    pub(crate) epoch: u64,
    #[serde(flatten)]
    pub(crate) timer: RoundTimer,
}

impl SessionState {
    pub(crate) fn fresh(mode: Mode, round: Round, round_id: u64, epoch: u64) -> Self {
        Self {
            mode,
            lives: STARTING_LIVES,
            score: 0,
            wrong_attempts: 0,
            game_over: false,
            phase: Phase::Active,
            round,
            round_id,
            epoch,
            timer: RoundTimer::new(BASE_ROUND_SECS),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn lives(&self) -> u8 {
        self.lives
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn round(&self) -> Round {
        self.round
    }
    pub fn round_id(&self) -> u64 {
        self.round_id
    }
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }
    pub fn seconds_left(&self) -> u8 {
        self.timer.seconds_left()
    }
    pub fn round_duration(&self) -> u8 {
        self.timer.round_duration()
    }
    pub fn timeout_in_flight(&self) -> bool {
        self.timer.timeout_in_flight()
    }
}

/// Read-only view handed to the presentation layer after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub a: u8,
    pub b: u8,
    pub score: u32,
    pub lives: u8,
    pub wrong_attempts: u32,
    pub seconds_left: u8,
    pub round_duration: u8,
    pub game_over: bool,
    pub is_victory: bool,
    pub remaining_pair_count: usize,
    pub total_pairs: usize,
    pub phase: Phase,
    pub round_id: u64,
    pub epoch: u64,
}

impl Snapshot {
    pub fn round(&self) -> Round {
        Round::new(self.a, self.b)
    }

    /// Heart icons, filled from the left by remaining lives.
    pub fn hearts(&self) -> [bool; STARTING_LIVES as usize] {
        let mut hearts = [false; STARTING_LIVES as usize];
        for (i, heart) in hearts.iter_mut().enumerate() {
            *heart = i < usize::from(self.lives);
        }
        hearts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_aliases_case_insensitively() {
        assert_eq!("Classic".parse::<Mode>(), Ok(Mode::Classic));
        assert_eq!(" survie ".parse::<Mode>(), Ok(Mode::Survival));
        assert_eq!("SURVIVAL".parse::<Mode>(), Ok(Mode::Survival));
        assert_eq!(
            "arcade".parse::<Mode>(),
            Err(EngineError::UnknownMode("arcade".into()))
        );
    }

    #[test]
    fn fresh_state_matches_session_start_values() {
        let s = SessionState::fresh(Mode::Survival, Round::new(3, 4), 1, 0);
        assert_eq!(s.lives(), 3);
        assert_eq!(s.score(), 0);
        assert_eq!(s.wrong_attempts(), 0);
        assert!(!s.is_game_over());
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.round_duration(), 5);
        assert_eq!(s.seconds_left(), 5);
        assert!(!s.timeout_in_flight());
    }

    #[test]
    fn state_serializes_timer_fields_inline() {
        let s = SessionState::fresh(Mode::Classic, Round::new(2, 2), 1, 0);
        let json = serde_json::to_value(&s).expect("serialize");
        assert_eq!(json["mode"], "classic");
        assert_eq!(json["seconds_left"], 5);
        assert_eq!(json["timeout_in_flight"], false);
        assert_eq!(json["phase"], "active");
    }

    #[test]
    fn hearts_follow_lives() {
        let snap = Snapshot {
            mode: Mode::Survival,
            a: 2,
            b: 3,
            score: 0,
            lives: 2,
            wrong_attempts: 1,
            seconds_left: 5,
            round_duration: 5,
            game_over: false,
            is_victory: false,
            remaining_pair_count: 0,
            total_pairs: 0,
            phase: Phase::Active,
            round_id: 1,
            epoch: 0,
        };
        assert_eq!(snap.hearts(), [true, true, false]);
        assert_eq!(snap.round().correct_answer(), 6);
    }
}
