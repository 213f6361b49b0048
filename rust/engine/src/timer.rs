use serde::{Deserialize, Serialize};

/// Result of delivering one clock tick to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickOutcome {
    /// The countdown moved down by one second.
    Counted { seconds_left: u8 },
    /// The round expired; the controller treats it as a wrong answer.
    TimedOut,
    /// A timeout for this expiry was already signalled.
    Suppressed,
    /// The clock is not running (Classic mode, between rounds, or game over).
    Inert,
    /// The tick belongs to a round that is no longer current.
    Stale,
}

/// Cooperative once-per-second countdown for a single round.
///
/// `timeout_in_flight` latches on expiry so overlapping ticks during the same
/// expiry window cannot signal a second timeout. The controller clears it when
/// the next round begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    round_duration: u8,
    seconds_left: u8,
    timeout_in_flight: bool,
}

impl RoundTimer {
    pub fn new(round_duration: u8) -> Self {
        Self {
            round_duration,
            seconds_left: round_duration,
            timeout_in_flight: false,
        }
    }

    pub fn round_duration(&self) -> u8 {
        self.round_duration
    }

    pub fn seconds_left(&self) -> u8 {
        self.seconds_left
    }

    pub fn timeout_in_flight(&self) -> bool {
        self.timeout_in_flight
    }

    /// Advances the countdown by one second.
    ///
    /// When the countdown would drop below one, the tick reports
    /// [`TickOutcome::TimedOut`] instead and refills `seconds_left` from the
    /// current round duration.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathquiz_engine::timer::{RoundTimer, TickOutcome};
    ///
    /// let mut timer = RoundTimer::new(2);
    /// assert_eq!(timer.tick(), TickOutcome::Counted { seconds_left: 1 });
    /// assert_eq!(timer.tick(), TickOutcome::TimedOut);
    /// assert_eq!(timer.seconds_left(), 2);
    /// assert_eq!(timer.tick(), TickOutcome::Suppressed);
    /// ```
    pub fn tick(&mut self) -> TickOutcome {
        if self.timeout_in_flight {
            return TickOutcome::Suppressed;
        }
        if self.seconds_left <= 1 {
            self.timeout_in_flight = true;
            self.seconds_left = self.round_duration;
            return TickOutcome::TimedOut;
        }
        self.seconds_left -= 1;
        TickOutcome::Counted {
            seconds_left: self.seconds_left,
        }
    }

    /// Changes the round duration and refills the countdown.
    pub fn set_duration(&mut self, round_duration: u8) {
        self.round_duration = round_duration;
        self.seconds_left = round_duration;
    }

    pub fn restart(&mut self) {
        self.seconds_left = self.round_duration;
    }

    pub fn clear_latch(&mut self) {
        self.timeout_in_flight = false;
    }
}
