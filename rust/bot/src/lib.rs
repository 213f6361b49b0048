//! # mathquiz-bot: Simulated Quiz Players
//!
//! Scripted players for driving the quiz engine without a human: useful for
//! simulations, benchmarks and end-to-end tests.
//!
//! ## Core Components
//!
//! - [`Responder`] - Trait every simulated player implements
//! - [`responders`] - `Perfect`, `Noisy` and `Idle` players
//! - [`create_responder`] - Factory for players by name
//! - [`autoplay`] - Plays a whole session against a pure `GameController`
//!
//! ## Quick Start
//!
//! ```rust
//! use mathquiz_bot::{autoplay::autoplay, create_responder};
//! use mathquiz_engine::engine::{EngineConfig, GameController};
//! use mathquiz_engine::state::Mode;
//!
//! let mut game = GameController::new(EngineConfig::new(Mode::Classic).with_seed(42));
//! let mut player = create_responder("perfect", 42).expect("known player");
//!
//! let report = autoplay(&mut game, player.as_mut(), 1_000);
//! assert!(report.victory);
//! assert_eq!(report.score, 36);
//! ```

use mathquiz_engine::round::Round;

pub mod autoplay;
pub mod responders;

/// Accuracy used by `create_responder("noisy", ..)`.
pub const DEFAULT_NOISY_ACCURACY: f64 = 0.8;

/// What a simulated player does with the question on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Type this text and submit it.
    Answer(String),
    /// Do nothing and let the round clock run out.
    Wait,
}

/// Trait defining the interface for simulated players.
///
/// # Example Implementation
///
/// ```rust
/// use mathquiz_bot::{Responder, Response};
/// use mathquiz_engine::round::Round;
///
/// struct AlwaysSeven;
///
/// impl Responder for AlwaysSeven {
///     fn respond(&mut self, _round: &Round) -> Response {
///         Response::Answer("7".into())
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysSeven"
///     }
/// }
/// ```
pub trait Responder: Send {
    /// Decide what to do with `round`.
    fn respond(&mut self, round: &Round) -> Response;

    /// Return the name/identifier of this player.
    fn name(&self) -> &str;
}

/// Factory function to create simulated players by name.
///
/// `seed` only matters for players with randomness. Returns `None` for an
/// unknown name.
///
/// # Supported Players
///
/// - `"perfect"` - Always answers correctly
/// - `"noisy"` - Correct with probability [`DEFAULT_NOISY_ACCURACY`]
/// - `"idle"` - Never answers
///
/// # Example
///
/// ```rust
/// use mathquiz_bot::create_responder;
///
/// let player = create_responder("perfect", 0).expect("known player");
/// assert_eq!(player.name(), "Perfect");
/// assert!(create_responder("cheater", 0).is_none());
/// ```
pub fn create_responder(name: &str, seed: u64) -> Option<Box<dyn Responder>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "perfect" => Some(Box::new(responders::Perfect)),
        "noisy" => Some(Box::new(responders::Noisy::new(DEFAULT_NOISY_ACCURACY, seed))),
        "idle" => Some(Box::new(responders::Idle)),
        _ => None,
    }
}
