//! # mathquiz-engine: Multiplication Quiz Round Engine
//!
//! A deterministic engine for timed multiplication drills with two modes:
//! Classic (every pair of the 2..=9 table exactly once, no clock) and
//! Survival (endless random rounds, three lives, a clock that shrinks with
//! the score). The engine is a pure state machine; it never sleeps or spawns,
//! so callers drive it with answer, tick and transition events.
//!
//! ## Core Modules
//!
//! - [`engine`] - `GameController`, the event reducer, and its configuration
//! - [`state`] - Session state, modes, phases and the presentation snapshot
//! - [`pairs`] - Classic pair set and seeded Fisher-Yates queue generation
//! - [`round`] - A single question and its correct answer
//! - [`timer`] - Per-round countdown with the timeout latch
//! - [`rules`] - Constants, difficulty curve and answer parsing
//! - [`errors`] - Error types for configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use mathquiz_engine::engine::{EngineConfig, GameController, Outcome};
//! use mathquiz_engine::state::Mode;
//!
//! let mut game = GameController::new(EngineConfig::new(Mode::Survival).with_seed(42));
//! let round = game.state().round();
//!
//! let outcome = game.submit_answer(&round.correct_answer().to_string());
//! assert_eq!(outcome, Outcome::Correct);
//! assert_eq!(game.snapshot().score, 1);
//! ```
//!
//! ## Deterministic Queues
//!
//! Classic queues are reproducible from a seed:
//!
//! ```rust
//! use mathquiz_engine::pairs::PairQueue;
//!
//! let q1 = PairQueue::new_with_seed(42);
//! let q2 = PairQueue::new_with_seed(42);
//! assert_eq!(q1, q2);
//! assert_eq!(q1.len(), 36);
//! ```
//!
//! ## Driving the Clock
//!
//! Ticks carry the id of the round they were started for; ticks for any
//! other round are reported as stale and change nothing:
//!
//! ```rust
//! use mathquiz_engine::engine::{EngineConfig, GameController};
//! use mathquiz_engine::state::Mode;
//! use mathquiz_engine::timer::TickOutcome;
//!
//! let mut game = GameController::new(EngineConfig::new(Mode::Survival).with_seed(1));
//! let id = game.state().round_id();
//! assert_eq!(game.tick(id), TickOutcome::Counted { seconds_left: 4 });
//! assert_eq!(game.tick(id + 100), TickOutcome::Stale);
//! ```

pub mod engine;
pub mod errors;
pub mod pairs;
pub mod round;
pub mod rules;
pub mod state;
pub mod timer;
