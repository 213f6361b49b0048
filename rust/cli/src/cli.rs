//! Command-line surface of the `mathquiz` binary.

use clap::{Parser, Subcommand, ValueEnum};
use mathquiz_engine::state::Mode;

#[derive(Debug, Parser)]
#[command(
    name = "mathquiz",
    version,
    about = "Timed multiplication drills for the 2..=9 tables"
)]
pub struct MathquizCli {
    /// Write diagnostic logs to stderr (filter with RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play a session interactively; answers are read from stdin
    Play {
        /// classic or survival; falls back to the configured mode
        #[arg(long, value_parser = parse_mode)]
        mode: Option<Mode>,
        #[arg(long)]
        seed: Option<u64>,
        /// Pause between an answer and the next question, in milliseconds
        #[arg(long = "feedback-ms")]
        feedback_ms: Option<u64>,
    },
    /// Play many sessions with a simulated player and print aggregate results
    Sim {
        #[arg(long, value_parser = parse_mode)]
        mode: Option<Mode>,
        #[arg(long, default_value_t = 100)]
        sessions: u32,
        #[arg(long, value_enum, default_value_t = Player::Perfect)]
        player: Player,
        /// Probability of a correct answer for the noisy player
        #[arg(long)]
        accuracy: Option<f64>,
        /// Base seed; session i uses seed + i
        #[arg(long)]
        seed: Option<u64>,
        /// Stop a session that has shown this many questions
        #[arg(long = "max-rounds", default_value_t = 500)]
        max_rounds: usize,
    },
    /// Print the shuffled Classic queue for a seed
    Deal {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the resolved configuration and where each value came from
    Cfg,
}

/// Simulated player for the `sim` command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Player {
    /// Always answers correctly.
    Perfect,
    /// Answers correctly with probability `--accuracy`.
    Noisy,
    /// Never answers; Survival rounds run out of time.
    Idle,
}

impl Player {
    /// Returns the name understood by `mathquiz_bot::create_responder`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use mathquiz_cli::cli::Player;
    /// assert_eq!(Player::Noisy.as_str(), "noisy");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Player::Perfect => "perfect",
            Player::Noisy => "noisy",
            Player::Idle => "idle",
        }
    }
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse().map_err(|e: mathquiz_engine::errors::EngineError| e.to_string())
}
