//! # mathquiz CLI Library
//!
//! This library provides the command-line interface for the multiplication
//! quiz engine: interactive play, batch simulation with scripted players,
//! queue inspection and configuration display.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand. [`run_with_input`] does the same
//! with an explicit answer source instead of stdin.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["mathquiz", "play", "--mode", "survival"];
//! let code = mathquiz_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play a Classic or Survival session, answers read from stdin
//! - `sim`: Play many sessions with a simulated player and print aggregates
//! - `deal`: Print the shuffled Classic queue for a seed
//! - `cfg`: Display the resolved configuration and the source of each value

use clap::Parser;
use std::io::{BufRead, BufReader, Write};
pub mod cli;
mod commands;
mod config;
mod error;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{Commands, MathquizCli};
use commands::{
    PlayOptions, SimOptions, handle_cfg_command, handle_deal_command, handle_play_command,
    handle_sim_command,
};

pub use commands::SimReport;
pub use error::{CliError, EXIT_ERROR, EXIT_INTERRUPTED, EXIT_SUCCESS};

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand
/// handler. `play` reads answers from the process stdin.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["mathquiz", "deal", "--seed", "42"];
/// let code = mathquiz_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    run_with_input(args, BufReader::new(std::io::stdin()), out, err)
}

/// Like [`run`], with `play` answers read from `input`.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = mathquiz_cli::run_with_input(
///     ["mathquiz", "play", "--mode", "classic", "--seed", "1"],
///     Cursor::new("q\n"),
///     &mut out,
///     &mut err,
/// );
/// assert_eq!(code, 0);
/// ```
pub fn run_with_input<I, S, R>(args: I, input: R, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    R: BufRead + Send + 'static,
{
    const COMMANDS: &[&str] = &["play", "sim", "deal", "cfg"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match MathquizCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return EXIT_ERROR;
                    }
                    EXIT_SUCCESS
                }
                _ => {
                    if writeln!(err, "{}", e).is_err()
                        || writeln!(err, "Usage: mathquiz <command> [options]\n").is_err()
                        || writeln!(err, "Commands:").is_err()
                    {
                        return EXIT_ERROR;
                    }
                    for c in COMMANDS {
                        if writeln!(err, "  {}", c).is_err() {
                            return EXIT_ERROR;
                        }
                    }
                    let _ = writeln!(err, "\nFor full help, run: mathquiz --help");
                    EXIT_ERROR
                }
            };
        }
    };

    if cli.verbose {
        // a subscriber installed by an earlier call in this process stays in place
        let _ = mathquiz_session::init_logging();
    }

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Deal { seed } => handle_deal_command(seed, out),
        Commands::Play {
            mode,
            seed,
            feedback_ms,
        } => handle_play_command(
            PlayOptions {
                mode,
                seed,
                feedback_ms,
            },
            input,
            out,
            err,
        ),
        Commands::Sim {
            mode,
            sessions,
            player,
            accuracy,
            seed,
            max_rounds,
        } => handle_sim_command(
            SimOptions {
                mode,
                sessions,
                player,
                accuracy,
                seed,
                max_rounds,
            },
            out,
            err,
        ),
    };

    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            e.exit_code()
        }
    }
}
