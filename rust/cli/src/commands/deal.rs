//! Deal command handler: shows the Classic queue a seed produces.

use crate::error::CliError;
use crate::formatters::format_round;
use mathquiz_engine::pairs::PairQueue;
use mathquiz_engine::round::Round;
use std::io::Write;

/// Handle the deal command.
///
/// Prints the seed followed by the 36 Classic pairs in the order a session
/// started with that seed would ask them. Without a seed a random one is
/// drawn and printed so the order can be reproduced.
pub fn handle_deal_command(seed: Option<u64>, out: &mut dyn Write) -> Result<(), CliError> {
    let seed = seed.unwrap_or_else(rand::random);
    let queue = PairQueue::new_with_seed(seed);

    writeln!(out, "Seed: {}", seed)?;
    for (i, pair) in queue.iter().enumerate() {
        writeln!(out, "{:>2}. {}", i + 1, format_round(&Round::from(*pair)))?;
    }
    Ok(())
}
