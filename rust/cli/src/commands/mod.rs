//! Command handler modules for the mathquiz CLI.
//!
//! Each command is implemented in its own module file with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Module-private helpers: Helper functions specific to that command
//! - Dependency injection: Output streams (`&mut dyn Write`) passed as parameters
//! - Error propagation: All errors propagated via `CliError` enum

pub mod cfg;
pub mod deal;
pub mod play;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use play::{PlayOptions, handle_play_command};
pub use sim::{SimOptions, SimReport, handle_sim_command};
