//! Configuration command handler.
//!
//! This module implements the `cfg` command, which displays the resolved
//! configuration with the source of every value (default, environment,
//! or configuration file).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "mode": {
//!     "value": "classic",
//!     "source": "default"
//!   },
//!   "seed": {
//!     "value": 42,
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    let display = serde_json::json!({
        "mode": {
            "value": config.mode,
            "source": sources.mode,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "feedback_ms": {
            "value": config.feedback_ms,
            "source": sources.feedback_ms,
        },
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&display)?)?;
    Ok(())
}
