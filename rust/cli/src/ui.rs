//! UI helper functions for terminal output formatting.
//!
//! This module provides utility functions for consistent user interface output
//! across CLI commands, including error messages and warnings.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Warn that a flag has no effect with the other options given
pub fn warn_parameter_unused(
    err: &mut dyn Write,
    param_name: &str,
    reason: &str,
) -> std::io::Result<()> {
    display_warning(err, &format!("--{} is ignored: {}", param_name, reason))
}
