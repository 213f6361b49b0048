//! Error types and exit codes for the CLI application.

use crate::config::ConfigError;
use mathquiz_engine::errors::EngineError;
use mathquiz_session::SessionError;
use std::fmt;

/// Success exit code (standard Unix convention).
pub const EXIT_SUCCESS: i32 = 0;

/// General error exit code, also used for usage errors.
pub const EXIT_ERROR: i32 = 2;

/// Interrupted by user (Ctrl+C) exit code.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Custom error type for CLI operations.
///
/// Every command handler returns `Result<(), CliError>`; [`CliError::exit_code`]
/// maps the failure onto the process exit status.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (stdout/stderr writes, config file reads, runtime setup)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Rejected engine configuration
    Engine(EngineError),

    /// The session task stopped answering
    Session(SessionError),

    /// Operation was interrupted (e.g., by user with Ctrl+C)
    Interrupted(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Interrupted(_) => EXIT_INTERRUPTED,
            _ => EXIT_ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(e) => write!(f, "{}", e),
            CliError::Session(e) => write!(f, "Session error: {}", e),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Engine(e) => Some(e),
            CliError::Session(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<EngineError> for CliError {
    fn from(error: EngineError) -> Self {
        CliError::Engine(error)
    }
}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Engine(e) => CliError::Engine(e),
            other => CliError::Session(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::Io(std::io::Error::other(error))
    }
}
