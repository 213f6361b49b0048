/// Error handling for the session runtime
///
/// This module provides:
/// - `SessionError`, returned by session handles and the session manager
/// - Machine-readable error codes and severity classification
/// - Severity-aware logging through `tracing`
use mathquiz_engine::errors::EngineError;
use thiserror::Error;

use crate::runtime::SessionId;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session closed: {0}")]
    Closed(SessionId),
    #[error("Session expired: {0}")]
    Expired(SessionId),
    #[error("Session storage poisoned")]
    StoragePoisoned,
    #[error("Invalid session configuration: {0}")]
    Engine(#[from] EngineError),
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Caller mistakes (unknown or finished sessions) - expected, normal operation
    Client,
    /// Unexpected failures that need investigation
    Server,
    /// Shared state integrity at risk
    Critical,
}

impl SessionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::Closed(_) => "session_closed",
            SessionError::Expired(_) => "session_expired",
            SessionError::StoragePoisoned => "session_storage_error",
            SessionError::Engine(_) => "invalid_config",
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            SessionError::Closed(_) => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }

    /// Logs the error at the level matching its severity.
    pub fn log(&self) {
        let code = self.error_code();
        match self.severity() {
            ErrorSeverity::Client => tracing::info!(error_code = code, error = %self, "session request failed"),
            ErrorSeverity::Server => tracing::error!(error_code = code, error = %self, "session runtime error"),
            ErrorSeverity::Critical => {
                tracing::error!(error_code = code, error = %self, critical = true, "session storage compromised")
            }
        }
    }
}
