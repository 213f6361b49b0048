use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Unknown game mode: {0} (expected classic or survival)")]
    UnknownMode(String),
    #[error("Invalid feedback delay: {delay_ms} ms, maximum: {maximum_ms} ms")]
    InvalidFeedbackDelay { delay_ms: u64, maximum_ms: u64 },
}
