//! Async session runtime for the multiplication quiz engine.
//!
//! Each session runs as its own tokio task owning a
//! [`mathquiz_engine::engine::GameController`]; the task drives the Survival
//! clock and the post-answer feedback delay, publishes snapshots through a
//! `watch` channel and broadcasts [`QuizEvent`]s on an [`EventBus`].

pub mod errors;
pub mod events;
pub mod logging;
pub mod manager;
pub mod runtime;

pub use errors::{ErrorSeverity, SessionError};
pub use events::{EndReason, EventBus, EventSubscription, QuizEvent, SessionSummary};
pub use logging::{init_logging, init_test_logging, LogEntry, TestLogSubscriber};
pub use manager::SessionManager;
pub use runtime::{new_session_id, spawn_session, SessionHandle, SessionId};
