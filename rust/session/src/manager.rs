use mathquiz_engine::engine::{EngineConfig, Outcome};
use mathquiz_engine::state::Snapshot;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::errors::SessionError;
use crate::events::{EndReason, EventBus, QuizEvent};
use crate::runtime::{new_session_id, spawn_session, SessionHandle, SessionId};

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Registry of live sessions with an inactivity timeout.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<SessionEntry>>>,
    event_bus: Arc<EventBus>,
    session_ttl: Duration,
}

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    task: JoinHandle<()>,
    last_active: Mutex<Instant>,
}

impl SessionEntry {
    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() >= ttl,
            Err(_) => false,
        }
    }

    fn stop(&self) {
        if !self.handle.request_shutdown() {
            self.task.abort();
        }
    }
}

impl SessionManager {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self::with_ttl(event_bus, DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(event_bus: Arc<EventBus>, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            event_bus,
            session_ttl: ttl,
        }
    }

    /// Spawns a new session task. Must be called from within a tokio runtime.
    pub fn create_session(&self, config: EngineConfig) -> Result<SessionId, SessionError> {
        let id = new_session_id();

        tracing::info!(
            session_id = %id,
            mode = %config.mode,
            seed = ?config.seed,
            feedback_delay_ms = config.feedback_delay_ms,
            "creating quiz session"
        );

        let (handle, task) = spawn_session(id.clone(), config, (*self.event_bus).clone())?;
        let entry = Arc::new(SessionEntry {
            handle,
            task,
            last_active: Mutex::new(Instant::now()),
        });

        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard.insert(id.clone(), entry);
        Ok(id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<SessionHandle, SessionError> {
        self.entry(id).map(|entry| entry.handle.clone())
    }

    pub fn snapshot(&self, id: &SessionId) -> Result<Snapshot, SessionError> {
        let entry = self.live_entry(id)?;
        Ok(entry.handle.snapshot())
    }

    pub async fn submit(&self, id: &SessionId, raw: &str) -> Result<Outcome, SessionError> {
        let entry = self.live_entry(id)?;
        entry.handle.submit(raw).await
    }

    pub async fn reset(&self, id: &SessionId) -> Result<Snapshot, SessionError> {
        let entry = self.live_entry(id)?;
        entry.handle.reset().await
    }

    pub fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        match self.remove_session(id, EndReason::TerminatedByRequest)? {
            Some(_) => Ok(()),
            None => Err(SessionError::NotFound(id.clone())),
        }
    }

    pub fn cleanup_expired_sessions(&self) {
        let mut expired = Vec::new();
        {
            let mut guard = match self.sessions.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.retain(|id, entry| {
                if entry.is_expired(self.session_ttl) {
                    expired.push((id.clone(), Arc::clone(entry)));
                    false
                } else {
                    true
                }
            });
        }

        for (id, entry) in expired {
            tracing::info!(session_id = %id, "session expired due to inactivity");
            entry.stop();
            self.announce_removal(&id, EndReason::Expired);
        }
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    fn entry(&self, id: &SessionId) -> Result<Arc<SessionEntry>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Looks up a session, expiring it first if it sat idle past the TTL.
    fn live_entry(&self, id: &SessionId) -> Result<Arc<SessionEntry>, SessionError> {
        let entry = self.entry(id)?;
        if entry.is_expired(self.session_ttl) {
            self.remove_session(id, EndReason::Expired)?;
            let err = SessionError::Expired(id.clone());
            err.log();
            return Err(err);
        }
        entry.touch();
        Ok(entry)
    }

    fn remove_session(
        &self,
        id: &SessionId,
        reason: EndReason,
    ) -> Result<Option<Arc<SessionEntry>>, SessionError> {
        let removed = match self.sessions.write() {
            Ok(mut guard) => guard.remove(id),
            Err(_) => return Err(SessionError::StoragePoisoned),
        };
        if let Some(entry) = &removed {
            entry.stop();
            self.announce_removal(id, reason);
        }
        Ok(removed)
    }

    fn announce_removal(&self, id: &SessionId, reason: EndReason) {
        self.event_bus.broadcast(
            id,
            QuizEvent::SessionEnded {
                session_id: id.clone(),
                reason,
                summary: None,
            },
        );
        self.event_bus.drop_session(id);
    }
}

#[cfg(test)]
impl SessionManager {
    fn force_last_active(&self, id: &SessionId, instant: Instant) {
        if let Ok(entry) = self.entry(id) {
            if let Ok(mut guard) = entry.last_active.lock() {
                *guard = instant;
            }
        }
    }
}
