use crate::runtime::SessionId;
use mathquiz_engine::engine::Outcome;
use mathquiz_engine::round::Round;
use mathquiz_engine::state::{Mode, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;

// Bounded so a stalled subscriber cannot grow memory without limit; events
// for a full subscriber are dropped and the subscriber is pruned.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<QuizEvent>;
pub type EventReceiver = mpsc::Receiver<QuizEvent>;

pub struct EventSubscription {
    bus: EventBus,
    session_id: SessionId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.session_id, self.subscriber_id);
    }
}

/// Fan-out of [`QuizEvent`]s to the subscribers of each session.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<SessionId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, session_id: SessionId) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(session_id.clone());
        EventSubscription {
            bus: self.clone(),
            session_id,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, session_id: SessionId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.write()
            .entry(session_id.clone())
            .or_default()
            .push((id, tx));

        tracing::debug!(
            session_id = %session_id,
            subscriber_id = id,
            "subscribed to quiz events"
        );

        (id, rx)
    }

    pub fn broadcast(&self, session_id: &SessionId, event: QuizEvent) {
        tracing::trace!(
            session_id = %session_id,
            event_type = event.kind(),
            "broadcasting quiz event"
        );

        let subscribers = self.read().get(session_id).cloned();

        let Some(list) = subscribers else {
            tracing::trace!(session_id = %session_id, "no subscribers for session");
            return;
        };

        let mut failed = Vec::new();
        for (id, sender) in list {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    session_id = %session_id,
                    subscriber_id = id,
                    error = ?e,
                    "dropping quiz event for subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(session_id, &failed);
        }
    }

    pub fn unsubscribe(&self, session_id: &SessionId, subscriber_id: usize) {
        self.remove_subscribers(session_id, &[subscriber_id]);
    }

    pub fn drop_session(&self, session_id: &SessionId) {
        self.write().remove(session_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.read().values().map(|list| list.len()).sum()
    }

    fn remove_subscribers(&self, session_id: &SessionId, ids: &[usize]) {
        let mut guard = self.write();
        if let Some(list) = guard.get_mut(session_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(session_id);
            }
        }
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Vec<(usize, EventSender)>>> {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Vec<(usize, EventSender)>>> {
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Why a session stopped producing rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Classic queue cleared.
    Victory,
    /// Survival lives exhausted.
    GameOver,
    TerminatedByRequest,
    Expired,
}

/// Final figures of one play-through, reported when it ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: Mode,
    pub score: u32,
    pub wrong_attempts: u32,
    pub victory: bool,
    /// Wall time since the session (or its last reset) started.
    pub elapsed_ms: u64,
    pub epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    SessionStarted {
        session_id: SessionId,
        mode: Mode,
        seed: u64,
        snapshot: Snapshot,
    },
    AnswerJudged {
        session_id: SessionId,
        round: Round,
        outcome: Outcome,
        snapshot: Snapshot,
    },
    TimedOut {
        session_id: SessionId,
        round: Round,
        snapshot: Snapshot,
    },
    RoundStarted {
        session_id: SessionId,
        snapshot: Snapshot,
    },
    SessionEnded {
        session_id: SessionId,
        reason: EndReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<SessionSummary>,
    },
    SessionReset {
        session_id: SessionId,
        snapshot: Snapshot,
    },
}

impl QuizEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            QuizEvent::SessionStarted { .. } => "session_started",
            QuizEvent::AnswerJudged { .. } => "answer_judged",
            QuizEvent::TimedOut { .. } => "timed_out",
            QuizEvent::RoundStarted { .. } => "round_started",
            QuizEvent::SessionEnded { .. } => "session_ended",
            QuizEvent::SessionReset { .. } => "session_reset",
        }
    }

    pub fn session_id(&self) -> &SessionId {
        match self {
            QuizEvent::SessionStarted { session_id, .. }
            | QuizEvent::AnswerJudged { session_id, .. }
            | QuizEvent::TimedOut { session_id, .. }
            | QuizEvent::RoundStarted { session_id, .. }
            | QuizEvent::SessionEnded { session_id, .. }
            | QuizEvent::SessionReset { session_id, .. } => session_id,
        }
    }
}
