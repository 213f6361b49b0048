#![allow(dead_code)]

use mathquiz_engine::engine::EngineConfig;
use mathquiz_engine::state::Mode;
use mathquiz_session::{
    new_session_id, spawn_session, EventBus, EventSubscription, QuizEvent, SessionHandle,
};
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Started {
    pub handle: SessionHandle,
    pub task: JoinHandle<()>,
    pub sub: EventSubscription,
    pub bus: EventBus,
}

/// Spawns a session with a subscription registered before the task starts.
pub fn start(mode: Mode, seed: u64, feedback_ms: u64) -> Started {
    let bus = EventBus::new();
    let id = new_session_id();
    let sub = bus.subscribe(id.clone());
    let config = EngineConfig::new(mode)
        .with_seed(seed)
        .with_feedback_delay_ms(feedback_ms);
    let (handle, task) = spawn_session(id, config, bus.clone()).expect("spawn session");
    Started {
        handle,
        task,
        sub,
        bus,
    }
}

pub async fn next_event(sub: &mut EventSubscription) -> QuizEvent {
    tokio::time::timeout(Duration::from_secs(60), sub.receiver.recv())
        .await
        .expect("event within a minute")
        .expect("bus still open")
}

/// Skips events until one satisfies `pred`, returning the skipped ones too.
pub async fn wait_for<F>(sub: &mut EventSubscription, pred: F) -> (QuizEvent, Vec<QuizEvent>)
where
    F: Fn(&QuizEvent) -> bool,
{
    let mut skipped = Vec::new();
    loop {
        let event = next_event(sub).await;
        if pred(&event) {
            return (event, skipped);
        }
        skipped.push(event);
    }
}

pub fn kinds(events: &[QuizEvent]) -> Vec<&'static str> {
    events.iter().map(QuizEvent::kind).collect()
}
