//! One tokio task per play session.
//!
//! The task owns the [`GameController`] outright; everything else talks to it
//! through a [`SessionHandle`]. Clock ticks and deferred round transitions are
//! produced by small child tasks that post signals back to the session task,
//! each tagged with the round id or ticket it was started for, so a signal
//! that arrives after the session moved on is rejected by the controller.

use mathquiz_engine::engine::{EngineConfig, GameController, Outcome, TransitionTicket};
use mathquiz_engine::state::{Phase, Snapshot};
use mathquiz_engine::timer::TickOutcome;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::errors::SessionError;
use crate::events::{EndReason, EventBus, QuizEvent, SessionSummary};

pub type SessionId = String;

const COMMAND_BUFFER: usize = 64;
const TICK_PERIOD: Duration = Duration::from_secs(1);

pub fn new_session_id() -> SessionId {
    Uuid::new_v4().to_string()
}

enum Command {
    Submit {
        raw: String,
        reply: oneshot::Sender<Outcome>,
    },
    Reset {
        reply: oneshot::Sender<Snapshot>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Copy)]
enum Signal {
    Tick { round_id: u64 },
    TransitionElapsed { ticket: u64 },
}

/// Cloneable front door to a running session task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified every time the snapshot is replaced.
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub async fn submit(&self, raw: impl Into<String>) -> Result<Outcome, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit {
            raw: raw.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| self.closed())
    }

    pub async fn reset(&self) -> Result<Snapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reset { reply }).await?;
        rx.await.map_err(|_| self.closed())
    }

    /// Stops the session task, cancelling its clock and any pending transition.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }

    /// Non-blocking variant of [`SessionHandle::shutdown`]; returns `false`
    /// when the request could not be queued.
    pub fn request_shutdown(&self) -> bool {
        self.commands.try_send(Command::Shutdown).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands.send(command).await.map_err(|_| self.closed())
    }

    fn closed(&self) -> SessionError {
        SessionError::Closed(self.id.clone())
    }
}

/// Validates `config` and spawns the session task on the current runtime.
///
/// Must be called from within a tokio runtime. Subscribe to `bus` for `id`
/// before calling this to observe the `SessionStarted` event.
pub fn spawn_session(
    id: SessionId,
    config: EngineConfig,
    bus: EventBus,
) -> Result<(SessionHandle, JoinHandle<()>), SessionError> {
    config.validate()?;

    let game = GameController::new(config);
    let (snapshot_tx, snapshot_rx) = watch::channel(game.snapshot());
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();

    let actor = SessionActor {
        id: id.clone(),
        game,
        bus,
        snapshots: snapshot_tx,
        signals: signal_tx,
        ticker: None,
        transition: None,
        started_at: Instant::now(),
        reported_epoch: None,
    };
    let task = tokio::spawn(actor.run(command_rx, signal_rx));

    let handle = SessionHandle {
        id,
        commands: command_tx,
        snapshots: snapshot_rx,
    };
    Ok((handle, task))
}

/// A child task keyed by the round id or ticket it serves. Dropping it aborts
/// the task.
struct ScheduledTask {
    key: u64,
    handle: JoinHandle<()>,
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct SessionActor {
    id: SessionId,
    game: GameController,
    bus: EventBus,
    snapshots: watch::Sender<Snapshot>,
    signals: mpsc::UnboundedSender<Signal>,
    ticker: Option<ScheduledTask>,
    transition: Option<ScheduledTask>,
    started_at: Instant,
    // epoch whose end has already been announced
    reported_epoch: Option<u64>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut signals: mpsc::UnboundedReceiver<Signal>,
    ) {
        tracing::info!(
            session_id = %self.id,
            mode = %self.game.mode(),
            seed = self.game.seed(),
            "session started"
        );
        self.bus.broadcast(
            &self.id,
            QuizEvent::SessionStarted {
                session_id: self.id.clone(),
                mode: self.game.mode(),
                seed: self.game.seed(),
                snapshot: self.game.snapshot(),
            },
        );
        self.sync_schedules();

        loop {
            tokio::select! {
                // commands first: a submission and a transition ready in the
                // same instant are applied in that order
                biased;
                command = commands.recv() => match command {
                    Some(Command::Submit { raw, reply }) => {
                        let outcome = self.on_submit(&raw);
                        let _ = reply.send(outcome);
                    }
                    Some(Command::Reset { reply }) => {
                        let snapshot = self.on_reset();
                        let _ = reply.send(snapshot);
                    }
                    Some(Command::Shutdown) | None => break,
                },
                Some(signal) = signals.recv() => self.on_signal(signal),
            }
        }

        self.ticker = None;
        self.transition = None;
        tracing::info!(session_id = %self.id, "session stopped");
    }

    fn on_submit(&mut self, raw: &str) -> Outcome {
        let round = self.game.state().round();
        let outcome = self.game.submit_answer(raw);
        tracing::debug!(
            session_id = %self.id,
            round_id = self.game.state().round_id(),
            round = %round,
            outcome = ?outcome,
            "answer judged"
        );
        if outcome == Outcome::Ignored {
            return outcome;
        }

        self.bus.broadcast(
            &self.id,
            QuizEvent::AnswerJudged {
                session_id: self.id.clone(),
                round,
                outcome,
                snapshot: self.game.snapshot(),
            },
        );
        self.after_change();
        outcome
    }

    fn on_reset(&mut self) -> Snapshot {
        self.game.reset();
        self.started_at = Instant::now();
        self.reported_epoch = None;
        let snapshot = self.game.snapshot();

        tracing::info!(
            session_id = %self.id,
            epoch = snapshot.epoch,
            "session reset"
        );
        self.bus.broadcast(
            &self.id,
            QuizEvent::SessionReset {
                session_id: self.id.clone(),
                snapshot: snapshot.clone(),
            },
        );
        self.after_change();
        snapshot
    }

    fn on_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Tick { round_id } => match self.game.tick(round_id) {
                TickOutcome::Counted { .. } => self.publish(),
                TickOutcome::TimedOut => {
                    tracing::debug!(
                        session_id = %self.id,
                        round_id,
                        lives = self.game.state().lives(),
                        "round timed out"
                    );
                    self.bus.broadcast(
                        &self.id,
                        QuizEvent::TimedOut {
                            session_id: self.id.clone(),
                            round: self.game.state().round(),
                            snapshot: self.game.snapshot(),
                        },
                    );
                    self.after_change();
                }
                ignored => {
                    tracing::trace!(session_id = %self.id, round_id, outcome = ?ignored, "tick ignored");
                }
            },
            Signal::TransitionElapsed { ticket } => {
                if self.transition.as_ref().is_some_and(|t| t.key == ticket) {
                    self.transition = None;
                }
                if !self.game.complete_transition(ticket) {
                    tracing::trace!(session_id = %self.id, ticket, "stale transition discarded");
                    return;
                }
                tracing::debug!(
                    session_id = %self.id,
                    round_id = self.game.state().round_id(),
                    round = %self.game.state().round(),
                    "round started"
                );
                self.bus.broadcast(
                    &self.id,
                    QuizEvent::RoundStarted {
                        session_id: self.id.clone(),
                        snapshot: self.game.snapshot(),
                    },
                );
                self.after_change();
            }
        }
    }

    fn after_change(&mut self) {
        self.sync_schedules();
        self.publish();
        self.announce_end();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.game.snapshot());
    }

    /// Brings the child tasks in line with the controller: one transition task
    /// for the pending ticket, one ticker for the current round while the
    /// clock runs, nothing otherwise.
    fn sync_schedules(&mut self) {
        match self.game.pending_transition() {
            Some(ticket) if self.transition.as_ref().map(|t| t.key) != Some(ticket.id) => {
                self.transition = Some(self.spawn_transition(ticket));
            }
            Some(_) => {}
            None => self.transition = None,
        }

        if self.game.clock_running() {
            let round_id = self.game.state().round_id();
            if self.ticker.as_ref().map(|t| t.key) != Some(round_id) {
                self.ticker = Some(self.spawn_ticker(round_id));
            }
        } else {
            self.ticker = None;
        }
    }

    fn spawn_transition(&self, ticket: TransitionTicket) -> ScheduledTask {
        let signals = self.signals.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ticket.delay()).await;
            let _ = signals.send(Signal::TransitionElapsed { ticket: ticket.id });
        });
        ScheduledTask {
            key: ticket.id,
            handle,
        }
    }

    fn spawn_ticker(&self, round_id: u64) -> ScheduledTask {
        let signals = self.signals.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if signals.send(Signal::Tick { round_id }).is_err() {
                    break;
                }
            }
        });
        ScheduledTask {
            key: round_id,
            handle,
        }
    }

    fn announce_end(&mut self) {
        let state = self.game.state();
        if !state.is_game_over() || self.reported_epoch == Some(state.epoch()) {
            return;
        }
        self.reported_epoch = Some(state.epoch());

        let victory = state.phase() == Phase::Victory;
        let summary = SessionSummary {
            mode: state.mode(),
            score: state.score(),
            wrong_attempts: state.wrong_attempts(),
            victory,
            elapsed_ms: u64::try_from(self.started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
            epoch: state.epoch(),
        };
        let reason = if victory {
            EndReason::Victory
        } else {
            EndReason::GameOver
        };

        tracing::info!(
            session_id = %self.id,
            reason = ?reason,
            score = summary.score,
            wrong_attempts = summary.wrong_attempts,
            elapsed_ms = summary.elapsed_ms,
            "session ended"
        );
        self.bus.broadcast(
            &self.id,
            QuizEvent::SessionEnded {
                session_id: self.id.clone(),
                reason,
                summary: Some(summary),
            },
        );
    }
}
