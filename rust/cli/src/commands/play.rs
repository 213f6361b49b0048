//! Interactive play on the session runtime.
//!
//! The command owns a single-threaded tokio runtime for the lifetime of one
//! `play` invocation. The session task does the timekeeping; this module only
//! turns its events into terminal output and typed lines into commands.
//!
//! Lines typed while no question is on screen (during the feedback pause)
//! are held and submitted once the next question appears, so piped input is
//! answered one question per line.

use crate::config;
use crate::error::CliError;
use crate::formatters::{
    format_correct, format_incorrect, format_question, format_result, format_timed_out,
};
use crate::io_utils::{InputLine, spawn_line_reader};
use crate::ui;
use crate::validation::{PlayInput, is_numeric_answer, parse_play_input};
use mathquiz_engine::engine::{EngineConfig, Outcome};
use mathquiz_engine::state::{Mode, Phase};
use mathquiz_session::{
    EndReason, EventBus, EventSubscription, QuizEvent, SessionHandle, new_session_id,
    spawn_session,
};
use std::collections::VecDeque;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub mode: Option<Mode>,
    pub seed: Option<u64>,
    pub feedback_ms: Option<u64>,
}

/// Handle the play command.
///
/// Flags override the resolved configuration. Reads answers from `input`
/// until `q`/`quit` or EOF; after the game ends `r` starts a new one.
///
/// # Errors
///
/// Returns `CliError::Engine` for a rejected configuration and
/// `CliError::Interrupted` when the user presses Ctrl+C.
pub fn handle_play_command<R>(
    opts: PlayOptions,
    input: R,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError>
where
    R: BufRead + Send + 'static,
{
    let mut cfg = config::load_with_sources()?.config;
    if let Some(mode) = opts.mode {
        cfg.mode = mode;
    }
    if let Some(seed) = opts.seed {
        cfg.seed = Some(seed);
    }
    if let Some(ms) = opts.feedback_ms {
        cfg.feedback_ms = ms;
    }
    let engine_config = cfg.engine_config();
    engine_config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(play_session(engine_config, input, out, err))
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

async fn play_session<R>(
    config: EngineConfig,
    input: R,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError>
where
    R: BufRead + Send + 'static,
{
    let bus = EventBus::new();
    let id = new_session_id();
    let events = bus.subscribe(id.clone());
    let (handle, task) = spawn_session(id, config, bus)?;

    let mut table = PlayTable {
        handle: handle.clone(),
        events,
        held: VecDeque::new(),
        game_over: false,
        out,
    };
    let result = table.run(spawn_line_reader(input), err).await;

    handle.shutdown().await;
    let _ = task.await;
    result
}

struct PlayTable<'a> {
    handle: SessionHandle,
    events: EventSubscription,
    held: VecDeque<String>,
    // set once the end of the current play-through has been shown
    game_over: bool,
    out: &'a mut dyn Write,
}

impl PlayTable<'_> {
    async fn run(
        &mut self,
        mut lines: tokio::sync::mpsc::Receiver<InputLine>,
        err: &mut dyn Write,
    ) -> Result<(), CliError> {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut watch_ctrl_c = true;
        let mut input_open = true;

        loop {
            tokio::select! {
                biased;
                event = self.events.receiver.recv() => match event {
                    Some(event) => {
                        if self.render(event)? == Flow::Quit {
                            return Ok(());
                        }
                    }
                    None => return Ok(()),
                },
                line = lines.recv(), if input_open => match line {
                    Some(InputLine::Text(line)) => self.held.push_back(line),
                    Some(InputLine::Undecodable) => {
                        ui::display_warning(err, "Skipped a line that is not valid UTF-8.")?;
                    }
                    None => input_open = false,
                },
                res = &mut ctrl_c, if watch_ctrl_c => match res {
                    Ok(()) => {
                        self.flush_events()?;
                        return Err(CliError::Interrupted("session interrupted".into()));
                    }
                    Err(e) => {
                        ui::display_warning(err, &format!("Ctrl+C handling unavailable: {}", e))?;
                        watch_ctrl_c = false;
                    }
                },
            }

            if self.drain().await? == Flow::Quit {
                return self.farewell();
            }
            if !input_open && self.held.is_empty() {
                self.flush_events()?;
                return self.farewell();
            }
        }
    }

    /// Applies held lines in order until one has to wait for the next question.
    async fn drain(&mut self) -> Result<Flow, CliError> {
        if self.flush_events()? == Flow::Quit {
            return Ok(Flow::Quit);
        }
        while let Some(line) = self.held.front() {
            // commands wait behind the pending question like answers do
            if !self.game_over && self.handle.snapshot().phase != Phase::Active {
                break;
            }
            let input = parse_play_input(line);
            if input == PlayInput::Quit {
                self.held.pop_front();
                return Ok(Flow::Quit);
            }

            if self.game_over {
                self.held.pop_front();
                if input == PlayInput::Replay {
                    self.game_over = false;
                    self.handle.reset().await?;
                } else {
                    writeln!(self.out, "Type r to play again or q to quit.")?;
                }
            } else {
                let raw = line.clone();
                self.held.pop_front();
                let outcome = self.handle.submit(raw.as_str()).await?;
                if outcome == Outcome::Ignored && !is_numeric_answer(&raw) {
                    writeln!(self.out, "Please type a number (q to quit).")?;
                }
            }

            if self.flush_events()? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Renders every event already queued. The session task broadcasts
    /// before it replies, so after a command returns its events are here.
    fn flush_events(&mut self) -> Result<Flow, CliError> {
        while let Ok(event) = self.events.receiver.try_recv() {
            if self.render(event)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn render(&mut self, event: QuizEvent) -> Result<Flow, CliError> {
        tracing::trace!(event_type = event.kind(), "rendering quiz event");
        match event {
            QuizEvent::SessionStarted {
                mode,
                seed,
                snapshot,
                ..
            } => {
                writeln!(self.out, "Mode: {} | seed {}", mode, seed)?;
                writeln!(self.out, "Type your answer and press Enter (q to quit).")?;
                writeln!(self.out, "{}", format_question(&snapshot))?;
            }
            QuizEvent::AnswerJudged {
                round,
                outcome,
                snapshot,
                ..
            } => match outcome {
                Outcome::Correct => writeln!(self.out, "{}", format_correct(&round))?,
                Outcome::Incorrect => writeln!(self.out, "{}", format_incorrect(&round, &snapshot))?,
                Outcome::Ignored => {}
            },
            QuizEvent::TimedOut {
                round, snapshot, ..
            } => writeln!(self.out, "{}", format_timed_out(&round, &snapshot))?,
            QuizEvent::RoundStarted { snapshot, .. } => {
                writeln!(self.out, "{}", format_question(&snapshot))?
            }
            QuizEvent::SessionReset { snapshot, .. } => {
                writeln!(self.out, "New game.")?;
                writeln!(self.out, "{}", format_question(&snapshot))?;
            }
            QuizEvent::SessionEnded {
                reason, summary, ..
            } => {
                writeln!(self.out, "{}", format_result(reason, summary.as_ref()))?;
                match reason {
                    EndReason::Victory | EndReason::GameOver => {
                        self.game_over = true;
                        writeln!(self.out, "Type r to play again or q to quit.")?;
                    }
                    EndReason::TerminatedByRequest | EndReason::Expired => {
                        return Ok(Flow::Quit);
                    }
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn farewell(&mut self) -> Result<(), CliError> {
        if !self.game_over {
            let snap = self.handle.snapshot();
            writeln!(self.out, "Session ended. Score: {}", snap.score)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
