//! Question, hearts and result formatters for terminal display.
//!
//! Pure functions over engine snapshots. Symbols fall back to ASCII on
//! terminals that are unlikely to render them.
//!
//! - **Unicode mode**: `6 × 7`, hearts `♥♥♡`
//! - **ASCII mode**: `6 x 7`, hearts `##-`
//!
//! ## Example
//!
//! ```rust
//! use mathquiz_engine::round::Round;
//! use mathquiz_cli::formatters::{format_hearts, format_round};
//!
//! let text = format_round(&Round::new(6, 7));
//! assert!(text == "6 × 7" || text == "6 x 7");
//!
//! let hearts = format_hearts(&[true, true, false]);
//! assert!(hearts == "♥♥♡" || hearts == "##-");
//! ```

use mathquiz_engine::round::Round;
use mathquiz_engine::state::{Mode, Snapshot};
use mathquiz_session::{EndReason, SessionSummary};

/// Check if the terminal supports Unicode symbols by detecting modern terminal environments.
///
/// On Windows, checks for Windows Terminal (WT_SESSION), modern terminals (TERM_PROGRAM),
/// or VS Code (VSCODE_INJECTION). On Unix-like systems, assumes Unicode support.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_round(round: &Round) -> String {
    if supports_unicode() {
        round.to_string()
    } else {
        format!("{} x {}", round.a, round.b)
    }
}

pub fn format_hearts(hearts: &[bool]) -> String {
    let (full, empty) = if supports_unicode() {
        ('♥', '♡')
    } else {
        ('#', '-')
    };
    hearts
        .iter()
        .map(|&h| if h { full } else { empty })
        .collect()
}

/// Seconds rounded to the nearest tenth, e.g. `12.3s`.
pub fn format_elapsed(ms: u64) -> String {
    let tenths = ms.saturating_add(50) / 100;
    format!("{}.{}s", tenths / 10, tenths % 10)
}

/// The prompt line for the current question.
///
/// Classic shows progress through the queue; Survival shows hearts, the
/// round clock and the score.
pub fn format_question(snap: &Snapshot) -> String {
    let round = format_round(&snap.round());
    match snap.mode {
        Mode::Classic => format!("[{}/{}] {} = ?", snap.score, snap.total_pairs, round),
        Mode::Survival => format!(
            "{}  {}s  score {} | {} = ?",
            format_hearts(&snap.hearts()),
            snap.round_duration,
            snap.score,
            round
        ),
    }
}

/// Feedback for a judged answer. Classic keeps the product hidden so the
/// player can retry.
pub fn format_correct(round: &Round) -> String {
    format!("Correct! {} = {}", format_round(round), round.correct_answer())
}

pub fn format_incorrect(round: &Round, snap: &Snapshot) -> String {
    match snap.mode {
        Mode::Classic => "Wrong, try again.".to_string(),
        Mode::Survival => format!(
            "Wrong! {} = {}  {}",
            format_round(round),
            round.correct_answer(),
            format_hearts(&snap.hearts())
        ),
    }
}

pub fn format_timed_out(round: &Round, snap: &Snapshot) -> String {
    format!(
        "Time's up! {} = {}  {}",
        format_round(round),
        round.correct_answer(),
        format_hearts(&snap.hearts())
    )
}

/// Final result line for a finished play-through.
pub fn format_result(reason: EndReason, summary: Option<&SessionSummary>) -> String {
    match (reason, summary) {
        (EndReason::Victory, Some(s)) => format!(
            "Victory! All pairs cleared in {} with {} wrong attempt{}.",
            format_elapsed(s.elapsed_ms),
            s.wrong_attempts,
            if s.wrong_attempts == 1 { "" } else { "s" }
        ),
        (EndReason::GameOver, Some(s)) => format!("Game over! Final score: {}", s.score),
        (EndReason::Victory, None) => "Victory!".to_string(),
        (EndReason::GameOver, None) => "Game over!".to_string(),
        (EndReason::TerminatedByRequest, _) => "Session ended.".to_string(),
        (EndReason::Expired, _) => "Session expired.".to_string(),
    }
}
