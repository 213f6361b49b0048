//! Input classification for the interactive `play` command.

/// What a line typed during `play` asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum PlayInput {
    /// `q` or `quit`: end the session.
    Quit,
    /// `r`, `replay` or `restart`: start over once the game has ended.
    Replay,
    /// Anything else is handed to the engine as an answer; the engine ignores
    /// text that does not parse as a number.
    Answer(String),
}

/// Classify a line of `play` input (case-insensitive for commands).
///
/// # Example
///
/// ```rust
/// # use mathquiz_cli::validation::{parse_play_input, PlayInput};
/// assert_eq!(parse_play_input(" Q "), PlayInput::Quit);
/// assert_eq!(parse_play_input("r"), PlayInput::Replay);
/// assert_eq!(parse_play_input("42"), PlayInput::Answer("42".into()));
/// ```
pub fn parse_play_input(input: &str) -> PlayInput {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" => PlayInput::Quit,
        "r" | "replay" | "restart" => PlayInput::Replay,
        _ => PlayInput::Answer(trimmed.to_string()),
    }
}

/// Whether an answer line could be judged at all.
pub fn is_numeric_answer(input: &str) -> bool {
    mathquiz_engine::rules::parse_answer(input).is_some()
}
