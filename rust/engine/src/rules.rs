//! Game constants and the pure rule functions the controller is built on.

/// Smallest operand that can appear in a round.
pub const MIN_OPERAND: u8 = 2;
/// Largest operand that can appear in a round.
pub const MAX_OPERAND: u8 = 9;

/// Lives granted at the start of every session.
pub const STARTING_LIVES: u8 = 3;

/// Round duration, in seconds, before any score has been earned.
pub const BASE_ROUND_SECS: u8 = 5;

/// Delay between answering and the next question appearing.
pub const DEFAULT_FEEDBACK_DELAY_MS: u64 = 700;
/// Upper bound accepted for a configured feedback delay.
pub const MAX_FEEDBACK_DELAY_MS: u64 = 5_000;

/// Returns the Survival round duration in seconds for a given score.
///
/// The duration is a monotone step function, so it can only shrink while a
/// session is running:
///
/// | score      | seconds |
/// |------------|---------|
/// | `0..5`     | 5       |
/// | `5..10`    | 4       |
/// | `10..20`   | 3       |
/// | `20..`     | 2       |
///
/// # Examples
///
/// ```
/// use mathquiz_engine::rules::round_duration_for_score;
///
/// assert_eq!(round_duration_for_score(4), 5);
/// assert_eq!(round_duration_for_score(5), 4);
/// assert_eq!(round_duration_for_score(10), 3);
/// assert_eq!(round_duration_for_score(20), 2);
/// ```
pub fn round_duration_for_score(score: u32) -> u8 {
    match score {
        0..=4 => BASE_ROUND_SECS,
        5..=9 => 4,
        10..=19 => 3,
        _ => 2,
    }
}

/// Parses a raw submission into a numeric answer.
///
/// Surrounding whitespace is ignored. Any decimal number is accepted, so
/// `"36.0"` is judged as 36 and `"4.5"` is judged (and wrong). Empty,
/// non-numeric and non-finite input yields `None`, which the controller treats
/// as a no-op rather than a wrong answer.
///
/// # Examples
///
/// ```
/// use mathquiz_engine::rules::parse_answer;
///
/// assert_eq!(parse_answer(" 42\n"), Some(42.0));
/// assert_eq!(parse_answer("-3"), Some(-3.0));
/// assert_eq!(parse_answer("36.0"), Some(36.0));
/// assert_eq!(parse_answer(""), None);
/// assert_eq!(parse_answer("abc"), None);
/// ```
pub fn parse_answer(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
