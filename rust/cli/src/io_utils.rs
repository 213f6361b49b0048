//! Stdin helpers for interactive commands.
//!
//! The play loop runs on an async runtime, so stdin is read on a dedicated
//! thread and forwarded line by line over a channel.

use std::io::{BufRead, ErrorKind};
use tokio::sync::mpsc;

const LINE_BUFFER: usize = 64;

/// One line of player input.
#[derive(Debug, PartialEq, Eq)]
pub enum InputLine {
    /// A decoded line with surrounding whitespace trimmed.
    Text(String),
    /// The line was not valid UTF-8; it has been consumed and skipped.
    Undecodable,
}

/// Reads a line of input from a buffered reader, blocking until available.
///
/// Returns `None` on EOF or when the reader fails. A line that is not valid
/// UTF-8 comes back as [`InputLine::Undecodable`] so the caller can keep
/// reading past it.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// # use mathquiz_cli::io_utils::{read_stdin_line, InputLine};
///
/// let mut input = Cursor::new("42 \nq\n");
/// assert_eq!(read_stdin_line(&mut input), Some(InputLine::Text("42".into())));
/// assert_eq!(read_stdin_line(&mut input), Some(InputLine::Text("q".into())));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<InputLine> {
    let mut buf = Vec::new();
    loop {
        match stdin.read_until(b'\n', &mut buf) {
            Ok(0) => return None, // EOF
            Ok(_) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading input");
                return None;
            }
        }
    }
    match String::from_utf8(buf) {
        Ok(line) => Some(InputLine::Text(line.trim().to_string())),
        Err(_) => Some(InputLine::Undecodable),
    }
}

/// Forwards lines from `input` on a background thread. The receiver yields
/// `None` once the input hits EOF or the receiver side is dropped.
pub fn spawn_line_reader<R>(input: R) -> mpsc::Receiver<InputLine>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    std::thread::spawn(move || {
        let mut input = input;
        while let Some(line) = read_stdin_line(&mut input) {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
