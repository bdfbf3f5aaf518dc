//! Line Framing and Command Parser
//!
//! This module turns a stream of arbitrarily fragmented bytes into
//! commands. It does no I/O.
//!
//! ## How the Parser Works
//!
//! Parsing happens in two independent steps:
//!
//! 1. **Framing**: [`next_line`] splits one `\n`-terminated line off the front
//!    of a `BytesMut` accumulation buffer. Bytes after the last terminator
//!    stay in the buffer until more data arrives, so a line (or its
//!    terminator) split across several reads is reassembled transparently.
//! 2. **Parsing**: [`parse_command`] turns one line into a [`Command`].
//!    - `Ok(Some(command))` - A well-formed command
//!    - `Ok(None)` - Blank line, silently discarded
//!    - `Err(CommandError)` - Malformed or unknown command, answered with `ERROR: ...`
//!
//! Lines are split with `BytesMut::split_to` and frozen, so the keys and
//! values inside a [`Command`] share the connection's read allocation.

use crate::protocol::types::{name, Command, CommandError, LF};
use bytes::{Bytes, BytesMut};

/// Result type for command parsing.
pub type ParseResult<T> = Result<T, CommandError>;

/// Extracts the next complete line from the front of `buf`.
///
/// The `\n` terminator is stripped, as is a single `\r` directly before it.
/// Returns `None` (leaving `buf` untouched) if no terminator is buffered yet.
pub fn next_line(buf: &mut BytesMut) -> Option<Bytes> {
    let pos = find_lf(buf)?;

    let mut line = buf.split_to(pos + 1);
    line.truncate(pos);
    if line.last() == Some(&b'\r') {
        line.truncate(pos - 1);
    }

    Some(line.freeze())
}

/// An accumulation buffer that yields complete lines as bytes are fed in.
///
/// State carries across calls, so a line split over any number of
/// deliveries comes out exactly once, whole.
///
/// # Example
///
/// ```
/// use linekv::protocol::LineBuffer;
///
/// let mut buffer = LineBuffer::new();
/// assert!(buffer.feed(b"SE").is_empty());
///
/// let lines = buffer.feed(b"T k v\nGET");
/// assert_eq!(lines, vec![&b"SET k v"[..]]);
/// assert_eq!(buffer.pending(), b"GET");
/// ```
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    /// Creates an empty line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `data` and drains every complete line, in order.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Bytes> {
        self.buf.extend_from_slice(data);

        let mut lines = Vec::new();
        while let Some(line) = next_line(&mut self.buf) {
            lines.push(line);
        }
        lines
    }

    /// Returns the bytes received after the last line terminator.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Returns true if no partial line is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// Parses one line (terminator already stripped) into a command.
///
/// Tokens are separated by one or more ASCII whitespace bytes and the command
/// name is case-sensitive. The value of a `SET` is the rest of the line after
/// the key with exactly one separator byte removed, so inner and trailing
/// whitespace in values is preserved.
///
/// # Example
///
/// ```
/// use linekv::protocol::{parse_command, Command, CommandError};
/// use bytes::Bytes;
///
/// let cmd = parse_command(&Bytes::from("SET greeting hello world")).unwrap();
/// assert_eq!(
///     cmd,
///     Some(Command::Set { key: Bytes::from("greeting"), value: Bytes::from("hello world") })
/// );
///
/// assert_eq!(parse_command(&Bytes::from("GET")), Err(CommandError::GetRequiresKey));
/// assert_eq!(parse_command(&Bytes::from("")), Ok(None));
/// ```
pub fn parse_command(line: &Bytes) -> ParseResult<Option<Command>> {
    let mut cursor = Cursor::new(line);

    let cmd = match cursor.next_token() {
        Some(cmd) => cmd,
        None => return Ok(None),
    };

    let command = match &cmd[..] {
        name::SET => {
            let key = cursor.next_token();
            let value = cursor.rest_after_separator();
            match (key, value) {
                (Some(key), Some(value)) if !value.is_empty() => Command::Set { key, value },
                _ => return Err(CommandError::SetRequiresKeyAndValue),
            }
        }
        name::GET => match cursor.next_token() {
            Some(key) => Command::Get { key },
            None => return Err(CommandError::GetRequiresKey),
        },
        name::DELETE | name::DEL => match cursor.next_token() {
            Some(key) => Command::Delete { key },
            None => return Err(CommandError::DeleteRequiresKey),
        },
        _ => return Err(CommandError::UnknownCommand(cmd)),
    };

    Ok(Some(command))
}

/// A forward-only tokenizer over one line.
struct Cursor<'a> {
    line: &'a Bytes,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a Bytes) -> Self {
        Self { line, pos: 0 }
    }

    /// Skips leading whitespace and returns the next token, if any.
    fn next_token(&mut self) -> Option<Bytes> {
        let len = self.line.len();
        while self.pos < len && self.line[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        let start = self.pos;
        while self.pos < len && !self.line[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }

        if start == self.pos {
            None
        } else {
            Some(self.line.slice(start..self.pos))
        }
    }

    /// Returns the remainder of the line with one leading separator byte
    /// removed, or `None` if nothing follows the last token.
    fn rest_after_separator(&mut self) -> Option<Bytes> {
        if self.pos >= self.line.len() {
            return None;
        }

        let mut start = self.pos;
        if self.line[start].is_ascii_whitespace() {
            start += 1;
        }
        self.pos = self.line.len();

        Some(self.line.slice(start..))
    }
}

/// Finds the position of the first `\n` in the buffer.
#[inline]
fn find_lf(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == LF)
}
