//! Protocol Data Types
//!
//! This module defines the values that flow through the text protocol:
//! the parsed [`Command`], the protocol-level [`CommandError`], and the
//! [`Response`] written back for every command.
//!
//! ## Protocol Format
//!
//! Requests and responses are single lines terminated by `\n`:
//!
//! ```text
//! SET <key> <rest>   -> OK | ERROR: SET requires key and value
//! GET <key>          -> <value> | NOT_FOUND | ERROR: GET requires key
//! DELETE <key>       -> DELETED | NOT_FOUND | ERROR: DEL requires key
//! <anything else>    -> ERROR: Unknown command
//! ```

use bytes::{BufMut, Bytes};
use std::fmt;
use thiserror::Error;

/// The line terminator used in both directions
pub const LF: u8 = b'\n';

/// Prefix for protocol-level error responses
pub const ERROR_PREFIX: &[u8] = b"ERROR: ";

/// Command names, matched case-sensitively.
pub mod name {
    pub const SET: &[u8] = b"SET";
    pub const GET: &[u8] = b"GET";
    pub const DELETE: &[u8] = b"DELETE";
    /// Short form accepted for `DELETE`
    pub const DEL: &[u8] = b"DEL";
}

/// A command parsed from one request line.
///
/// Keys and values are slices of the line they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SET <key> <value>`: insert or overwrite
    Set { key: Bytes, value: Bytes },

    /// `GET <key>`: read a value
    Get { key: Bytes },

    /// `DELETE <key>`: remove a key
    Delete { key: Bytes },
}

impl Command {
    /// Returns the canonical command name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Delete { .. } => "DELETE",
        }
    }

    /// Returns the key this command targets.
    pub fn key(&self) -> &Bytes {
        match self {
            Command::Set { key, .. } | Command::Get { key } | Command::Delete { key } => key,
        }
    }
}

/// Protocol-level faults.
///
/// These are not I/O errors: each one becomes an `ERROR: <message>` response
/// and the connection stays open. The `Display` text is exactly the message
/// that follows the `ERROR: ` prefix on the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// `SET` without a key or with an empty value
    #[error("SET requires key and value")]
    SetRequiresKeyAndValue,

    /// `GET` without a key
    #[error("GET requires key")]
    GetRequiresKey,

    /// `DELETE` without a key
    #[error("DEL requires key")]
    DeleteRequiresKey,

    /// Any first token other than a known command name
    #[error("Unknown command")]
    UnknownCommand(Bytes),
}

/// A response line sent back for exactly one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `OK`: a SET succeeded
    Ok,

    /// The stored value for a GET
    Value(Bytes),

    /// `NOT_FOUND`: GET or DELETE on an absent key
    NotFound,

    /// `DELETED`: DELETE removed an existing key
    Deleted,

    /// `ERROR: <message>`
    Error(CommandError),
}

impl Response {
    /// Serializes the response to a new line, terminator included.
    ///
    /// # Example
    /// ```
    /// use linekv::protocol::Response;
    /// assert_eq!(Response::Ok.serialize(), b"OK\n".to_vec());
    /// assert_eq!(Response::NotFound.serialize(), b"NOT_FOUND\n".to_vec());
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_len());
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the response into an existing buffer.
    pub fn serialize_into(&self, buf: &mut impl BufMut) {
        match self {
            Response::Ok => buf.put_slice(b"OK"),
            Response::Value(value) => buf.put_slice(value),
            Response::NotFound => buf.put_slice(b"NOT_FOUND"),
            Response::Deleted => buf.put_slice(b"DELETED"),
            Response::Error(e) => {
                buf.put_slice(ERROR_PREFIX);
                buf.put_slice(e.to_string().as_bytes());
            }
        }
        buf.put_u8(LF);
    }

    fn serialized_len(&self) -> usize {
        match self {
            Response::Value(value) => value.len() + 1,
            _ => 48,
        }
    }

    /// Checks if this is an error response.
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

impl From<CommandError> for Response {
    fn from(e: CommandError) -> Self {
        Response::Error(e)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => write!(f, "OK"),
            Response::Value(value) => write!(f, "{}", String::from_utf8_lossy(value)),
            Response::NotFound => write!(f, "NOT_FOUND"),
            Response::Deleted => write!(f, "DELETED"),
            Response::Error(e) => write!(f, "ERROR: {}", e),
        }
    }
}
