//! Line Protocol Implementation
//!
//! This module implements the newline-delimited text protocol LineKV speaks.
//!
//! ## Overview
//!
//! Every request is one line: a case-sensitive command name followed by
//! whitespace-separated arguments. Every request gets exactly one response
//! line. Both directions are terminated by `\n`.
//!
//! ## Modules
//!
//! - `types`: Defines `Command`, `CommandError` and `Response`
//! - `parser`: Line framing over a growing buffer and command parsing
//!
//! ## Example
//!
//! ```
//! use linekv::protocol::{parse_command, LineBuffer, Response};
//!
//! let mut buffer = LineBuffer::new();
//! let lines = buffer.feed(b"GET name\n");
//! let command = parse_command(&lines[0]).unwrap().unwrap();
//! assert_eq!(command.name(), "GET");
//!
//! assert_eq!(Response::NotFound.serialize(), b"NOT_FOUND\n".to_vec());
//! ```

pub mod parser;
pub mod types;

pub use parser::{next_line, parse_command, LineBuffer, ParseResult};
pub use types::{Command, CommandError, Response};
