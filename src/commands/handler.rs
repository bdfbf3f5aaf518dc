//! Command Handler
//!
//! Executes parsed commands against the storage engine and builds the
//! single response line each command is answered with.
//!
//! ## Dispatch Table
//!
//! | Command              | Outcome                 | Response                  |
//! |----------------------|-------------------------|---------------------------|
//! | `SET key value`      | stored                  | `OK`                      |
//! | `GET key`            | key present             | `<value>`                 |
//! | `GET key`            | key absent              | `NOT_FOUND`               |
//! | `DELETE key`         | key existed             | `DELETED`                 |
//! | `DELETE key`         | key absent              | `NOT_FOUND`               |
//! | malformed / unknown  | -                       | `ERROR: <message>`        |

use crate::protocol::{parse_command, Command, Response};
use crate::storage::StorageEngine;
use bytes::Bytes;
use std::sync::Arc;
use tracing::trace;

/// Dispatches commands to the shared storage engine.
///
/// Cloning is cheap: every clone shares the same engine.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    /// The storage engine
    storage: Arc<StorageEngine>,
}

impl CommandHandler {
    /// Creates a new command handler with the given storage engine.
    pub fn new(storage: Arc<StorageEngine>) -> Self {
        Self { storage }
    }

    /// Returns the storage engine this handler executes against.
    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    /// Parses and executes one request line.
    ///
    /// Returns `None` for blank lines, which get no response at all.
    /// Protocol errors are turned into `ERROR: ...` responses here and
    /// never escape as `Err`.
    pub fn handle_line(&self, line: &Bytes) -> Option<Response> {
        match parse_command(line) {
            Ok(Some(command)) => Some(self.execute(command)),
            Ok(None) => None,
            Err(e) => {
                trace!(error = %e, "Rejected command");
                Some(Response::Error(e))
            }
        }
    }

    /// Executes a command and returns the response.
    ///
    /// The storage lock is held only inside the engine call, never across
    /// the caller's socket I/O.
    pub fn execute(&self, command: Command) -> Response {
        match command {
            Command::Set { key, value } => self.cmd_set(key, value),
            Command::Get { key } => self.cmd_get(&key),
            Command::Delete { key } => self.cmd_delete(&key),
        }
    }

    fn cmd_set(&self, key: Bytes, value: Bytes) -> Response {
        self.storage.set(key, value);
        Response::Ok
    }

    fn cmd_get(&self, key: &[u8]) -> Response {
        match self.storage.get(key) {
            Some(value) => Response::Value(value),
            None => Response::NotFound,
        }
    }

    fn cmd_delete(&self, key: &[u8]) -> Response {
        if self.storage.delete(key) {
            Response::Deleted
        } else {
            Response::NotFound
        }
    }
}
