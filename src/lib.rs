//! # LineKV - An In-Memory Key-Value Store over a Line Protocol
//!
//! LineKV is a volatile key-value store reachable over TCP with a
//! newline-delimited text protocol. Every connection is served by its own
//! task, and all of them share one store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              LineKV                                     │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │                  │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │                  │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘                  │
//! │                            │                  │                         │
//! │                            ▼                  ▼                         │
//! │                     ┌─────────────┐    ┌──────────────────────────────┐ │
//! │                     │ Line Parser │    │        StorageEngine         │ │
//! │                     │ (framing +  │    │  RwLock<HashMap<Bytes,Bytes>>│ │
//! │                     │  commands)  │    └──────────────────────────────┘ │
//! │                     └─────────────┘                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use linekv::{Config, Server, StorageEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = Arc::new(StorageEngine::new());
//!     let server = Server::bind(&Config::default(), storage).await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Protocol
//!
//! ```text
//! SET <key> <value>   -> OK | ERROR: SET requires key and value
//! GET <key>           -> <value> | NOT_FOUND | ERROR: GET requires key
//! DELETE <key>        -> DELETED | NOT_FOUND | ERROR: DEL requires key
//! <anything else>     -> ERROR: Unknown command
//! ```
//!
//! The value of a `SET` is everything after the key (one separator removed),
//! so values may contain spaces. Command names are case-sensitive; `DEL` is
//! accepted as a short form of `DELETE`. Blank lines are ignored.
//!
//! ## Module Overview
//!
//! - [`protocol`]: Line framing, command parsing and response types
//! - [`storage`]: Thread-safe storage engine
//! - [`commands`]: Executes commands against the storage engine
//! - [`connection`]: Per-client read/execute/respond loop
//! - [`server`]: Listener and accept loop
//! - [`config`]: Command-line configuration

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

pub use commands::CommandHandler;
pub use config::Config;
pub use connection::{handle_connection, ConnectionError, ConnectionStats};
pub use protocol::{Command, CommandError, LineBuffer, Response};
pub use server::{Server, ServerError};
pub use storage::{StorageEngine, StorageStats};

/// The default port LineKV listens on
pub const DEFAULT_PORT: u16 = 8080;

/// The default host LineKV binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of LineKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
