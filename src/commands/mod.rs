//! Command Handler Module
//!
//! This module implements the command processing layer for LineKV.
//! It receives request lines, parses them, executes them against the
//! storage engine, and returns the response for each.
//!
//! ## Architecture
//!
//! ```text
//! Request line
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Line Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ StorageEngine   │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `SET`, `GET`, `DELETE` (also `DEL`)

pub mod handler;

pub use handler::CommandHandler;
