//! Storage Engine Module
//!
//! This module provides the core storage functionality for LineKV:
//! a thread-safe key-value map shared by every connection.
//!
//! ## Features
//!
//! - **RwLock**: Multiple concurrent readers, exclusive writers
//! - **Linearizable**: Every write is serialized through one lock and visible
//!   to all connections once it returns
//! - **Volatile**: Nothing is persisted; data lives as long as the process
//!
//! ## Example
//!
//! ```
//! use linekv::storage::StorageEngine;
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(StorageEngine::new());
//!
//! engine.set(Bytes::from("name"), Bytes::from("Ariz"));
//! let value = engine.get(b"name");
//! assert_eq!(value, Some(Bytes::from("Ariz")));
//! ```

pub mod engine;

pub use engine::{StorageEngine, StorageStats};
