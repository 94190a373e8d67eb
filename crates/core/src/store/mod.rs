//! Durable key/value storage for workflow state.
//!
//! Credential pools are persisted as JSON documents under well-known keys,
//! so the storage layer only needs to move opaque text values around.

mod kv;
mod sqlite_store;

pub use kv::{KvStore, StoreError};
pub use sqlite_store::SqliteKvStore;
