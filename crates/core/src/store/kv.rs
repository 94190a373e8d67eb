//! Key/value storage trait.

use thiserror::Error;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Trait for key/value storage backends.
///
/// Implementations must be safe to share across tasks; callers hold them
/// behind an `Arc<dyn KvStore>`.
pub trait KvStore: Send + Sync {
    /// Get the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
