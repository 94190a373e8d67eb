//! Credential pools for third-party media providers.
//!
//! Each provider owns an ordered pool of API keys. Selection is fixed
//! priority: the first enabled record in insertion order wins, every time,
//! until it is disabled or removed. Pools are persisted as JSON documents in
//! the key/value store, and write-back is gated on a one-time hydration at
//! startup so an empty in-memory pool can never clobber a stored one.

mod error;
mod manager;
mod pool;
mod types;

pub use error::CredentialError;
pub use manager::CredentialManager;
pub use pool::CredentialPool;
pub use types::{CredentialRecord, CredentialUpdate, Provider};
