//! Error types for the credentials module.

use thiserror::Error;

use crate::store::StoreError;

use super::Provider;

/// Errors that can occur during credential pool operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No enabled record in the provider's pool.
    #[error("No enabled credential in the {0} pool")]
    NoCredential(Provider),

    /// No record with the given id in the pool.
    #[error("Credential not found: {0}")]
    NotFound(String),

    /// Underlying key/value storage failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}
