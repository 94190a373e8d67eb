//! Error type shared by all service adapters.

use thiserror::Error;

/// Errors that can occur during external service calls.
///
/// Adapter failure messages travel verbatim into the pipeline's last-error
/// field, so the `Api` variant carries the helper's own wording whenever the
/// helper supplied one.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Could not reach the helper service.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The helper did not answer within the configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// The helper answered with an error.
    #[error("{0}")]
    Api(String),
}
