//! External service adapters for the dubbing pipeline.
//!
//! Every stage delegates its actual media work to an external helper
//! service. This module defines the adapter traits the orchestrator
//! consumes, the shared result types, and the implementations: an HTTP
//! bridge that talks to the helper over JSON, and a local file-system
//! cleaner for deployments that share a disk with the helper.

mod bridge;
mod error;
mod fs_cleaner;
mod traits;
mod types;

pub use bridge::MediaBridge;
pub use error::ServiceError;
pub use fs_cleaner::FsCleaner;
pub use traits::{Cleaner, Composer, Downloader, Synthesizer, Translator};
pub use types::{CleanupReport, ComposeRequest, DownloadResult};
