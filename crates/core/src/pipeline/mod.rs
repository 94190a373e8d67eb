//! Dubbing pipeline orchestrator.
//!
//! The pipeline walks three stages: download the source video, translate
//! the script and synthesize narration, then compose the final video.
//! Exactly one adapter call may be in flight at a time; manual navigation
//! between stages is never restricted.

mod config;
mod orchestrator;
mod types;

pub use config::PipelineConfig;
pub use orchestrator::{PipelineError, PipelineOrchestrator};
pub use types::{DownloadArtifact, PipelineSnapshot, Stage};
