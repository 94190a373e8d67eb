//! Types shared by the service adapters.

use serde::{Deserialize, Serialize};

/// Result of a successful source-video download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadResult {
    /// Human-readable title of the source video.
    pub title: String,
    /// Local path of the downloaded file.
    pub path: String,
}

/// Inputs to the final composition call.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeRequest {
    /// Source video track.
    pub video_path: String,
    /// Synthesized narration track.
    pub audio_path: String,
    /// Background music track.
    pub bgm_path: String,
    /// Sound effects track.
    pub sfx_path: String,
}

/// Partial-failure report produced by cleanup.
///
/// Cleanup keeps going after individual failures. The caller gets both the
/// files that were deleted and one message per file that was not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Paths that were actually deleted.
    pub deleted: Vec<String>,
    /// One human-readable message per file that could not be deleted.
    pub errors: Vec<String>,
}

impl CleanupReport {
    /// Number of files deleted.
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }
}
