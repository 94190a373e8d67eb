//! Types for the dubbing pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three stages of a dubbing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Acquiring the source video.
    #[default]
    Downloading,
    /// Translating the script and synthesizing narration.
    Scripting,
    /// Mixing the final video.
    Composing,
}

impl Stage {
    /// Returns the string representation for API responses and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Downloading => "downloading",
            Stage::Scripting => "scripting",
            Stage::Composing => "composing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifact produced by a successful source-video download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadArtifact {
    /// Human-readable title of the source video.
    pub title: String,
    /// Local path of the downloaded file.
    pub path: String,
}

/// Point-in-time copy of the pipeline state.
///
/// This is the single source of truth a frontend renders from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    /// Current stage. Any stage may be current regardless of artifacts.
    pub stage: Stage,
    /// Source video, once downloaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_artifact: Option<DownloadArtifact>,
    /// Narration audio path, once synthesized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_artifact: Option<String>,
    /// Final video path, once composed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_artifact: Option<String>,
    /// Working script text.
    pub script: String,
    /// Most recent failure, cleared by the next successful operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Whether an adapter call is in flight.
    pub busy: bool,
    /// Whether a cleanup decision is waiting on the caller.
    pub cleanup_pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_as_str() {
        assert_eq!(Stage::Downloading.as_str(), "downloading");
        assert_eq!(Stage::Scripting.as_str(), "scripting");
        assert_eq!(Stage::Composing.as_str(), "composing");
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(
            serde_json::to_string(&Stage::Scripting).unwrap(),
            "\"scripting\""
        );
        let parsed: Stage = serde_json::from_str("\"composing\"").unwrap();
        assert_eq!(parsed, Stage::Composing);
    }

    #[test]
    fn test_snapshot_omits_absent_artifacts() {
        let snapshot = PipelineSnapshot {
            stage: Stage::Downloading,
            download_artifact: None,
            audio_artifact: None,
            final_artifact: None,
            script: String::new(),
            last_error: None,
            busy: false,
            cleanup_pending: false,
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["stage"], "downloading");
        assert!(json.get("downloadArtifact").is_none());
        assert!(json.get("audioArtifact").is_none());
        assert!(json.get("lastError").is_none());
        assert_eq!(json["busy"], false);
        assert_eq!(json["cleanupPending"], false);
    }
}
