//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the pipeline orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Delay before auto-advancing to the next stage (milliseconds).
    /// Applies after a successful download and after a successful synthesis;
    /// the advance is suppressed if the stage changed in the meantime.
    #[serde(default = "default_advance_delay")]
    pub advance_delay_ms: u64,

    /// Delay before the cleanup decision becomes pending (milliseconds).
    /// Starts when composition succeeds; not tied to the current stage.
    #[serde(default = "default_cleanup_prompt_delay")]
    pub cleanup_prompt_delay_ms: u64,
}

fn default_advance_delay() -> u64 {
    800
}

fn default_cleanup_prompt_delay() -> u64 {
    1000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            advance_delay_ms: default_advance_delay(),
            cleanup_prompt_delay_ms: default_cleanup_prompt_delay(),
        }
    }
}
