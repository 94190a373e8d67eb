//! Pipeline orchestrator implementation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::credentials::{CredentialManager, Provider};
use crate::metrics;
use crate::services::{
    Cleaner, CleanupReport, ComposeRequest, Composer, Downloader, Synthesizer, Translator,
};

use super::config::PipelineConfig;
use super::types::{DownloadArtifact, PipelineSnapshot, Stage};

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required input was missing or blank. The adapter is never called.
    #[error("{0}")]
    Validation(String),

    /// No enabled credential in the required pool.
    #[error("No enabled credential in the {0} pool")]
    NoCredential(Provider),

    /// Another pipeline operation is already in flight.
    #[error("Another operation is already in progress")]
    Busy,

    /// The external service call failed; its message is passed through.
    #[error("{0}")]
    Adapter(String),
}

impl PipelineError {
    fn outcome(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation_error",
            PipelineError::NoCredential(_) => "no_credential",
            PipelineError::Busy => "busy",
            PipelineError::Adapter(_) => "adapter_error",
        }
    }
}

/// Mutable pipeline state, exclusively owned by the orchestrator.
#[derive(Debug, Default)]
struct PipelineState {
    stage: Stage,
    download_artifact: Option<DownloadArtifact>,
    audio_artifact: Option<String>,
    final_artifact: Option<String>,
    script: String,
    last_error: Option<String>,
    busy: bool,
    cleanup_pending: bool,
}

/// Drives the three-stage dubbing workflow.
///
/// All media work is delegated to the adapter collaborators; the
/// orchestrator owns stage, artifacts, the single-flight `busy` gate and
/// the deferred stage advances. Credentials are read from the pool manager
/// per call and never stored.
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    credentials: Arc<CredentialManager>,
    downloader: Arc<dyn Downloader>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn Synthesizer>,
    composer: Arc<dyn Composer>,
    cleaner: Arc<dyn Cleaner>,
    state: Arc<RwLock<PipelineState>>,
}

impl PipelineOrchestrator {
    /// Creates a new orchestrator in the initial state: stage `Downloading`,
    /// no artifacts, not busy.
    pub fn new(
        config: PipelineConfig,
        credentials: Arc<CredentialManager>,
        downloader: Arc<dyn Downloader>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn Synthesizer>,
        composer: Arc<dyn Composer>,
        cleaner: Arc<dyn Cleaner>,
    ) -> Self {
        Self {
            config,
            credentials,
            downloader,
            translator,
            synthesizer,
            composer,
            cleaner,
            state: Arc::new(RwLock::new(PipelineState::default())),
        }
    }

    /// Point-in-time copy of the pipeline state.
    pub async fn snapshot(&self) -> PipelineSnapshot {
        let state = self.state.read().await;
        PipelineSnapshot {
            stage: state.stage,
            download_artifact: state.download_artifact.clone(),
            audio_artifact: state.audio_artifact.clone(),
            final_artifact: state.final_artifact.clone(),
            script: state.script.clone(),
            last_error: state.last_error.clone(),
            busy: state.busy,
            cleanup_pending: state.cleanup_pending,
        }
    }

    /// Download the source video and schedule an auto-advance to
    /// `Scripting`.
    pub async fn request_download(&self, url: &str) -> Result<DownloadArtifact, PipelineError> {
        let result = self.download_inner(url).await;
        self.record_outcome("download", result).await
    }

    /// Translate `text` and replace the working script with the result.
    /// The stage does not change.
    pub async fn request_translation(&self, text: &str) -> Result<String, PipelineError> {
        let result = self.translate_inner(text).await;
        self.record_outcome("translate", result).await
    }

    /// Synthesize narration for `script` and schedule an auto-advance to
    /// `Composing`.
    pub async fn request_synthesis(&self, script: &str) -> Result<String, PipelineError> {
        let result = self.synthesize_inner(script).await;
        self.record_outcome("synthesize", result).await
    }

    /// Compose the final video from the four input tracks and schedule the
    /// cleanup decision.
    pub async fn request_composition(
        &self,
        request: ComposeRequest,
    ) -> Result<String, PipelineError> {
        let result = self.compose_inner(request).await;
        self.record_outcome("compose", result).await
    }

    /// Manual jump to any stage, with no artifact checks.
    ///
    /// Jumping backwards or skipping ahead is allowed; the stage machine
    /// does not enforce forward-only progression. A pending auto-advance
    /// whose origin stage no longer matches is suppressed when it fires.
    pub async fn navigate_to(&self, stage: Stage) {
        let mut state = self.state.write().await;
        if state.stage == stage {
            return;
        }
        debug!(from = %state.stage, to = %stage, "Manual navigation");
        state.stage = stage;
        metrics::STAGE_TRANSITIONS
            .with_label_values(&[stage.as_str(), "manual"])
            .inc();
    }

    /// Replace the working script text.
    pub async fn set_script(&self, script: &str) {
        let mut state = self.state.write().await;
        state.script = script.to_string();
    }

    /// Resolve the pending cleanup decision.
    ///
    /// With `delete_requested` the cleaner runs against the current download
    /// and audio paths and its partial-failure report is returned; the
    /// decision is consumed either way. Declining makes no adapter call and
    /// is never rejected as busy.
    pub async fn resolve_cleanup(
        &self,
        delete_requested: bool,
    ) -> Result<Option<CleanupReport>, PipelineError> {
        if !delete_requested {
            let mut state = self.state.write().await;
            state.cleanup_pending = false;
            info!("Cleanup declined, keeping intermediate files");
            return Ok(None);
        }

        let result = self.cleanup_inner().await;
        self.record_outcome("cleanup", result).await.map(Some)
    }

    // ===== Operation internals =====

    async fn download_inner(&self, url: &str) -> Result<DownloadArtifact, PipelineError> {
        if url.is_empty() {
            return Err(PipelineError::Validation(
                "Source URL is required".to_string(),
            ));
        }
        self.begin().await?;

        debug!(adapter = self.downloader.name(), url = %url, "Requesting download");
        let timer = metrics::ADAPTER_DURATION
            .with_label_values(&["download"])
            .start_timer();
        let result = self.downloader.download(url).await;
        timer.observe_duration();

        let mut state = self.state.write().await;
        state.busy = false;
        match result {
            Ok(download) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["download", "success"])
                    .inc();
                let artifact = DownloadArtifact {
                    title: download.title,
                    path: download.path,
                };
                state.download_artifact = Some(artifact.clone());
                info!(title = %artifact.title, path = %artifact.path, "Download complete");
                drop(state);
                self.schedule_advance(Stage::Downloading, Stage::Scripting);
                Ok(artifact)
            }
            Err(e) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["download", "error"])
                    .inc();
                Err(PipelineError::Adapter(e.to_string()))
            }
        }
    }

    async fn translate_inner(&self, text: &str) -> Result<String, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::Validation(
                "Script text is required".to_string(),
            ));
        }
        let credential = self
            .credentials
            .select_active(Provider::Translation)
            .await
            .map_err(|_| PipelineError::NoCredential(Provider::Translation))?;
        self.begin().await?;

        debug!(
            adapter = self.translator.name(),
            credential = %credential.id,
            "Requesting translation"
        );
        let timer = metrics::ADAPTER_DURATION
            .with_label_values(&["translate"])
            .start_timer();
        let result = self.translator.translate(text, &credential.secret).await;
        timer.observe_duration();

        let mut state = self.state.write().await;
        state.busy = false;
        match result {
            Ok(translated) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["translate", "success"])
                    .inc();
                state.script = translated.clone();
                info!(chars = translated.len(), "Translation complete");
                drop(state);
                self.credentials
                    .mark_used(Provider::Translation, &credential.id)
                    .await;
                Ok(translated)
            }
            Err(e) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["translate", "error"])
                    .inc();
                Err(PipelineError::Adapter(e.to_string()))
            }
        }
    }

    async fn synthesize_inner(&self, script: &str) -> Result<String, PipelineError> {
        if script.trim().is_empty() {
            return Err(PipelineError::Validation(
                "Script text is required".to_string(),
            ));
        }
        let credential = self
            .credentials
            .select_active(Provider::SpeechSynthesis)
            .await
            .map_err(|_| PipelineError::NoCredential(Provider::SpeechSynthesis))?;
        self.begin().await?;

        debug!(
            adapter = self.synthesizer.name(),
            credential = %credential.id,
            "Requesting synthesis"
        );
        let timer = metrics::ADAPTER_DURATION
            .with_label_values(&["synthesize"])
            .start_timer();
        let result = self.synthesizer.synthesize(script, &credential.secret).await;
        timer.observe_duration();

        let mut state = self.state.write().await;
        state.busy = false;
        match result {
            Ok(audio_path) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["synthesize", "success"])
                    .inc();
                state.audio_artifact = Some(audio_path.clone());
                info!(path = %audio_path, "Synthesis complete");
                drop(state);
                self.credentials
                    .mark_used(Provider::SpeechSynthesis, &credential.id)
                    .await;
                self.schedule_advance(Stage::Scripting, Stage::Composing);
                Ok(audio_path)
            }
            Err(e) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["synthesize", "error"])
                    .inc();
                Err(PipelineError::Adapter(e.to_string()))
            }
        }
    }

    async fn compose_inner(&self, request: ComposeRequest) -> Result<String, PipelineError> {
        for (path, label) in [
            (&request.video_path, "Video path"),
            (&request.audio_path, "Audio path"),
            (&request.bgm_path, "Background music path"),
            (&request.sfx_path, "Sound effects path"),
        ] {
            if path.is_empty() {
                return Err(PipelineError::Validation(format!("{} is required", label)));
            }
        }
        // Composition reuses the translation provider's credential
        let credential = self
            .credentials
            .select_active(Provider::Translation)
            .await
            .map_err(|_| PipelineError::NoCredential(Provider::Translation))?;
        self.begin().await?;

        debug!(
            adapter = self.composer.name(),
            credential = %credential.id,
            "Requesting composition"
        );
        let timer = metrics::ADAPTER_DURATION
            .with_label_values(&["compose"])
            .start_timer();
        let result = self.composer.compose(&request, &credential.secret).await;
        timer.observe_duration();

        let mut state = self.state.write().await;
        state.busy = false;
        match result {
            Ok(video_path) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["compose", "success"])
                    .inc();
                state.final_artifact = Some(video_path.clone());
                info!(path = %video_path, "Composition complete");
                drop(state);
                self.credentials
                    .mark_used(Provider::Translation, &credential.id)
                    .await;
                self.schedule_cleanup_prompt();
                Ok(video_path)
            }
            Err(e) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["compose", "error"])
                    .inc();
                Err(PipelineError::Adapter(e.to_string()))
            }
        }
    }

    async fn cleanup_inner(&self) -> Result<CleanupReport, PipelineError> {
        let (video_path, audio_path) = {
            let state = self.state.read().await;
            (
                state
                    .download_artifact
                    .as_ref()
                    .map(|a| a.path.clone())
                    .unwrap_or_default(),
                state.audio_artifact.clone().unwrap_or_default(),
            )
        };
        self.begin().await?;

        debug!(adapter = self.cleaner.name(), "Requesting cleanup");
        let timer = metrics::ADAPTER_DURATION
            .with_label_values(&["cleanup"])
            .start_timer();
        let result = self.cleaner.cleanup(&video_path, &audio_path).await;
        timer.observe_duration();

        let mut state = self.state.write().await;
        state.busy = false;
        match result {
            Ok(report) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["cleanup", "success"])
                    .inc();
                metrics::CLEANUP_FILES_DELETED.inc_by(report.deleted_count() as u64);
                metrics::CLEANUP_FILE_ERRORS.inc_by(report.errors.len() as u64);
                state.cleanup_pending = false;
                if report.errors.is_empty() {
                    info!(deleted = report.deleted_count(), "Cleanup finished");
                } else {
                    warn!(
                        deleted = report.deleted_count(),
                        errors = report.errors.len(),
                        "Cleanup finished with errors"
                    );
                }
                Ok(report)
            }
            Err(e) => {
                metrics::ADAPTER_REQUESTS
                    .with_label_values(&["cleanup", "error"])
                    .inc();
                Err(PipelineError::Adapter(e.to_string()))
            }
        }
    }

    // ===== Shared machinery =====

    /// Acquire the single-flight gate, or fail with `Busy`.
    async fn begin(&self) -> Result<(), PipelineError> {
        let mut state = self.state.write().await;
        if state.busy {
            return Err(PipelineError::Busy);
        }
        state.busy = true;
        Ok(())
    }

    /// Count the operation, and set or clear the last error with it.
    async fn record_outcome<T>(
        &self,
        operation: &'static str,
        result: Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        match &result {
            Ok(_) => {
                metrics::PIPELINE_OPERATIONS
                    .with_label_values(&[operation, "success"])
                    .inc();
                self.state.write().await.last_error = None;
            }
            Err(e) => {
                metrics::PIPELINE_OPERATIONS
                    .with_label_values(&[operation, e.outcome()])
                    .inc();
                warn!(operation = operation, error = %e, "Pipeline operation failed");
                self.state.write().await.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Schedule a deferred stage advance, valid only while the stage is
    /// still `from` when the timer fires.
    fn schedule_advance(&self, from: Stage, to: Stage) {
        let state = Arc::clone(&self.state);
        let delay = Duration::from_millis(self.config.advance_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.write().await;
            if state.stage != from {
                metrics::AUTO_TRANSITIONS_SUPPRESSED.inc();
                debug!(expected = %from, actual = %state.stage, "Auto-advance suppressed");
                return;
            }
            state.stage = to;
            metrics::STAGE_TRANSITIONS
                .with_label_values(&[to.as_str(), "auto"])
                .inc();
            info!(to = %to, "Stage auto-advanced");
        });
    }

    /// Schedule the cleanup decision. Fires regardless of the current stage
    /// once the final artifact exists.
    fn schedule_cleanup_prompt(&self) {
        let state = Arc::clone(&self.state);
        let delay = Duration::from_millis(self.config.cleanup_prompt_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.write().await;
            state.cleanup_pending = true;
            info!("Cleanup decision pending");
        });
    }
}
