//! Trait definitions for the pipeline's external service adapters.

use async_trait::async_trait;

use super::error::ServiceError;
use super::types::{CleanupReport, ComposeRequest, DownloadResult};

/// Downloads a source video from a public URL.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> &str;

    /// Download the video at `url`, returning its title and local path.
    async fn download(&self, url: &str) -> Result<DownloadResult, ServiceError>;
}

/// Translates script text for dubbing.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> &str;

    /// Translate `text`, authenticating with `secret`.
    ///
    /// The secret is used for this call only and must not be retained.
    async fn translate(&self, text: &str, secret: &str) -> Result<String, ServiceError>;
}

/// Synthesizes narration audio from script text.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> &str;

    /// Synthesize speech for `text`, returning the audio file path.
    async fn synthesize(&self, text: &str, secret: &str) -> Result<String, ServiceError>;
}

/// Composes the final video from its four input tracks.
#[async_trait]
pub trait Composer: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> &str;

    /// Mix the tracks into the final video, returning its path.
    async fn compose(&self, request: &ComposeRequest, secret: &str)
        -> Result<String, ServiceError>;
}

/// Deletes intermediate files once the final video exists.
#[async_trait]
pub trait Cleaner: Send + Sync {
    /// Adapter name for logging.
    fn name(&self) -> &str;

    /// Delete the downloaded video and generated audio.
    ///
    /// Individual files may fail to delete; the report carries both what
    /// was deleted and what was not. An `Err` means the cleanup as a whole
    /// could not run at all.
    async fn cleanup(
        &self,
        video_path: &str,
        audio_path: &str,
    ) -> Result<CleanupReport, ServiceError>;
}
