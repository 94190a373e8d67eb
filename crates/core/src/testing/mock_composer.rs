//! Mock composer for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::{ComposeRequest, Composer, ServiceError};

/// A recorded composition request.
#[derive(Debug, Clone)]
pub struct RecordedComposition {
    pub request: ComposeRequest,
    pub secret: String,
    pub success: bool,
}

/// Mock implementation of [`Composer`] for tests.
pub struct MockComposer {
    compositions: Arc<RwLock<Vec<RecordedComposition>>>,
    video_path: Arc<RwLock<String>>,
    next_error: Arc<RwLock<Option<ServiceError>>>,
    compose_duration: Arc<RwLock<Duration>>,
}

impl MockComposer {
    pub fn new() -> Self {
        Self {
            compositions: Arc::new(RwLock::new(Vec::new())),
            video_path: Arc::new(RwLock::new("/media/final.mp4".to_string())),
            next_error: Arc::new(RwLock::new(None)),
            compose_duration: Arc::new(RwLock::new(Duration::from_millis(100))),
        }
    }

    pub async fn recorded_compositions(&self) -> Vec<RecordedComposition> {
        self.compositions.read().await.clone()
    }

    pub async fn composition_count(&self) -> usize {
        self.compositions.read().await.len()
    }

    /// Set the video path returned by subsequent compositions.
    pub async fn set_video_path(&self, path: impl Into<String>) {
        *self.video_path.write().await = path.into();
    }

    /// Make the next composition fail with the given error. Consumed once.
    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set how long each composition takes.
    pub async fn set_compose_duration(&self, duration: Duration) {
        *self.compose_duration.write().await = duration;
    }

    async fn take_error(&self) -> Option<ServiceError> {
        self.next_error.write().await.take()
    }
}

impl Default for MockComposer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Composer for MockComposer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn compose(
        &self,
        request: &ComposeRequest,
        secret: &str,
    ) -> Result<String, ServiceError> {
        let duration = *self.compose_duration.read().await;
        tokio::time::sleep(duration).await;

        if let Some(error) = self.take_error().await {
            self.compositions.write().await.push(RecordedComposition {
                request: request.clone(),
                secret: secret.to_string(),
                success: false,
            });
            return Err(error);
        }

        self.compositions.write().await.push(RecordedComposition {
            request: request.clone(),
            secret: secret.to_string(),
            success: true,
        });
        Ok(self.video_path.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> ComposeRequest {
        ComposeRequest {
            video_path: "/downloads/source.mp4".to_string(),
            audio_path: "/media/narration.mp3".to_string(),
            bgm_path: "/assets/bgm.mp3".to_string(),
            sfx_path: "/assets/sfx.mp3".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_full_request() {
        let mock = MockComposer::new();
        mock.set_compose_duration(Duration::ZERO).await;

        let path = mock.compose(&sample_request(), "key-9").await.unwrap();
        assert_eq!(path, "/media/final.mp4");

        let recorded = mock.recorded_compositions().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].request, sample_request());
        assert_eq!(recorded[0].secret, "key-9");
    }

    #[tokio::test]
    async fn test_error_is_consumed_once() {
        let mock = MockComposer::new();
        mock.set_compose_duration(Duration::ZERO).await;
        mock.set_next_error(ServiceError::Api("render failed".to_string())).await;

        assert!(mock.compose(&sample_request(), "k").await.is_err());
        assert!(mock.compose(&sample_request(), "k").await.is_ok());
    }
}
