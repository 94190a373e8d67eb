//! Mock speech synthesizer for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::{ServiceError, Synthesizer};

/// A recorded synthesis request.
#[derive(Debug, Clone)]
pub struct RecordedSynthesis {
    pub text: String,
    pub secret: String,
    pub success: bool,
}

/// Mock implementation of [`Synthesizer`] for tests.
pub struct MockSynthesizer {
    syntheses: Arc<RwLock<Vec<RecordedSynthesis>>>,
    audio_path: Arc<RwLock<String>>,
    next_error: Arc<RwLock<Option<ServiceError>>>,
    synthesize_duration: Arc<RwLock<Duration>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            syntheses: Arc::new(RwLock::new(Vec::new())),
            audio_path: Arc::new(RwLock::new("/media/narration.mp3".to_string())),
            next_error: Arc::new(RwLock::new(None)),
            synthesize_duration: Arc::new(RwLock::new(Duration::from_millis(100))),
        }
    }

    pub async fn recorded_syntheses(&self) -> Vec<RecordedSynthesis> {
        self.syntheses.read().await.clone()
    }

    pub async fn synthesis_count(&self) -> usize {
        self.syntheses.read().await.len()
    }

    /// Set the audio path returned by subsequent syntheses.
    pub async fn set_audio_path(&self, path: impl Into<String>) {
        *self.audio_path.write().await = path.into();
    }

    /// Make the next synthesis fail with the given error. Consumed once.
    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set how long each synthesis takes.
    pub async fn set_synthesize_duration(&self, duration: Duration) {
        *self.synthesize_duration.write().await = duration;
    }

    async fn take_error(&self) -> Option<ServiceError> {
        self.next_error.write().await.take()
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, text: &str, secret: &str) -> Result<String, ServiceError> {
        let duration = *self.synthesize_duration.read().await;
        tokio::time::sleep(duration).await;

        if let Some(error) = self.take_error().await {
            self.syntheses.write().await.push(RecordedSynthesis {
                text: text.to_string(),
                secret: secret.to_string(),
                success: false,
            });
            return Err(error);
        }

        self.syntheses.write().await.push(RecordedSynthesis {
            text: text.to_string(),
            secret: secret.to_string(),
            success: true,
        });
        Ok(self.audio_path.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_configured_audio_path() {
        let mock = MockSynthesizer::new();
        mock.set_synthesize_duration(Duration::ZERO).await;
        mock.set_audio_path("/media/episode-7.mp3").await;

        let path = mock.synthesize("script text", "voice-key").await.unwrap();
        assert_eq!(path, "/media/episode-7.mp3");

        let recorded = mock.recorded_syntheses().await;
        assert_eq!(recorded[0].text, "script text");
        assert_eq!(recorded[0].secret, "voice-key");
    }

    #[tokio::test]
    async fn test_error_is_consumed_once() {
        let mock = MockSynthesizer::new();
        mock.set_synthesize_duration(Duration::ZERO).await;
        mock.set_next_error(ServiceError::ConnectionFailed("refused".to_string())).await;

        assert!(mock.synthesize("text", "k").await.is_err());
        assert!(mock.synthesize("text", "k").await.is_ok());
    }
}
