//! Mock translator for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::{ServiceError, Translator};

/// A recorded translation request, including the secret it was made with.
#[derive(Debug, Clone)]
pub struct RecordedTranslation {
    pub text: String,
    pub secret: String,
    pub success: bool,
}

/// Mock implementation of [`Translator`] for tests.
///
/// By default echoes the input with a `translated:` prefix; a fixed
/// response can be configured instead.
pub struct MockTranslator {
    translations: Arc<RwLock<Vec<RecordedTranslation>>>,
    translation: Arc<RwLock<Option<String>>>,
    next_error: Arc<RwLock<Option<ServiceError>>>,
    translate_duration: Arc<RwLock<Duration>>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            translations: Arc::new(RwLock::new(Vec::new())),
            translation: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
            translate_duration: Arc::new(RwLock::new(Duration::from_millis(100))),
        }
    }

    pub async fn recorded_translations(&self) -> Vec<RecordedTranslation> {
        self.translations.read().await.clone()
    }

    pub async fn translation_count(&self) -> usize {
        self.translations.read().await.len()
    }

    /// Return this fixed text from subsequent translations.
    pub async fn set_translation(&self, translation: impl Into<String>) {
        *self.translation.write().await = Some(translation.into());
    }

    /// Make the next translation fail with the given error. Consumed once.
    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set how long each translation takes.
    pub async fn set_translate_duration(&self, duration: Duration) {
        *self.translate_duration.write().await = duration;
    }

    async fn take_error(&self) -> Option<ServiceError> {
        self.next_error.write().await.take()
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(&self, text: &str, secret: &str) -> Result<String, ServiceError> {
        let duration = *self.translate_duration.read().await;
        tokio::time::sleep(duration).await;

        if let Some(error) = self.take_error().await {
            self.translations.write().await.push(RecordedTranslation {
                text: text.to_string(),
                secret: secret.to_string(),
                success: false,
            });
            return Err(error);
        }

        self.translations.write().await.push(RecordedTranslation {
            text: text.to_string(),
            secret: secret.to_string(),
            success: true,
        });

        let translated = match self.translation.read().await.clone() {
            Some(fixed) => fixed,
            None => format!("translated: {}", text),
        };
        Ok(translated)
    }
}
