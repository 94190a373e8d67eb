//! Mock cleaner for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::{Cleaner, CleanupReport, ServiceError};

/// A recorded cleanup request.
#[derive(Debug, Clone)]
pub struct RecordedCleanup {
    pub video_path: String,
    pub audio_path: String,
    pub success: bool,
}

/// Mock implementation of [`Cleaner`] for tests.
///
/// By default reports every non-empty input path as deleted; a fixed
/// report can be configured to exercise partial failures.
pub struct MockCleaner {
    cleanups: Arc<RwLock<Vec<RecordedCleanup>>>,
    report: Arc<RwLock<Option<CleanupReport>>>,
    next_error: Arc<RwLock<Option<ServiceError>>>,
    cleanup_duration: Arc<RwLock<Duration>>,
}

impl MockCleaner {
    pub fn new() -> Self {
        Self {
            cleanups: Arc::new(RwLock::new(Vec::new())),
            report: Arc::new(RwLock::new(None)),
            next_error: Arc::new(RwLock::new(None)),
            cleanup_duration: Arc::new(RwLock::new(Duration::from_millis(100))),
        }
    }

    pub async fn recorded_cleanups(&self) -> Vec<RecordedCleanup> {
        self.cleanups.read().await.clone()
    }

    pub async fn cleanup_count(&self) -> usize {
        self.cleanups.read().await.len()
    }

    /// Return this fixed report from subsequent cleanups.
    pub async fn set_report(&self, report: CleanupReport) {
        *self.report.write().await = Some(report);
    }

    /// Make the next cleanup fail with the given error. Consumed once.
    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set how long each cleanup takes.
    pub async fn set_cleanup_duration(&self, duration: Duration) {
        *self.cleanup_duration.write().await = duration;
    }

    async fn take_error(&self) -> Option<ServiceError> {
        self.next_error.write().await.take()
    }
}

impl Default for MockCleaner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cleaner for MockCleaner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn cleanup(
        &self,
        video_path: &str,
        audio_path: &str,
    ) -> Result<CleanupReport, ServiceError> {
        let duration = *self.cleanup_duration.read().await;
        tokio::time::sleep(duration).await;

        if let Some(error) = self.take_error().await {
            self.cleanups.write().await.push(RecordedCleanup {
                video_path: video_path.to_string(),
                audio_path: audio_path.to_string(),
                success: false,
            });
            return Err(error);
        }

        self.cleanups.write().await.push(RecordedCleanup {
            video_path: video_path.to_string(),
            audio_path: audio_path.to_string(),
            success: true,
        });

        let report = match self.report.read().await.clone() {
            Some(fixed) => fixed,
            None => CleanupReport {
                deleted: [video_path, audio_path]
                    .iter()
                    .filter(|p| !p.is_empty())
                    .map(|p| p.to_string())
                    .collect(),
                errors: Vec::new(),
            },
        };
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_report_deletes_non_empty_paths() {
        let mock = MockCleaner::new();
        mock.set_cleanup_duration(Duration::ZERO).await;

        let report = mock.cleanup("/downloads/a.mp4", "").await.unwrap();
        assert_eq!(report.deleted, vec!["/downloads/a.mp4".to_string()]);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_fixed_report() {
        let mock = MockCleaner::new();
        mock.set_cleanup_duration(Duration::ZERO).await;
        mock.set_report(CleanupReport {
            deleted: vec!["/downloads/a.mp4".to_string()],
            errors: vec!["/media/b.mp3: permission denied".to_string()],
        })
        .await;

        let report = mock.cleanup("/downloads/a.mp4", "/media/b.mp3").await.unwrap();
        assert_eq!(report.deleted_count(), 1);
        assert_eq!(report.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_records_paths() {
        let mock = MockCleaner::new();
        mock.set_cleanup_duration(Duration::ZERO).await;

        mock.cleanup("/v.mp4", "/a.mp3").await.unwrap();

        let recorded = mock.recorded_cleanups().await;
        assert_eq!(recorded[0].video_path, "/v.mp4");
        assert_eq!(recorded[0].audio_path, "/a.mp3");
        assert!(recorded[0].success);
    }
}
