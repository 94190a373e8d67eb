//! Mock downloader for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::{Downloader, DownloadResult, ServiceError};

/// A recorded download request.
#[derive(Debug, Clone)]
pub struct RecordedDownload {
    pub url: String,
    pub success: bool,
}

/// Mock implementation of [`Downloader`] for tests.
///
/// Records every call, returns a configurable result and can be primed to
/// fail exactly once.
pub struct MockDownloader {
    downloads: Arc<RwLock<Vec<RecordedDownload>>>,
    result: Arc<RwLock<DownloadResult>>,
    next_error: Arc<RwLock<Option<ServiceError>>>,
    download_duration: Arc<RwLock<Duration>>,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self {
            downloads: Arc::new(RwLock::new(Vec::new())),
            result: Arc::new(RwLock::new(DownloadResult {
                title: "Mock Video".to_string(),
                path: "/downloads/source.mp4".to_string(),
            })),
            next_error: Arc::new(RwLock::new(None)),
            download_duration: Arc::new(RwLock::new(Duration::from_millis(100))),
        }
    }

    pub async fn recorded_downloads(&self) -> Vec<RecordedDownload> {
        self.downloads.read().await.clone()
    }

    pub async fn download_count(&self) -> usize {
        self.downloads.read().await.len()
    }

    /// Set the result returned by subsequent downloads.
    pub async fn set_result(&self, result: DownloadResult) {
        *self.result.write().await = result;
    }

    /// Make the next download fail with the given error. Consumed once.
    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set how long each download takes.
    pub async fn set_download_duration(&self, duration: Duration) {
        *self.download_duration.write().await = duration;
    }

    async fn take_error(&self) -> Option<ServiceError> {
        self.next_error.write().await.take()
    }
}

impl Default for MockDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Downloader for MockDownloader {
    fn name(&self) -> &str {
        "mock"
    }

    async fn download(&self, url: &str) -> Result<DownloadResult, ServiceError> {
        let duration = *self.download_duration.read().await;
        tokio::time::sleep(duration).await;

        if let Some(error) = self.take_error().await {
            self.downloads.write().await.push(RecordedDownload {
                url: url.to_string(),
                success: false,
            });
            return Err(error);
        }

        self.downloads.write().await.push(RecordedDownload {
            url: url.to_string(),
            success: true,
        });
        Ok(self.result.read().await.clone())
    }
}
