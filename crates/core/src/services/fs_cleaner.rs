//! File system cleaner implementation.

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::error::ServiceError;
use super::traits::Cleaner;
use super::types::CleanupReport;

/// Deletes intermediate files directly on the local file system.
///
/// Usable when this process shares a disk with the helper service. Paths
/// that no longer exist are skipped silently; they were the point of the
/// cleanup in the first place.
#[derive(Debug, Clone, Default)]
pub struct FsCleaner;

impl FsCleaner {
    /// Creates a new file system cleaner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Cleaner for FsCleaner {
    fn name(&self) -> &str {
        "fs"
    }

    async fn cleanup(
        &self,
        video_path: &str,
        audio_path: &str,
    ) -> Result<CleanupReport, ServiceError> {
        let mut report = CleanupReport::default();

        for path in [video_path, audio_path] {
            if path.is_empty() {
                continue;
            }
            match fs::remove_file(path).await {
                Ok(()) => {
                    debug!(path = %path, "Deleted intermediate file");
                    report.deleted.push(path.to_string());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    // Already gone, nothing to clean
                }
                Err(e) => report.errors.push(format!("{}: {}", path, e)),
            }
        }

        Ok(report)
    }
}
