//! HTTP bridge to the media helper service.
//!
//! The helper exposes one JSON endpoint per pipeline operation. Provider
//! secrets are forwarded per request in dedicated headers and never stored
//! by the bridge.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BridgeConfig;

use super::error::ServiceError;
use super::traits::{Cleaner, Composer, Downloader, Synthesizer, Translator};
use super::types::{CleanupReport, ComposeRequest, DownloadResult};

/// Header carrying the translation-provider secret.
const TRANSLATE_KEY_HEADER: &str = "X-Translate-Key";
/// Header carrying the speech-synthesis secret.
const VOICE_KEY_HEADER: &str = "X-Voice-Key";

/// One client for all helper endpoints.
///
/// The helper is a single service, so one bridge instance implements every
/// adapter trait; the orchestrator still sees five independent collaborators.
pub struct MediaBridge {
    client: Client,
    config: BridgeConfig,
}

impl MediaBridge {
    /// Create a new bridge against the configured helper service.
    pub fn new(config: BridgeConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    async fn post_json<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        secret_header: Option<(&str, &str)>,
    ) -> Result<T, ServiceError>
    where
        B: Serialize + Sync,
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url(), endpoint);
        debug!(url = %url, "Calling media helper");

        let mut request = self.client.post(&url).json(body);
        if let Some((name, value)) = secret_header {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout
            } else if e.is_connect() {
                ServiceError::ConnectionFailed(e.to_string())
            } else {
                ServiceError::Api(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api(extract_detail(&body, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Api(e.to_string()))
    }
}

/// Pull the helper's own error wording out of a failure response.
///
/// The helper reports errors as `{"detail": "..."}`; that text is what the
/// user should see. Anything else falls back to the HTTP status plus a
/// truncated body.
fn extract_detail(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }
    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>())
    }
}

#[derive(Debug, Serialize)]
struct DownloadBody<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ComposeBody<'a> {
    video_path: &'a str,
    audio_path: &'a str,
    bgm_path: &'a str,
    sfx_path: &'a str,
}

#[derive(Debug, Serialize)]
struct CleanupBody<'a> {
    video_path: &'a str,
    audio_path: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct SynthesizeResponse {
    audio_path: String,
}

#[derive(Debug, Deserialize)]
struct ComposeResponse {
    video_path: String,
}

#[derive(Debug, Deserialize)]
struct CleanupResponse {
    #[serde(default)]
    deleted: Vec<String>,
    #[serde(default)]
    errors: Vec<String>,
}

#[async_trait]
impl Downloader for MediaBridge {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn download(&self, url: &str) -> Result<DownloadResult, ServiceError> {
        self.post_json("/download", &DownloadBody { url }, None).await
    }
}

#[async_trait]
impl Translator for MediaBridge {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn translate(&self, text: &str, secret: &str) -> Result<String, ServiceError> {
        let response: TranslateResponse = self
            .post_json(
                "/translate",
                &TextBody { text },
                Some((TRANSLATE_KEY_HEADER, secret)),
            )
            .await?;
        Ok(response.translated_text)
    }
}

#[async_trait]
impl Synthesizer for MediaBridge {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn synthesize(&self, text: &str, secret: &str) -> Result<String, ServiceError> {
        let response: SynthesizeResponse = self
            .post_json(
                "/synthesize",
                &TextBody { text },
                Some((VOICE_KEY_HEADER, secret)),
            )
            .await?;
        Ok(response.audio_path)
    }
}

#[async_trait]
impl Composer for MediaBridge {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn compose(
        &self,
        request: &ComposeRequest,
        secret: &str,
    ) -> Result<String, ServiceError> {
        let response: ComposeResponse = self
            .post_json(
                "/compose",
                &ComposeBody {
                    video_path: &request.video_path,
                    audio_path: &request.audio_path,
                    bgm_path: &request.bgm_path,
                    sfx_path: &request.sfx_path,
                },
                Some((TRANSLATE_KEY_HEADER, secret)),
            )
            .await?;
        Ok(response.video_path)
    }
}

#[async_trait]
impl Cleaner for MediaBridge {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn cleanup(
        &self,
        video_path: &str,
        audio_path: &str,
    ) -> Result<CleanupReport, ServiceError> {
        let response: CleanupResponse = self
            .post_json(
                "/cleanup",
                &CleanupBody {
                    video_path,
                    audio_path,
                },
                None,
            )
            .await?;
        Ok(CleanupReport {
            deleted: response.deleted,
            errors: response.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let bridge = MediaBridge::new(BridgeConfig {
            url: "http://localhost:8000/".to_string(),
            ..Default::default()
        });
        assert_eq!(bridge.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_extract_detail_prefers_helper_message() {
        let detail = extract_detail(
            r#"{"detail": "Video format not supported"}"#,
            StatusCode::UNPROCESSABLE_ENTITY,
        );
        assert_eq!(detail, "Video format not supported");
    }

    #[test]
    fn test_extract_detail_falls_back_to_status() {
        assert_eq!(
            extract_detail("", StatusCode::BAD_GATEWAY),
            "HTTP 502 Bad Gateway"
        );
    }

    #[test]
    fn test_extract_detail_includes_non_json_body() {
        let detail = extract_detail("<html>nope</html>", StatusCode::INTERNAL_SERVER_ERROR);
        assert!(detail.starts_with("HTTP 500"));
        assert!(detail.contains("<html>nope</html>"));
    }

    #[test]
    fn test_cleanup_response_tolerates_missing_fields() {
        let response: CleanupResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(response.deleted.is_empty());
        assert!(response.errors.is_empty());
    }
}
