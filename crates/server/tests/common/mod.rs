//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock adapters injected, enabling comprehensive API testing without
//! external infrastructure.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use overdub_core::{
    testing::{
        MockCleaner, MockComposer, MockDownloader, MockKvStore, MockSynthesizer, MockTranslator,
    },
    Cleaner, Composer, Config, CredentialManager, CredentialUpdate, Downloader, KvStore,
    PipelineConfig, PipelineOrchestrator, Provider, Synthesizer, Translator,
};

/// Re-export fixtures for test convenience
pub use overdub_core::testing::fixtures;

/// Test fixture for API testing with mock adapters.
///
/// Provides an in-process server with fully controllable mocks for all five
/// adapters, a real credential manager over an in-memory store, and a real
/// orchestrator with short timer delays.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_download() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture
///         .post("/api/v1/pipeline/download", json!({"url": "https://v.example/1"}))
///         .await;
///
///     assert_status!(response, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock downloader - control download results
    pub downloader: Arc<MockDownloader>,
    /// Mock translator - control translation results
    pub translator: Arc<MockTranslator>,
    /// Mock synthesizer - control narration results
    pub synthesizer: Arc<MockSynthesizer>,
    /// Mock composer - control composition results
    pub composer: Arc<MockComposer>,
    /// Mock cleaner - control cleanup reports
    pub cleaner: Arc<MockCleaner>,
    /// Credential manager backing the API, for direct pool seeding
    pub credentials: Arc<CredentialManager>,
    /// Orchestrator backing the API, for direct state inspection
    pub orchestrator: Arc<PipelineOrchestrator>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        let downloader = Arc::new(MockDownloader::new());
        let translator = Arc::new(MockTranslator::new());
        let synthesizer = Arc::new(MockSynthesizer::new());
        let composer = Arc::new(MockComposer::new());
        let cleaner = Arc::new(MockCleaner::new());

        // No artificial latency in API tests
        downloader.set_download_duration(Duration::ZERO).await;
        translator.set_translate_duration(Duration::ZERO).await;
        synthesizer.set_synthesize_duration(Duration::ZERO).await;
        composer.set_compose_duration(Duration::ZERO).await;
        cleaner.set_cleanup_duration(Duration::ZERO).await;

        let store: Arc<dyn KvStore> = Arc::new(MockKvStore::new());
        let credentials = Arc::new(CredentialManager::new(store));
        credentials
            .hydrate()
            .await
            .expect("Failed to hydrate credentials");

        let mut config = Config::default();
        config.pipeline = PipelineConfig {
            advance_delay_ms: 25,
            cleanup_prompt_delay_ms: 25,
        };

        let orchestrator = Arc::new(PipelineOrchestrator::new(
            config.pipeline.clone(),
            Arc::clone(&credentials),
            Arc::clone(&downloader) as Arc<dyn Downloader>,
            Arc::clone(&translator) as Arc<dyn Translator>,
            Arc::clone(&synthesizer) as Arc<dyn Synthesizer>,
            Arc::clone(&composer) as Arc<dyn Composer>,
            Arc::clone(&cleaner) as Arc<dyn Cleaner>,
        ));

        let state = Arc::new(overdub_server::state::AppState::new(
            config,
            Arc::clone(&orchestrator),
            Arc::clone(&credentials),
        ));

        let router = overdub_server::api::create_router(state);

        Self {
            router,
            downloader,
            translator,
            synthesizer,
            composer,
            cleaner,
            credentials,
            orchestrator,
        }
    }

    /// Seed a pool with an enabled credential carrying a secret.
    ///
    /// Returns the new record's id.
    pub async fn seed_credential(&self, provider: Provider, display_name: &str, secret: &str) -> String {
        let record = self
            .credentials
            .add(provider, display_name)
            .await
            .expect("Failed to add credential");
        self.credentials
            .update(
                provider,
                &record.id,
                CredentialUpdate {
                    secret: Some(secret.to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to set credential secret");
        record.id
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a PATCH request with JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> TestResponse {
        self.request("PATCH", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Poll `GET /api/v1/pipeline` until `stage` matches, or panic after ~2s.
    pub async fn wait_for_stage(&self, stage: &str) {
        for _ in 0..100 {
            let response = self.get("/api/v1/pipeline").await;
            if response.body["stage"] == stage {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Pipeline never reached stage {}", stage);
    }

    /// Poll `GET /api/v1/pipeline` until `cleanupPending` is true, or panic after ~2s.
    pub async fn wait_for_cleanup_pending(&self) {
        for _ in 0..100 {
            let response = self.get("/api/v1/pipeline").await;
            if response.body["cleanupPending"] == true {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Cleanup prompt never became pending");
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
