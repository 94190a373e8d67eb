//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of all external service traits
//! and of the key-value store, allowing comprehensive E2E testing without
//! real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use overdub_core::testing::{MockDownloader, MockTranslator};
//!
//! let downloader = MockDownloader::new();
//! let translator = MockTranslator::new();
//!
//! // Configure mock responses
//! translator.set_translation("hola mundo");
//! downloader.set_next_error(ServiceError::Timeout);
//!
//! // Use in PipelineOrchestrator...
//! ```

mod mock_cleaner;
mod mock_composer;
mod mock_downloader;
mod mock_kv_store;
mod mock_synthesizer;
mod mock_translator;

pub use mock_cleaner::{MockCleaner, RecordedCleanup};
pub use mock_composer::{MockComposer, RecordedComposition};
pub use mock_downloader::{MockDownloader, RecordedDownload};
pub use mock_kv_store::MockKvStore;
pub use mock_synthesizer::{MockSynthesizer, RecordedSynthesis};
pub use mock_translator::{MockTranslator, RecordedTranslation};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::services::ComposeRequest;

    /// Create a compose request with all four tracks filled in.
    pub fn compose_request() -> ComposeRequest {
        ComposeRequest {
            video_path: "/downloads/source.mp4".to_string(),
            audio_path: "/media/narration.mp3".to_string(),
            bgm_path: "/assets/bgm.mp3".to_string(),
            sfx_path: "/assets/sfx.mp3".to_string(),
        }
    }
}
