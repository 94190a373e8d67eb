pub mod config;
pub mod credentials;
pub mod metrics;
pub mod pipeline;
pub mod services;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, BridgeConfig, CleanerBackend, Config,
    ConfigError, SanitizedConfig,
};
pub use credentials::{
    CredentialError, CredentialManager, CredentialRecord, CredentialUpdate, Provider,
};
pub use pipeline::{PipelineConfig, PipelineError, PipelineOrchestrator, PipelineSnapshot, Stage};
pub use services::{
    Cleaner, CleanupReport, ComposeRequest, Composer, Downloader, FsCleaner, MediaBridge,
    ServiceError, Synthesizer, Translator,
};
pub use store::{KvStore, SqliteKvStore, StoreError};
