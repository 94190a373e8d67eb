use std::sync::Arc;
use overdub_core::{Config, CredentialManager, PipelineOrchestrator, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<PipelineOrchestrator>,
    credentials: Arc<CredentialManager>,
}

impl AppState {
    pub fn new(
        config: Config,
        orchestrator: Arc<PipelineOrchestrator>,
        credentials: Arc<CredentialManager>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            credentials,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn orchestrator(&self) -> &PipelineOrchestrator {
        self.orchestrator.as_ref()
    }

    pub fn credentials(&self) -> &CredentialManager {
        self.credentials.as_ref()
    }
}
