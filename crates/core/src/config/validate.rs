use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Bridge URL is present and absolute
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Bridge validation
    let url = &config.services.bridge.url;
    if url.is_empty() {
        return Err(ConfigError::ValidationError(
            "services.bridge.url cannot be empty".to_string(),
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "services.bridge.url must be an http(s) URL, got '{}'",
            url
        )));
    }

    Ok(())
}
