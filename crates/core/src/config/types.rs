use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::pipeline::PipelineConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub services: ServicesConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("overdub.db")
}

/// External service adapter configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServicesConfig {
    /// Media helper service the bridge adapters talk to
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// Cleanup backend
    #[serde(default)]
    pub cleaner: CleanerBackend,
}

/// Media helper service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeConfig {
    /// Helper service URL (e.g., "http://localhost:8000")
    #[serde(default = "default_bridge_url")]
    pub url: String,
    /// Request timeout in seconds (default: 120, downloads and renders are slow)
    #[serde(default = "default_bridge_timeout")]
    pub timeout_secs: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: default_bridge_url(),
            timeout_secs: default_bridge_timeout(),
        }
    }
}

fn default_bridge_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_bridge_timeout() -> u32 {
    120
}

/// Available cleanup backends
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CleanerBackend {
    /// Delegate deletion to the media helper service
    #[default]
    Bridge,
    /// Delete files directly from this process
    Fs,
}

/// Sanitized config for API responses (bridge URL redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pipeline: PipelineConfig,
    pub services: SanitizedServicesConfig,
}

/// Sanitized services config
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedServicesConfig {
    pub bridge_configured: bool,
    pub bridge_timeout_secs: u32,
    pub cleaner: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            pipeline: config.pipeline.clone(),
            services: SanitizedServicesConfig {
                bridge_configured: !config.services.bridge.url.is_empty(),
                bridge_timeout_secs: config.services.bridge.timeout_secs,
                cleaner: match config.services.cleaner {
                    CleanerBackend::Bridge => "bridge".to_string(),
                    CleanerBackend::Fs => "fs".to_string(),
                },
            },
        }
    }
}
