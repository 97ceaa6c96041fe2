//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::content::codec::DEFAULT_MAX_ENCODED_BYTES;

/// Root configuration for the content service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings (bind address, API prefix).
    pub server: ServerConfig,

    /// Where rule content and groups are loaded from.
    pub content: ContentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Prefix every endpoint is mounted under. Starts and ends with `/`.
    pub api_prefix: String,

    /// OpenAPI specification file; served under its file name.
    pub api_spec_file: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            api_prefix: "/api/v1/".to_string(),
            api_spec_file: "openapi.json".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Route path of the OpenAPI specification file.
    pub fn api_spec_route(&self) -> Option<String> {
        std::path::Path::new(&self.api_spec_file)
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{}{}", self.api_prefix, name))
    }
}

/// Content source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Root directory of the rule content tree.
    pub path: String,

    /// TOML file with `[[groups]]` definitions.
    pub groups_path: String,

    /// Ceiling for the encoded content blob in bytes.
    pub max_encoded_bytes: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: "./rules/content".to_string(),
            groups_path: "./groups_config.toml".to_string(),
            max_encoded_bytes: DEFAULT_MAX_ENCODED_BYTES,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
