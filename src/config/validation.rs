//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, prefixes and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const RESERVED_ROUTES: [&str; 3] = ["groups", "content", "rules"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// True for a path segment the router would read as a parameter or wildcard.
fn is_route_pattern(segment: &str) -> bool {
    segment.starts_with([':', '*']) || segment.contains(['{', '}'])
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }

    let prefix = &config.server.api_prefix;
    if !prefix.starts_with('/') || !prefix.ends_with('/') {
        errors.push(ValidationError::new(
            "server.api_prefix",
            format!("'{}' must start and end with '/'", prefix),
        ));
    }
    if prefix.split('/').any(is_route_pattern) {
        errors.push(ValidationError::new(
            "server.api_prefix",
            format!("'{}' must not contain route parameters or wildcards", prefix),
        ));
    }

    match config.server.api_spec_route() {
        None => errors.push(ValidationError::new(
            "server.api_spec_file",
            "must name a file",
        )),
        Some(route) if route.rsplit('/').next().is_some_and(is_route_pattern) => {
            errors.push(ValidationError::new(
                "server.api_spec_file",
                "file name must not contain route parameters or wildcards",
            ))
        }
        Some(route) if RESERVED_ROUTES.iter().any(|r| route == format!("{}{}", prefix, r)) => {
            errors.push(ValidationError::new(
                "server.api_spec_file",
                format!("'{}' collides with a built-in endpoint", route),
            ))
        }
        Some(_) => {}
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.content.max_encoded_bytes == 0 {
        errors.push(ValidationError::new(
            "content.max_encoded_bytes",
            "must be greater than zero",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
