//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject malformed or duplicate endpoints
//! - Validate value ranges (timeouts > 0, concurrency > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Duplicate urls are rejected rather than silently deduplicated

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::MonitorConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("endpoint {index}: invalid url '{url}': {reason}")]
    InvalidUrl { index: usize, url: String, reason: String },

    #[error("endpoint {index}: expected_status {status} is not a valid HTTP status")]
    InvalidStatus { index: usize, status: u16 },

    #[error("endpoint {index}: duplicate url '{url}'")]
    DuplicateUrl { index: usize, url: String },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("event_log.path must not be empty")]
    EmptyLogPath,
}

/// Validate a single endpoint entry.
pub fn validate_endpoint(index: usize, url: &str, expected_status: u16) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let invalid = |reason: String| ValidationError::InvalidUrl {
        index,
        url: url.to_string(),
        reason,
    };

    match Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                errors.push(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
            } else if parsed.host_str().map_or(true, str::is_empty) {
                errors.push(invalid("missing host".to_string()));
            }
        }
        Err(e) => errors.push(invalid(e.to_string())),
    }

    if !(100..=599).contains(&expected_status) {
        errors.push(ValidationError::InvalidStatus {
            index,
            status: expected_status,
        });
    }

    errors
}

/// Validate an endpoint list given as `(url, expected_status)` pairs:
/// non-empty, each entry valid, urls unique.
pub fn validate_endpoints<'a, I>(endpoints: I) -> Vec<ValidationError>
where
    I: IntoIterator<Item = (&'a str, u16)>,
{
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for (index, (url, expected_status)) in endpoints.into_iter().enumerate() {
        errors.extend(validate_endpoint(index, url, expected_status));
        if !seen.insert(url) {
            errors.push(ValidationError::DuplicateUrl {
                index,
                url: url.to_string(),
            });
        }
    }

    if seen.is_empty() {
        return vec![ValidationError::NoEndpoints];
    }
    errors
}

/// Validate a complete configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_endpoints(
        config
            .endpoints
            .iter()
            .map(|e| (e.url.as_str(), e.expected_status)),
    );

    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::NotPositive { field: "probe.timeout_ms" });
    }
    if config.probe.max_concurrency == 0 {
        errors.push(ValidationError::NotPositive { field: "probe.max_concurrency" });
    }
    if config.schedule.interval_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "schedule.interval_secs" });
    }
    if config.event_log.enabled && config.event_log.path.trim().is_empty() {
        errors.push(ValidationError::EmptyLogPath);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }
    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "admin.bind_address",
            value: config.admin.bind_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
