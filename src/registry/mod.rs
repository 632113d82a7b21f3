//! Endpoint registry.
//!
//! # Responsibilities
//! - Hold the static, ordered list of monitored endpoints
//! - Guarantee url uniqueness (duplicates are a configuration error)
//!
//! # Design Decisions
//! - Built once at startup from validated config, never mutated afterwards
//! - Endpoints are shared as `Arc<Endpoint>` so attempts and results can
//!   reference them without cloning strings per probe

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::config::validation::{validate_endpoints, ValidationError};
use crate::config::EndpointConfig;

/// A monitored target, identified by its url.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
    pub expected_status: u16,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, expected_status: u16) -> Self {
        Self {
            url: url.into(),
            expected_status,
        }
    }
}

impl From<&EndpointConfig> for Endpoint {
    fn from(config: &EndpointConfig) -> Self {
        Self::new(config.url.clone(), config.expected_status)
    }
}

/// Ordered, duplicate-free set of endpoints.
#[derive(Debug, Clone)]
pub struct Registry {
    endpoints: Vec<Arc<Endpoint>>,
}

impl Registry {
    /// Build a registry, rejecting malformed entries and duplicate urls.
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, Vec<ValidationError>> {
        let errors = validate_endpoints(
            endpoints
                .iter()
                .map(|e| (e.url.as_str(), e.expected_status)),
        );
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            endpoints: endpoints.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_config(configs: &[EndpointConfig]) -> Result<Self, Vec<ValidationError>> {
        Self::new(configs.iter().map(Endpoint::from).collect())
    }

    pub fn endpoints(&self) -> &[Arc<Endpoint>] {
        &self.endpoints
    }

    pub fn get(&self, url: &str) -> Option<&Arc<Endpoint>> {
        self.endpoints.iter().find(|e| e.url == url)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order() {
        let registry = Registry::new(vec![
            Endpoint::new("https://b.test", 200),
            Endpoint::new("https://a.test", 204),
        ])
        .unwrap();

        let urls: Vec<_> = registry.endpoints().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://b.test", "https://a.test"]);
        assert_eq!(registry.get("https://a.test").unwrap().expected_status, 204);
        assert!(registry.get("https://c.test").is_none());
    }

    #[test]
    fn test_rejects_duplicates() {
        let errors = Registry::new(vec![
            Endpoint::new("https://a.test", 200),
            Endpoint::new("https://a.test", 200),
        ])
        .unwrap_err();
        assert!(matches!(errors[0], ValidationError::DuplicateUrl { index: 1, .. }));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Registry::new(vec![]).is_err());
    }
}
