//! Controller-wide configuration
//!
//! Loaded once by the embedding process (from YAML or the environment) and
//! passed explicitly to the controller.

use crate::key::IngressKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default prefix for generated load balancer names
pub const DEFAULT_ALB_NAME_PREFIX: &str = "k8s";

/// Errors raised while loading [`ControllerConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML document could not be parsed
    #[error("Invalid controller config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An environment variable had an unusable value
    #[error("Invalid value for {variable}: {message}")]
    InvalidEnv { variable: String, message: String },
}

/// Controller-wide policy and naming settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfig {
    /// Only allow internet-facing load balancers for allow-listed ingresses
    #[serde(default)]
    pub restrict_scheme: bool,

    /// namespace -> ingress names allowed to be internet-facing
    #[serde(default)]
    pub internet_facing_ingresses: BTreeMap<String, Vec<String>>,

    /// Prefix of generated load balancer names
    #[serde(default = "default_alb_name_prefix")]
    pub alb_name_prefix: String,

    /// Cluster name, used for the ownership tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
}

fn default_alb_name_prefix() -> String {
    DEFAULT_ALB_NAME_PREFIX.to_string()
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            restrict_scheme: false,
            internet_facing_ingresses: BTreeMap::new(),
            alb_name_prefix: default_alb_name_prefix(),
            cluster_name: None,
        }
    }
}

impl ControllerConfig {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from environment variables
    ///
    /// - `ALB_RESTRICT_SCHEME`: `true` / `false`
    /// - `ALB_INTERNET_FACING_INGRESSES`: comma separated `namespace/name` list
    /// - `ALB_NAME_PREFIX`: load balancer name prefix
    /// - `CLUSTER_NAME`: cluster name for ownership tags
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("ALB_RESTRICT_SCHEME") {
            config.restrict_scheme = value.trim().parse::<bool>().map_err(|_| ConfigError::InvalidEnv {
                variable: "ALB_RESTRICT_SCHEME".to_string(),
                message: format!("expected true or false, got '{}'", value),
            })?;
        }

        if let Some(value) = lookup("ALB_INTERNET_FACING_INGRESSES") {
            for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                let (namespace, name) = entry
                    .split_once('/')
                    .filter(|(ns, n)| !ns.is_empty() && !n.is_empty())
                    .ok_or_else(|| ConfigError::InvalidEnv {
                        variable: "ALB_INTERNET_FACING_INGRESSES".to_string(),
                        message: format!("expected namespace/name, got '{}'", entry),
                    })?;
                config
                    .internet_facing_ingresses
                    .entry(namespace.to_string())
                    .or_default()
                    .push(name.to_string());
            }
        }

        if let Some(prefix) = lookup("ALB_NAME_PREFIX").filter(|p| !p.trim().is_empty()) {
            config.alb_name_prefix = prefix.trim().to_string();
        }

        config.cluster_name = lookup("CLUSTER_NAME").filter(|c| !c.trim().is_empty());

        Ok(config)
    }

    /// Whether the ingress is on the internet-facing allow-list
    pub fn is_internet_facing_allowed(&self, key: &IngressKey) -> bool {
        self.internet_facing_ingresses
            .get(&key.namespace)
            .is_some_and(|names| names.iter().any(|n| n == &key.name))
    }
}
