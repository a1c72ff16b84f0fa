//! Cluster-state store contract.
//!
//! The store yields already-parsed annotations per ingress and the
//! controller-wide configuration. It is read-only from the controller's side.

use alb_cloud_client::CallContext;
use ingress_types::{ControllerConfig, IngressAnnotations, IngressKey};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Read access to parsed ingress state
#[async_trait::async_trait]
pub trait ClusterStore: Send + Sync {
    /// Parsed annotations of an ingress. Fails when `ctx` is cancelled or past its deadline.
    async fn get_ingress_annotations(&self, ctx: &CallContext, key: &IngressKey) -> anyhow::Result<IngressAnnotations>;

    /// Current controller-wide configuration
    fn get_controller_config(&self) -> ControllerConfig;
}

/// Store backed by in-process maps, fed by whatever watches the cluster.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    annotations: RwLock<HashMap<IngressKey, IngressAnnotations>>,
    config: RwLock<ControllerConfig>,
}

impl InMemoryStore {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            annotations: RwLock::new(HashMap::new()),
            config: RwLock::new(config),
        }
    }

    /// Insert or replace the annotations of an ingress
    pub fn set_annotations(&self, key: IngressKey, annotations: IngressAnnotations) {
        self.annotations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, annotations);
    }

    /// Forget an ingress
    pub fn remove_annotations(&self, key: &IngressKey) {
        self.annotations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Replace the controller configuration
    pub fn set_config(&self, config: ControllerConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }
}

#[async_trait::async_trait]
impl ClusterStore for InMemoryStore {
    async fn get_ingress_annotations(&self, ctx: &CallContext, key: &IngressKey) -> anyhow::Result<IngressAnnotations> {
        ctx.check("GetIngressAnnotations")?;
        self.annotations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no annotations cached for ingress {}", key))
    }

    fn get_controller_config(&self) -> ControllerConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
