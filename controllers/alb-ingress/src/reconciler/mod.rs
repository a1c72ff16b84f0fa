//! Load balancer reconciliation for ingresses.
//!
//! This module is organized by pipeline stage:
//! - `desired`: desired configuration building and policy validation
//! - `resolve`: security group and subnet reference resolution
//! - `instance`: create, recreate or patch of the load balancer itself
//! - `waf`: web ACL association
//! - `dependents`: attributes, target groups, listeners and security groups
//! - `teardown`: reverse-order deletion

pub mod desired;
pub mod instance;
pub mod resolve;
pub mod waf;
mod dependents;
mod teardown;

#[cfg(test)]
mod teardown_test;

use crate::error::ControllerError;
use crate::naming::NameTagGenerator;
use crate::store::ClusterStore;
use crate::subcontrollers::{
    AttributesReconciler, DefaultAttributesReconciler, ListenerReconciler, SecurityGroupAssociationReconciler,
    TargetGroupReconciler,
};
use alb_cloud_client::{CallContext, CloudApiTrait};
use desired::{build_desired_config, validate_desired_config};
use ingress_types::IngressKey;
use instance::ensure_instance;
use k8s_openapi::api::networking::v1::Ingress;
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, info_span};

/// What a successful reconcile reports back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerStatus {
    /// ARN of the converged load balancer
    pub arn: String,
    /// Public or internal DNS name clients resolve
    pub dns_name: String,
}

/// Converges the load balancer of an ingress and its dependent resources.
///
/// Holds no state between calls. Callers must serialize calls for the same
/// ingress; calls for different ingresses may run concurrently.
pub struct LoadBalancerController {
    pub(crate) cloud: Arc<dyn CloudApiTrait>,
    pub(crate) store: Arc<dyn ClusterStore>,
    pub(crate) name_tag_gen: Arc<dyn NameTagGenerator>,
    pub(crate) tg_group_controller: Arc<dyn TargetGroupReconciler>,
    pub(crate) ls_group_controller: Arc<dyn ListenerReconciler>,
    pub(crate) sg_association_controller: Arc<dyn SecurityGroupAssociationReconciler>,
    pub(crate) attrs_controller: Arc<dyn AttributesReconciler>,
}

impl std::fmt::Debug for LoadBalancerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadBalancerController").finish_non_exhaustive()
    }
}

impl LoadBalancerController {
    /// Create a controller whose attributes are reconciled directly against `cloud`
    pub fn new(
        cloud: Arc<dyn CloudApiTrait>,
        store: Arc<dyn ClusterStore>,
        name_tag_gen: Arc<dyn NameTagGenerator>,
        tg_group_controller: Arc<dyn TargetGroupReconciler>,
        ls_group_controller: Arc<dyn ListenerReconciler>,
        sg_association_controller: Arc<dyn SecurityGroupAssociationReconciler>,
    ) -> Self {
        let attrs_controller = Arc::new(DefaultAttributesReconciler::new(cloud.clone()));
        Self {
            cloud,
            store,
            name_tag_gen,
            tg_group_controller,
            ls_group_controller,
            sg_association_controller,
            attrs_controller,
        }
    }

    /// Replace the attributes reconciler
    pub fn with_attributes_reconciler(mut self, attrs_controller: Arc<dyn AttributesReconciler>) -> Self {
        self.attrs_controller = attrs_controller;
        self
    }

    /// Drive the load balancer of `ingress` toward its annotated state.
    pub async fn reconcile(&self, ctx: &CallContext, ingress: &Ingress) -> Result<LoadBalancerStatus, ControllerError> {
        let key = IngressKey::from_ingress(ingress)
            .ok_or_else(|| ControllerError::InvalidIngress("ingress has no name".to_string()))?;
        let span = info_span!("reconcile", ingress = %key);

        async {
            info!("Reconciling LoadBalancer for ingress {}", key);
            let result = self.reconcile_inner(ctx, &key, ingress).await;
            match &result {
                Ok(status) => info!("Reconciled LoadBalancer {} ({})", status.arn, status.dns_name),
                Err(e) => error!("Failed to reconcile LoadBalancer for ingress {}: {}", key, e),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn reconcile_inner(
        &self,
        ctx: &CallContext,
        key: &IngressKey,
        ingress: &Ingress,
    ) -> Result<LoadBalancerStatus, ControllerError> {
        let annotations = self
            .store
            .get_ingress_annotations(ctx, key)
            .await
            .map_err(|source| ControllerError::Store {
                key: key.to_string(),
                source,
            })?;

        let desired =
            build_desired_config(self.cloud.as_ref(), self.name_tag_gen.as_ref(), ctx, key, &annotations).await?;
        debug!("Desired LoadBalancer for {}: {:?}", key, desired);

        validate_desired_config(&self.store.get_controller_config(), key, &desired)?;

        let lb = ensure_instance(self.cloud.as_ref(), ctx, &desired).await?;

        self.reconcile_dependents(ctx, key, ingress, &annotations, &lb).await?;

        Ok(LoadBalancerStatus {
            arn: lb.arn,
            dns_name: lb.dns_name,
        })
    }

    /// Remove the load balancer of `key` and everything that depends on it.
    ///
    /// Succeeds without changes when no load balancer exists.
    pub async fn delete(&self, ctx: &CallContext, key: &IngressKey) -> Result<(), ControllerError> {
        let span = info_span!("delete", ingress = %key);

        async {
            let name = self.name_tag_gen.name_lb(&key.namespace, &key.name);
            let existing = self
                .cloud
                .get_load_balancer_by_name(ctx, &name)
                .await
                .map_err(|source| ControllerError::Lookup {
                    name: name.clone(),
                    source,
                })?;

            let Some(lb) = existing else {
                info!("LoadBalancer {} for ingress {} does not exist, nothing to delete", name, key);
                return Ok(());
            };

            let result = self.teardown(ctx, key, &lb).await;
            if let Err(e) = &result {
                error!("Failed to delete LoadBalancer {} for ingress {}: {}", name, key, e);
            }
            result
        }
        .instrument(span)
        .await
    }
}
