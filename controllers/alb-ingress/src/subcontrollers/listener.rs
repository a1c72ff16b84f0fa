//! Listener set contract

use super::target_group::TargetGroupSet;
use alb_cloud_client::CallContext;
use k8s_openapi::api::networking::v1::Ingress;

/// Reconciles the listeners (and their rules) of a load balancer
#[async_trait::async_trait]
pub trait ListenerReconciler: Send + Sync {
    /// Converge listeners of `lb_arn` to the ingress rules, forwarding to `target_groups`
    async fn reconcile(
        &self,
        ctx: &CallContext,
        lb_arn: &str,
        ingress: &Ingress,
        target_groups: &TargetGroupSet,
    ) -> anyhow::Result<()>;

    /// Remove every listener of `lb_arn`. Must tolerate already-absent listeners.
    async fn delete(&self, ctx: &CallContext, lb_arn: &str) -> anyhow::Result<()>;
}
