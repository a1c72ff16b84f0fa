//! Target group set contract

use alb_cloud_client::CallContext;
use ingress_types::IngressKey;
use k8s_openapi::api::networking::v1::Ingress;
use std::collections::BTreeMap;

/// A target group backing one service port of the ingress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroup {
    /// Target group ARN
    pub arn: String,
    /// Target group name
    pub name: String,
    /// Backend service the group forwards to
    pub service_name: String,
    /// Backend service port
    pub service_port: u16,
}

/// Converged target groups of an ingress, keyed by `service:port`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetGroupSet {
    /// Target groups keyed by `service:port`
    pub target_groups: BTreeMap<String, TargetGroup>,
}

impl TargetGroupSet {
    /// Build a set keyed by each group's `service:port`
    pub fn new(target_groups: impl IntoIterator<Item = TargetGroup>) -> Self {
        Self {
            target_groups: target_groups
                .into_iter()
                .map(|tg| (format!("{}:{}", tg.service_name, tg.service_port), tg))
                .collect(),
        }
    }

    /// True when the ingress has no target groups
    pub fn is_empty(&self) -> bool {
        self.target_groups.is_empty()
    }
}

/// Reconciles the target groups of an ingress
#[async_trait::async_trait]
pub trait TargetGroupReconciler: Send + Sync {
    /// Ensure a target group exists for every backend of the ingress
    async fn reconcile(&self, ctx: &CallContext, ingress: &Ingress) -> anyhow::Result<TargetGroupSet>;

    /// Remove target groups of the ingress that are not in `in_use`
    async fn garbage_collect(&self, ctx: &CallContext, in_use: &TargetGroupSet) -> anyhow::Result<()>;

    /// Remove every target group of the ingress. Must tolerate already-absent groups.
    async fn delete(&self, ctx: &CallContext, key: &IngressKey) -> anyhow::Result<()>;
}
