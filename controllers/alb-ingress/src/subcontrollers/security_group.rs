//! Security group association contract

use super::target_group::TargetGroupSet;
use alb_cloud_client::CallContext;
use ingress_types::IngressKey;

/// Everything the association reconciler needs to derive LB and target group rules.
///
/// Built fresh every cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupAssociation {
    /// Ingress the association belongs to
    pub ingress_key: IngressKey,
    /// Stable load balancer name
    pub lb_id: String,
    /// Load balancer ARN
    pub lb_arn: String,
    /// Listen ports exposed by the load balancer
    pub lb_ports: Vec<u16>,
    /// CIDR ranges allowed to reach the listen ports
    pub lb_inbound_cidrs: Vec<String>,
    /// Resolved externally managed security group IDs
    pub external_sg_ids: Vec<String>,
    /// Target groups behind the load balancer
    pub target_groups: TargetGroupSet,
}

impl SecurityGroupAssociation {
    /// Association carrying only the identity fields, as used for deletion
    pub fn for_deletion(ingress_key: IngressKey, lb_id: impl Into<String>, lb_arn: impl Into<String>) -> Self {
        Self {
            ingress_key,
            lb_id: lb_id.into(),
            lb_arn: lb_arn.into(),
            lb_ports: Vec::new(),
            lb_inbound_cidrs: Vec::new(),
            external_sg_ids: Vec::new(),
            target_groups: TargetGroupSet::default(),
        }
    }
}

/// Reconciles the security groups attached to a load balancer and its targets
#[async_trait::async_trait]
pub trait SecurityGroupAssociationReconciler: Send + Sync {
    async fn reconcile(&self, ctx: &CallContext, association: &SecurityGroupAssociation) -> anyhow::Result<()>;

    /// Remove managed security groups and rules. Must tolerate already-absent resources.
    async fn delete(&self, ctx: &CallContext, association: &SecurityGroupAssociation) -> anyhow::Result<()>;
}
