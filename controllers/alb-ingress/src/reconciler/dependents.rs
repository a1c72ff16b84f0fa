//! Dependent-resource convergence, in strict dependency order

use super::LoadBalancerController;
use super::resolve::resolve_security_groups;
use super::waf::reconcile_waf;
use crate::error::{ControllerError, DependentStep};
use crate::subcontrollers::SecurityGroupAssociation;
use alb_cloud_client::{CallContext, LoadBalancer};
use ingress_types::{IngressAnnotations, IngressKey};
use k8s_openapi::api::networking::v1::Ingress;
use tracing::debug;

fn dependent(step: DependentStep) -> impl FnOnce(anyhow::Error) -> ControllerError {
    move |source| ControllerError::DependentResource { step, source }
}

/// Abort before `step` if the cycle was cancelled or ran out of time
fn checkpoint(ctx: &CallContext, step: DependentStep) -> Result<(), ControllerError> {
    ctx.check(&step.to_string())
        .map_err(|err| dependent(step)(err.into()))
}

impl LoadBalancerController {
    /// Attributes, web ACL, target groups, listeners, target group GC and
    /// security groups, stopping at the first failure.
    pub(super) async fn reconcile_dependents(
        &self,
        ctx: &CallContext,
        key: &IngressKey,
        ingress: &Ingress,
        annotations: &IngressAnnotations,
        lb: &LoadBalancer,
    ) -> Result<(), ControllerError> {
        let lb_annotations = &annotations.load_balancer;

        let step = DependentStep::Attributes;
        checkpoint(ctx, step)?;
        self.attrs_controller
            .reconcile(ctx, &lb.arn, &lb_annotations.attributes)
            .await
            .map_err(dependent(step))?;

        let step = DependentStep::Waf;
        checkpoint(ctx, step)?;
        reconcile_waf(self.cloud.as_ref(), ctx, &lb.arn, lb_annotations.web_acl_id.as_deref())
            .await
            .map_err(|err| dependent(step)(err.into()))?;

        let step = DependentStep::TargetGroups;
        checkpoint(ctx, step)?;
        let target_groups = self
            .tg_group_controller
            .reconcile(ctx, ingress)
            .await
            .map_err(dependent(step))?;
        debug!("Ingress {} has {} target groups", key, target_groups.target_groups.len());

        let step = DependentStep::Listeners;
        checkpoint(ctx, step)?;
        self.ls_group_controller
            .reconcile(ctx, &lb.arn, ingress, &target_groups)
            .await
            .map_err(dependent(step))?;

        let step = DependentStep::TargetGroupGc;
        checkpoint(ctx, step)?;
        self.tg_group_controller
            .garbage_collect(ctx, &target_groups)
            .await
            .map_err(dependent(step))?;

        let step = DependentStep::SecurityGroups;
        checkpoint(ctx, step)?;
        let external_sg_ids = resolve_security_groups(self.cloud.as_ref(), ctx, &lb_annotations.security_groups)
            .await
            .map_err(|err| dependent(step)(err.into()))?;
        let association = SecurityGroupAssociation {
            ingress_key: key.clone(),
            lb_id: lb.name.clone(),
            lb_arn: lb.arn.clone(),
            lb_ports: lb_annotations.port_numbers(),
            lb_inbound_cidrs: lb_annotations.inbound_cidrs.clone(),
            external_sg_ids,
            target_groups,
        };
        self.sg_association_controller
            .reconcile(ctx, &association)
            .await
            .map_err(dependent(step))?;

        Ok(())
    }
}
