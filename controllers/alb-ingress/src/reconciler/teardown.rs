//! Reverse-order teardown of an ingress load balancer

use super::LoadBalancerController;
use crate::error::{ControllerError, TeardownStep};
use crate::subcontrollers::SecurityGroupAssociation;
use alb_cloud_client::{CallContext, LoadBalancer};
use ingress_types::IngressKey;
use tracing::info;

fn teardown_error(step: TeardownStep) -> impl FnOnce(anyhow::Error) -> ControllerError {
    move |source| ControllerError::Teardown { step, source }
}

impl LoadBalancerController {
    /// Security groups, listeners, target groups, then the load balancer.
    ///
    /// Stops at the first failure; every step tolerates already-absent
    /// resources so the whole sequence can simply be retried.
    pub(super) async fn teardown(&self, ctx: &CallContext, key: &IngressKey, lb: &LoadBalancer) -> Result<(), ControllerError> {
        let association = SecurityGroupAssociation::for_deletion(key.clone(), lb.name.clone(), lb.arn.clone());
        self.sg_association_controller
            .delete(ctx, &association)
            .await
            .map_err(teardown_error(TeardownStep::SecurityGroups))?;

        self.ls_group_controller
            .delete(ctx, &lb.arn)
            .await
            .map_err(teardown_error(TeardownStep::Listeners))?;

        self.tg_group_controller
            .delete(ctx, key)
            .await
            .map_err(teardown_error(TeardownStep::TargetGroups))?;

        info!("Deleting LoadBalancer {} ({})", lb.name, lb.arn);
        self.cloud
            .delete_load_balancer_by_arn(ctx, &lb.arn)
            .await
            .map_err(|err| teardown_error(TeardownStep::LoadBalancer)(err.into()))?;
        info!("Deleted LoadBalancer {} ({})", lb.name, lb.arn);
        Ok(())
    }
}
