//! Load balancer attributes reconciler

use alb_cloud_client::{CallContext, CloudApiTrait};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Converges load balancer attributes to the annotated values
#[async_trait::async_trait]
pub trait AttributesReconciler: Send + Sync {
    async fn reconcile(&self, ctx: &CallContext, lb_arn: &str, desired: &BTreeMap<String, String>) -> anyhow::Result<()>;
}

/// Modifies only the attributes whose current value differs from the desired one
pub struct DefaultAttributesReconciler {
    cloud: Arc<dyn CloudApiTrait>,
}

impl DefaultAttributesReconciler {
    pub fn new(cloud: Arc<dyn CloudApiTrait>) -> Self {
        Self { cloud }
    }

    /// Desired entries that are missing or different in `current`
    pub fn changed_attributes(
        current: &BTreeMap<String, String>,
        desired: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        desired
            .iter()
            .filter(|(key, value)| current.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl std::fmt::Debug for DefaultAttributesReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultAttributesReconciler").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl AttributesReconciler for DefaultAttributesReconciler {
    async fn reconcile(&self, ctx: &CallContext, lb_arn: &str, desired: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if desired.is_empty() {
            debug!("No attributes requested for {}", lb_arn);
            return Ok(());
        }

        let current = self.cloud.describe_load_balancer_attributes(ctx, lb_arn).await?;
        let changes = Self::changed_attributes(&current, desired);
        if changes.is_empty() {
            debug!("Attributes of {} already up-to-date", lb_arn);
            return Ok(());
        }

        info!("Modifying attributes of {}: {:?}", lb_arn, changes.keys().collect::<Vec<_>>());
        self.cloud.modify_load_balancer_attributes(ctx, lb_arn, &changes).await?;
        Ok(())
    }
}
