//! Web ACL association reconciliation

use crate::error::ControllerError;
use alb_cloud_client::{CallContext, CloudApiTrait, WebAclSummary};
use tracing::{debug, info};

/// Action needed to bring the web ACL association to the desired state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WafAction {
    /// Association already matches
    NoOp,
    /// Associate the given web ACL, replacing any current one
    Associate(String),
    /// Remove the current association
    Disassociate,
}

/// Decide the association change from the current summary and desired web ACL
pub fn plan_waf(current: Option<&WebAclSummary>, desired: Option<&str>) -> WafAction {
    match (current, desired) {
        (None, None) => WafAction::NoOp,
        (Some(_), None) => WafAction::Disassociate,
        (None, Some(id)) => WafAction::Associate(id.to_string()),
        (Some(summary), Some(id)) if summary.web_acl_id == id => WafAction::NoOp,
        (Some(_), Some(id)) => WafAction::Associate(id.to_string()),
    }
}

/// Converge the web ACL association of `lb_arn`.
///
/// A desired web ACL must exist before any change is made.
pub async fn reconcile_waf(
    cloud: &dyn CloudApiTrait,
    ctx: &CallContext,
    lb_arn: &str,
    desired: Option<&str>,
) -> Result<(), ControllerError> {
    let waf_error = move |action: &'static str| {
        move |source| ControllerError::WafReconcile {
            arn: lb_arn.to_string(),
            action,
            source,
        }
    };

    let current = cloud
        .get_web_acl_summary(ctx, lb_arn)
        .await
        .map_err(waf_error("get"))?;

    if let Some(web_acl_id) = desired {
        let exists = cloud
            .web_acl_exists(ctx, web_acl_id)
            .await
            .map_err(waf_error("check"))?;
        if !exists {
            return Err(ControllerError::InvalidReference {
                arn: lb_arn.to_string(),
                web_acl_id: web_acl_id.to_string(),
            });
        }
    }

    match plan_waf(current.as_ref(), desired) {
        WafAction::NoOp => {
            debug!("Web acl of {} already up-to-date", lb_arn);
        }
        WafAction::Associate(web_acl_id) => {
            info!("Associating web acl {} with {}", web_acl_id, lb_arn);
            cloud
                .associate_waf(ctx, lb_arn, &web_acl_id)
                .await
                .map_err(waf_error("associate"))?;
        }
        WafAction::Disassociate => {
            info!("Disassociating web acl from {}", lb_arn);
            cloud
                .disassociate_waf(ctx, lb_arn)
                .await
                .map_err(waf_error("disassociate"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> WebAclSummary {
        WebAclSummary {
            web_acl_id: id.to_string(),
            name: None,
        }
    }

    #[test]
    fn test_plan_waf_table() {
        let current = summary("acl-1");
        assert_eq!(plan_waf(None, None), WafAction::NoOp);
        assert_eq!(plan_waf(Some(&current), None), WafAction::Disassociate);
        assert_eq!(plan_waf(None, Some("acl-1")), WafAction::Associate("acl-1".to_string()));
        assert_eq!(plan_waf(Some(&current), Some("acl-1")), WafAction::NoOp);
        assert_eq!(plan_waf(Some(&current), Some("acl-2")), WafAction::Associate("acl-2".to_string()));
    }
}
