//! Controller-specific error types.
//!
//! Every failure is terminal for the current reconcile cycle. The caller's
//! control loop re-queues the ingress and retries from scratch; each error
//! carries the resource name or ARN and the attempted operation.

use alb_cloud_client::CloudError;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Identifier families resolved from mixed ID/name lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Security groups, identified by `sg-`
    SecurityGroup,
    /// Subnets, identified by `subnet-`
    Subnet,
}

impl ReferenceKind {
    /// Prefix that marks an item as already being an identifier
    pub fn id_prefix(self) -> &'static str {
        match self {
            ReferenceKind::SecurityGroup => "sg-",
            ReferenceKind::Subnet => "subnet-",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::SecurityGroup => f.write_str("security groups"),
            ReferenceKind::Subnet => f.write_str("subnets"),
        }
    }
}

/// Steps of dependent-resource convergence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentStep {
    /// Load balancer attributes
    Attributes,
    /// Web ACL association
    Waf,
    /// Target group set reconcile
    TargetGroups,
    /// Listener set reconcile
    Listeners,
    /// Removal of target groups no longer in use
    TargetGroupGc,
    /// Security group resolution and association
    SecurityGroups,
}

impl fmt::Display for DependentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DependentStep::Attributes => "attributes",
            DependentStep::Waf => "web acl",
            DependentStep::TargetGroups => "target groups",
            DependentStep::Listeners => "listeners",
            DependentStep::TargetGroupGc => "target group gc",
            DependentStep::SecurityGroups => "security group associations",
        })
    }
}

/// Steps of teardown, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    /// Security group associations
    SecurityGroups,
    /// Listeners of the load balancer
    Listeners,
    /// Target groups of the ingress
    TargetGroups,
    /// The load balancer itself
    LoadBalancer,
}

impl fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TeardownStep::SecurityGroups => "security group associations",
            TeardownStep::Listeners => "listeners",
            TeardownStep::TargetGroups => "target groups",
            TeardownStep::LoadBalancer => "load balancer",
        })
    }
}

/// Errors that can occur in the load balancer controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The routing intent itself is unusable (e.g. missing name)
    #[error("Invalid ingress: {0}")]
    InvalidIngress(String),

    /// The cluster-state store could not provide annotations
    #[error("Failed to load annotations of ingress {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The desired configuration could not be built
    #[error("Failed to build LoadBalancer configuration for ingress {key}: {source}")]
    ConfigBuild {
        key: String,
        #[source]
        source: Box<ControllerError>,
    },

    /// Controller policy rejected the desired configuration
    #[error("Ingress {key} violates controller policy: {reason}")]
    PolicyViolation { key: String, reason: String },

    /// Looking up the existing load balancer failed
    #[error("Failed to find existing LoadBalancer {name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: CloudError,
    },

    /// Creating the load balancer (or removing the old one for recreation) failed
    #[error("Failed to {action} LoadBalancer {name}: {source}")]
    Provision {
        name: String,
        action: &'static str,
        #[source]
        source: CloudError,
    },

    /// The old load balancer was deleted for recreation but the new one could not be created.
    /// The ingress has no load balancer until the next cycle creates it.
    #[error("LoadBalancer {name} was deleted for recreation (previous ARN {previous_arn}) but creation failed: {source}")]
    Recreation {
        name: String,
        previous_arn: String,
        #[source]
        source: CloudError,
    },

    /// An in-place attribute patch failed
    #[error("Failed to modify {attribute} of {arn}: {source}")]
    AttributeUpdate {
        arn: String,
        attribute: &'static str,
        #[source]
        source: CloudError,
    },

    /// Reading or changing the web ACL association failed
    #[error("Failed to {action} web acl on LoadBalancer {arn}: {source}")]
    WafReconcile {
        arn: String,
        action: &'static str,
        #[source]
        source: CloudError,
    },

    /// The referenced web ACL does not exist
    #[error("Web acl {web_acl_id} referenced by LoadBalancer {arn} does not exist")]
    InvalidReference { arn: String, web_acl_id: String },

    /// The inventory lookup used to resolve names failed
    #[error("Failed to look up {kind}: {source}")]
    ReferenceLookup {
        kind: ReferenceKind,
        #[source]
        source: CloudError,
    },

    /// Some names could not be resolved to identifiers
    #[error("Not all {kind} were resolvable, ({} != {})", .requested.join(","), .resolved.join(","))]
    UnresolvedReference {
        kind: ReferenceKind,
        requested: Vec<String>,
        resolved: Vec<String>,
    },

    /// A dependent-resource step failed
    #[error("Failed to reconcile {step}: {source}")]
    DependentResource {
        step: DependentStep,
        #[source]
        source: anyhow::Error,
    },

    /// A teardown step failed
    #[error("Failed to delete {step}: {source}")]
    Teardown {
        step: TeardownStep,
        #[source]
        source: anyhow::Error,
    },
}

impl ControllerError {
    /// True for web ACL failures, including a missing referenced web ACL.
    pub fn is_waf_error(&self) -> bool {
        match self {
            ControllerError::WafReconcile { .. } | ControllerError::InvalidReference { .. } => true,
            ControllerError::DependentResource { source, .. } => source
                .downcast_ref::<ControllerError>()
                .is_some_and(ControllerError::is_waf_error),
            _ => false,
        }
    }

    /// True when the cycle was aborted by cancellation or a deadline anywhere in the chain.
    pub fn is_cancellation(&self) -> bool {
        let mut current: Option<&(dyn StdError + 'static)> = Some(self);
        while let Some(err) = current {
            if err.downcast_ref::<CloudError>().is_some_and(CloudError::is_cancellation) {
                return true;
            }
            current = err.source();
        }
        false
    }
}
