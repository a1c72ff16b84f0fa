//! Sub-reconcilers the load balancer controller drives.
//!
//! Each one is a narrow capability trait so that it can be substituted and
//! tested on its own:
//! - `target_group`: target group set for an ingress
//! - `listener`: listeners of a load balancer
//! - `security_group`: security group associations of a load balancer
//! - `attributes`: load balancer attributes (default implementation included)

pub mod attributes;
pub mod listener;
pub mod security_group;
pub mod target_group;

pub use attributes::{AttributesReconciler, DefaultAttributesReconciler};
pub use listener::ListenerReconciler;
pub use security_group::{SecurityGroupAssociation, SecurityGroupAssociationReconciler};
pub use target_group::{TargetGroup, TargetGroupReconciler, TargetGroupSet};
