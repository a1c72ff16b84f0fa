//! ALB Ingress Controller
//!
//! Convergence engine that drives an application load balancer toward the
//! state declared by an ingress and its annotations:
//! - Builds and validates the desired load balancer configuration
//! - Creates, recreates (on scheme change) or patches the load balancer
//! - Converges attributes, web ACL, target groups, listeners and security groups
//! - Tears everything down in reverse dependency order on delete
//!
//! Watching ingresses, queueing and retry policy belong to the caller.

pub mod error;
pub mod naming;
pub mod reconciler;
pub mod store;
pub mod subcontrollers;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

pub use error::{ControllerError, DependentStep, ReferenceKind, TeardownStep};
pub use naming::{DefaultNameTagGenerator, NameTagGenerator};
pub use reconciler::{LoadBalancerController, LoadBalancerStatus};
pub use store::{ClusterStore, InMemoryStore};
