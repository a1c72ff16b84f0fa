//! Cloud API contract for the ALB ingress controller
//!
//! Abstracts the load balancer (ELBv2), firewall (WAF) and EC2 inventory
//! operations the controller core depends on. Every call takes a
//! [`CallContext`] so that cancellation and deadlines abort in-flight work.
//!
//! # Example
//!
//! ```no_run
//! use alb_cloud_client::{CallContext, CloudApiTrait, Scheme};
//!
//! # async fn example(cloud: &dyn CloudApiTrait) -> Result<(), alb_cloud_client::CloudError> {
//! let ctx = CallContext::new().with_timeout(std::time::Duration::from_secs(30));
//!
//! // Look up the load balancer owned by an ingress
//! if let Some(lb) = cloud.get_load_balancer_by_name(&ctx, "k8s-default-web-1a2b").await? {
//!     println!("{} -> {}", lb.name, lb.dns_name);
//! }
//!
//! // Default subnets for an internet-facing load balancer
//! let subnets = cloud.cluster_subnets(&ctx, Scheme::InternetFacing).await?;
//! # let _ = subnets;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **test-util**: enables [`MockCloudClient`], an in-memory implementation
//!   that records calls and supports failure injection

pub mod context;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod cloud_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use cloud_trait::CloudApiTrait;
pub use context::CallContext;
pub use error::CloudError;
pub use models::*;
#[cfg(any(test, feature = "test-util"))]
pub use mock::{CloudCall, MockCloudClient};
