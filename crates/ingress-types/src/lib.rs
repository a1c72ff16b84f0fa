//! ALB ingress types
//!
//! Shared types consumed by the load balancer controller: the identity of a
//! routing intent, the annotations parsed from it, and the controller-wide
//! configuration.

pub mod annotations;
pub mod config;
pub mod key;

pub use annotations::*;
pub use config::*;
pub use key::*;
