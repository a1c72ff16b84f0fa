//! Parsed ingress annotations
//!
//! Annotation parsing and validation happen upstream; these are the already
//! typed values the load balancer controller consumes.

use alb_cloud_client::{IpAddressType, Scheme};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotations of an ingress, grouped by the resource they configure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IngressAnnotations {
    #[serde(default)]
    pub load_balancer: LoadBalancerAnnotations,
    #[serde(default)]
    pub tags: TagAnnotations,
}

/// Load balancer related annotations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerAnnotations {
    /// Requested scheme (defaults to internal)
    #[serde(default)]
    pub scheme: Scheme,

    /// IP address type override; `None` means ipv4
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address_type: Option<IpAddressType>,

    /// Subnet IDs or Name tags; empty means cluster default subnets
    #[serde(default)]
    pub subnets: Vec<String>,

    /// Security group IDs or names
    #[serde(default)]
    pub security_groups: Vec<String>,

    /// Listener ports
    #[serde(default)]
    pub ports: Vec<ListenPort>,

    /// CIDR ranges allowed to reach the listeners
    #[serde(default)]
    pub inbound_cidrs: Vec<String>,

    /// Web ACL to associate; `None` means no association
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_acl_id: Option<String>,

    /// Load balancer attributes (e.g. `idle_timeout.timeout_seconds`)
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl LoadBalancerAnnotations {
    /// Listener port numbers, in annotation order
    pub fn port_numbers(&self) -> Vec<u16> {
        self.ports.iter().map(|p| p.port).collect()
    }
}

/// Listener protocol
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListenProtocol {
    #[default]
    Http,
    Https,
}

/// A listener port requested by the ingress
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ListenPort {
    #[serde(default)]
    pub protocol: ListenProtocol,
    pub port: u16,
}

/// User supplied tag overrides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TagAnnotations {
    /// Tags applied to the load balancer; win over generated tags
    #[serde(default)]
    pub load_balancer: BTreeMap<String, String>,
}
