//! Load balancer, WAF and EC2 models
//!
//! These models mirror the subset of the ELBv2 / WAF / EC2 shapes that the
//! controller core reads or writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CloudError;

/// Load balancer scheme. Immutable once the load balancer exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// Reachable only from inside the VPC
    #[default]
    Internal,
    /// Reachable from the internet
    InternetFacing,
}

impl Scheme {
    /// Wire value (`internal` / `internet-facing`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Internal => "internal",
            Scheme::InternetFacing => "internet-facing",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(Scheme::Internal),
            "internet-facing" => Ok(Scheme::InternetFacing),
            other => Err(CloudError::InvalidRequest(format!("unknown scheme '{}'", other))),
        }
    }
}

/// IP address type of a load balancer. Mutable in place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum IpAddressType {
    /// IPv4 only
    #[default]
    Ipv4,
    /// IPv4 and IPv6
    Dualstack,
}

impl IpAddressType {
    /// Wire value (`ipv4` / `dualstack`)
    pub fn as_str(&self) -> &'static str {
        match self {
            IpAddressType::Ipv4 => "ipv4",
            IpAddressType::Dualstack => "dualstack",
        }
    }
}

impl fmt::Display for IpAddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpAddressType {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(IpAddressType::Ipv4),
            "dualstack" => Ok(IpAddressType::Dualstack),
            other => Err(CloudError::InvalidRequest(format!("unknown ip address type '{}'", other))),
        }
    }
}

/// Load balancer type. Only application load balancers are managed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadBalancerType {
    /// Layer 7 application load balancer
    #[default]
    Application,
}

impl LoadBalancerType {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadBalancerType::Application => "application",
        }
    }
}

/// Availability zone attachment of a load balancer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityZone {
    pub zone_name: String,
    pub subnet_id: String,
}

/// Load balancer as described by the service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    /// Opaque ARN handle
    pub arn: String,
    pub name: String,
    pub dns_name: String,
    #[serde(rename = "type")]
    pub lb_type: LoadBalancerType,
    pub scheme: Scheme,
    pub ip_address_type: IpAddressType,
    pub availability_zones: Vec<AvailabilityZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
}

impl LoadBalancer {
    /// Subnet IDs the load balancer is attached to, in service order.
    pub fn subnets(&self) -> Vec<String> {
        self.availability_zones
            .iter()
            .map(|az| az.subnet_id.clone())
            .collect()
    }
}

/// Request body for creating a load balancer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoadBalancerRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub lb_type: LoadBalancerType,
    pub scheme: Scheme,
    pub ip_address_type: IpAddressType,
    pub subnets: Vec<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Firewall policy currently associated with a load balancer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebAclSummary {
    pub web_acl_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// EC2 security group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    pub group_id: String,
    pub group_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_wire_values() {
        assert_eq!(Scheme::InternetFacing.as_str(), "internet-facing");
        assert_eq!("internal".parse::<Scheme>().ok(), Some(Scheme::Internal));
        assert!("public".parse::<Scheme>().is_err());
        assert_eq!(
            serde_json::to_string(&Scheme::InternetFacing).ok().as_deref(),
            Some("\"internet-facing\"")
        );
    }

    #[test]
    fn test_ip_address_type_parse() {
        assert_eq!("dualstack".parse::<IpAddressType>().ok(), Some(IpAddressType::Dualstack));
        assert!("ipv6".parse::<IpAddressType>().is_err());
    }

    #[test]
    fn test_subnets_follow_availability_zones() {
        let lb = LoadBalancer {
            arn: "arn:lb/app/web/1".to_string(),
            name: "web".to_string(),
            dns_name: "web.elb.example.com".to_string(),
            lb_type: LoadBalancerType::Application,
            scheme: Scheme::Internal,
            ip_address_type: IpAddressType::Ipv4,
            availability_zones: vec![
                AvailabilityZone { zone_name: "us-east-1b".to_string(), subnet_id: "subnet-b".to_string() },
                AvailabilityZone { zone_name: "us-east-1a".to_string(), subnet_id: "subnet-a".to_string() },
            ],
            created_time: None,
        };
        assert_eq!(lb.subnets(), vec!["subnet-b".to_string(), "subnet-a".to_string()]);
    }
}
