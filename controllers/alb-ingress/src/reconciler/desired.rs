//! Desired load balancer configuration: building and policy validation

use super::resolve::resolve_subnets;
use crate::error::ControllerError;
use crate::naming::NameTagGenerator;
use alb_cloud_client::{CallContext, CloudApiTrait, CreateLoadBalancerRequest, IpAddressType, LoadBalancerType, Scheme};
use ingress_types::{ControllerConfig, IngressAnnotations, IngressKey};
use std::collections::BTreeMap;

/// Desired state of the load balancer, computed fresh every cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredLoadBalancerConfig {
    /// Stable name derived from the ingress namespace and name
    pub name: String,
    /// Policy tags overlaid with annotated tags
    pub tags: BTreeMap<String, String>,
    /// Always application
    pub lb_type: LoadBalancerType,
    /// Immutable once created
    pub scheme: Scheme,
    pub ip_address_type: IpAddressType,
    /// Sorted, deduplicated subnet IDs
    pub subnets: Vec<String>,
}

impl DesiredLoadBalancerConfig {
    /// Create call payload for this configuration
    pub fn to_create_request(&self) -> CreateLoadBalancerRequest {
        CreateLoadBalancerRequest {
            name: self.name.clone(),
            lb_type: self.lb_type,
            scheme: self.scheme,
            ip_address_type: self.ip_address_type,
            subnets: self.subnets.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Policy tags overlaid with the annotated tags. Annotated values win on collision.
pub fn merge_tags(
    generated: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    generated
        .iter()
        .chain(overrides.iter())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Build the desired configuration for an ingress.
///
/// Fails with `ConfigBuild` when subnet resolution fails.
pub async fn build_desired_config(
    cloud: &dyn CloudApiTrait,
    name_tag_gen: &dyn NameTagGenerator,
    ctx: &CallContext,
    key: &IngressKey,
    annotations: &IngressAnnotations,
) -> Result<DesiredLoadBalancerConfig, ControllerError> {
    let lb = &annotations.load_balancer;

    let mut subnets = resolve_subnets(cloud, ctx, &lb.subnets, lb.scheme)
        .await
        .map_err(|source| ControllerError::ConfigBuild {
            key: key.to_string(),
            source: Box::new(source),
        })?;
    subnets.dedup();

    let name = name_tag_gen.name_lb(&key.namespace, &key.name);
    let tags = merge_tags(&name_tag_gen.tag_lb(&key.namespace, &key.name), &annotations.tags.load_balancer);

    Ok(DesiredLoadBalancerConfig {
        name,
        tags,
        lb_type: LoadBalancerType::Application,
        scheme: lb.scheme,
        ip_address_type: lb.ip_address_type.unwrap_or_default(),
        subnets,
    })
}

type PolicyCheck = fn(&ControllerConfig, &IngressKey, &DesiredLoadBalancerConfig) -> Result<(), ControllerError>;

/// Independent policy checks. Each fails fast with its own error.
const POLICY_CHECKS: &[PolicyCheck] = &[check_internet_facing_allowed];

/// Validate the desired configuration against controller policy
pub fn validate_desired_config(
    config: &ControllerConfig,
    key: &IngressKey,
    desired: &DesiredLoadBalancerConfig,
) -> Result<(), ControllerError> {
    POLICY_CHECKS.iter().try_for_each(|check| check(config, key, desired))
}

fn check_internet_facing_allowed(
    config: &ControllerConfig,
    key: &IngressKey,
    desired: &DesiredLoadBalancerConfig,
) -> Result<(), ControllerError> {
    if config.restrict_scheme && desired.scheme == Scheme::InternetFacing && !config.is_internet_facing_allowed(key) {
        return Err(ControllerError::PolicyViolation {
            key: key.to_string(),
            reason: format!("ingress {} is not in internetFacing whitelist", key),
        });
    }
    Ok(())
}
