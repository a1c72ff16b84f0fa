//! Load balancer operations for MockCloudClient

use super::{helpers, lock, MockCloudClient};
use crate::error::CloudError;
use crate::models::*;
use std::collections::BTreeMap;

pub fn get_by_name(client: &MockCloudClient, name: &str) -> Option<LoadBalancer> {
    lock(&client.load_balancers)
        .values()
        .find(|lb| lb.name == name)
        .cloned()
}

pub fn create(client: &MockCloudClient, request: &CreateLoadBalancerRequest) -> Result<LoadBalancer, CloudError> {
    if request.subnets.is_empty() {
        return Err(CloudError::InvalidRequest("at least one subnet must be specified".to_string()));
    }
    let mut load_balancers = lock(&client.load_balancers);
    if load_balancers.values().any(|lb| lb.name == request.name) {
        return Err(CloudError::Api {
            operation: "CreateLoadBalancer".to_string(),
            message: format!("a load balancer with the name '{}' already exists", request.name),
        });
    }
    let lb = helpers::build_load_balancer(
        &client.region,
        &request.name,
        request.scheme,
        request.ip_address_type,
        &request.subnets,
    );
    load_balancers.insert(lb.arn.clone(), lb.clone());
    Ok(lb)
}

/// Deleting an unknown ARN is a no-op, matching the service.
pub fn delete(client: &MockCloudClient, arn: &str) {
    lock(&client.load_balancers).remove(arn);
    lock(&client.attributes).remove(arn);
    lock(&client.waf_associations).remove(arn);
}

pub fn set_ip_address_type(client: &MockCloudClient, arn: &str, ip_address_type: IpAddressType) -> Result<(), CloudError> {
    let mut load_balancers = lock(&client.load_balancers);
    let lb = load_balancers
        .get_mut(arn)
        .ok_or_else(|| CloudError::NotFound(format!("load balancer {} not found", arn)))?;
    lb.ip_address_type = ip_address_type;
    Ok(())
}

pub fn set_subnets(client: &MockCloudClient, arn: &str, subnets: &[String]) -> Result<(), CloudError> {
    let mut load_balancers = lock(&client.load_balancers);
    let lb = load_balancers
        .get_mut(arn)
        .ok_or_else(|| CloudError::NotFound(format!("load balancer {} not found", arn)))?;
    lb.availability_zones = helpers::availability_zones(&client.region, subnets);
    Ok(())
}

pub fn describe_attributes(client: &MockCloudClient, arn: &str) -> Result<BTreeMap<String, String>, CloudError> {
    if !lock(&client.load_balancers).contains_key(arn) {
        return Err(CloudError::NotFound(format!("load balancer {} not found", arn)));
    }
    Ok(lock(&client.attributes).get(arn).cloned().unwrap_or_default())
}

pub fn modify_attributes(client: &MockCloudClient, arn: &str, attributes: &BTreeMap<String, String>) -> Result<(), CloudError> {
    if !lock(&client.load_balancers).contains_key(arn) {
        return Err(CloudError::NotFound(format!("load balancer {} not found", arn)));
    }
    lock(&client.attributes)
        .entry(arn.to_string())
        .or_default()
        .extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(())
}
