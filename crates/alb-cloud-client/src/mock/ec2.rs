//! EC2 inventory lookups for MockCloudClient

use super::{lock, MockCloudClient};
use crate::error::CloudError;
use crate::models::{Scheme, SecurityGroup};

/// Names without a matching group are left out, like a filtered describe call.
pub fn security_groups_by_name(client: &MockCloudClient, names: &[String]) -> Vec<SecurityGroup> {
    lock(&client.security_groups)
        .iter()
        .filter(|sg| names.contains(&sg.group_name))
        .cloned()
        .collect()
}

pub fn subnets_by_name(client: &MockCloudClient, names: &[String]) -> Vec<String> {
    let named = lock(&client.named_subnets);
    names.iter().filter_map(|name| named.get(name).cloned()).collect()
}

pub fn cluster_subnets(client: &MockCloudClient, scheme: Scheme) -> Result<Vec<String>, CloudError> {
    lock(&client.cluster_subnets)
        .get(&scheme)
        .cloned()
        .filter(|subnets| !subnets.is_empty())
        .ok_or_else(|| CloudError::NotFound(format!("no cluster subnets tagged for {} load balancers", scheme)))
}
