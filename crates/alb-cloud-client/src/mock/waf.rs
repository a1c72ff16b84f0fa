//! Web ACL operations for MockCloudClient

use super::{lock, MockCloudClient};
use crate::error::CloudError;
use crate::models::WebAclSummary;

pub fn summary(client: &MockCloudClient, arn: &str) -> Option<WebAclSummary> {
    lock(&client.waf_associations)
        .get(arn)
        .map(|id| WebAclSummary { web_acl_id: id.clone(), name: None })
}

pub fn exists(client: &MockCloudClient, web_acl_id: &str) -> bool {
    lock(&client.web_acls).contains(web_acl_id)
}

pub fn associate(client: &MockCloudClient, arn: &str, web_acl_id: &str) -> Result<(), CloudError> {
    if !exists(client, web_acl_id) {
        return Err(CloudError::NotFound(format!("web acl {} not found", web_acl_id)));
    }
    lock(&client.waf_associations).insert(arn.to_string(), web_acl_id.to_string());
    Ok(())
}

pub fn disassociate(client: &MockCloudClient, arn: &str) {
    lock(&client.waf_associations).remove(arn);
}
