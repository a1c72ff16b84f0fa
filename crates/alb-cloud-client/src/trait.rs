//! CloudApiTrait for mocking
//!
//! This trait abstracts the cloud load-balancing service to enable mocking in unit tests.
//! A production client implements this trait, and tests use [`crate::MockCloudClient`].

use std::collections::BTreeMap;

use crate::context::CallContext;
use crate::error::CloudError;
use crate::models::*;

/// Trait for cloud API operations used by the load balancer controller
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
/// Every method takes the cycle's [`CallContext`]; implementations must abort
/// the in-flight call when it is cancelled.
#[async_trait::async_trait]
pub trait CloudApiTrait: Send + Sync {
    // Load balancer operations

    /// Looks up a load balancer by its stable name. `None` if it does not exist.
    async fn get_load_balancer_by_name(&self, ctx: &CallContext, name: &str) -> Result<Option<LoadBalancer>, CloudError>;
    async fn create_load_balancer(&self, ctx: &CallContext, request: &CreateLoadBalancerRequest) -> Result<LoadBalancer, CloudError>;
    /// Deletes a load balancer. Deleting an already-absent load balancer succeeds.
    async fn delete_load_balancer_by_arn(&self, ctx: &CallContext, arn: &str) -> Result<(), CloudError>;
    async fn set_ip_address_type(&self, ctx: &CallContext, arn: &str, ip_address_type: IpAddressType) -> Result<(), CloudError>;
    async fn set_subnets(&self, ctx: &CallContext, arn: &str, subnets: &[String]) -> Result<(), CloudError>;
    async fn describe_load_balancer_attributes(&self, ctx: &CallContext, arn: &str) -> Result<BTreeMap<String, String>, CloudError>;
    async fn modify_load_balancer_attributes(&self, ctx: &CallContext, arn: &str, attributes: &BTreeMap<String, String>) -> Result<(), CloudError>;

    // WAF operations
    async fn get_web_acl_summary(&self, ctx: &CallContext, arn: &str) -> Result<Option<WebAclSummary>, CloudError>;
    async fn web_acl_exists(&self, ctx: &CallContext, web_acl_id: &str) -> Result<bool, CloudError>;
    async fn associate_waf(&self, ctx: &CallContext, arn: &str, web_acl_id: &str) -> Result<(), CloudError>;
    async fn disassociate_waf(&self, ctx: &CallContext, arn: &str) -> Result<(), CloudError>;

    // EC2 inventory operations

    /// Resolves security group names. Names with no match are simply absent from the result.
    async fn get_security_groups_by_name(&self, ctx: &CallContext, names: &[String]) -> Result<Vec<SecurityGroup>, CloudError>;
    /// Resolves subnet names (Name tag) to subnet IDs.
    async fn get_subnets_by_name(&self, ctx: &CallContext, names: &[String]) -> Result<Vec<String>, CloudError>;
    /// Cluster-tagged default subnets usable for the given scheme.
    async fn cluster_subnets(&self, ctx: &CallContext, scheme: Scheme) -> Result<Vec<String>, CloudError>;
}
