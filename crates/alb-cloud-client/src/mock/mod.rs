//! Mock cloud client for unit testing
//!
//! This module provides an in-memory implementation of [`CloudApiTrait`] that can be
//! used in unit tests without talking to a real cloud account.
//!
//! The mock is organized into service-specific modules:
//! - `elbv2.rs` - load balancer lifecycle and attribute operations
//! - `waf.rs` - web ACL association operations
//! - `ec2.rs` - security group and subnet inventory lookups
//! - `helpers.rs` - ARN / DNS name builders
//!
//! Every call is recorded in order (see [`MockCloudClient::calls`]) so tests can
//! assert exactly which mutating operations a reconcile cycle issued.

mod ec2;
mod elbv2;
mod helpers;
mod waf;

use crate::context::CallContext;
use crate::error::CloudError;
use crate::models::*;
use crate::cloud_trait::CloudApiTrait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A single recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudCall {
    GetLoadBalancerByName(String),
    CreateLoadBalancer(CreateLoadBalancerRequest),
    DeleteLoadBalancer(String),
    SetIpAddressType { arn: String, ip_address_type: IpAddressType },
    SetSubnets { arn: String, subnets: Vec<String> },
    DescribeLoadBalancerAttributes(String),
    ModifyLoadBalancerAttributes { arn: String, attributes: BTreeMap<String, String> },
    GetWebAclSummary(String),
    WebAclExists(String),
    AssociateWaf { arn: String, web_acl_id: String },
    DisassociateWaf(String),
    GetSecurityGroupsByName(Vec<String>),
    GetSubnetsByName(Vec<String>),
    ClusterSubnets(Scheme),
}

impl CloudCall {
    /// Operation name, used for failure injection and error messages.
    pub fn operation(&self) -> &'static str {
        match self {
            CloudCall::GetLoadBalancerByName(_) => "DescribeLoadBalancers",
            CloudCall::CreateLoadBalancer(_) => "CreateLoadBalancer",
            CloudCall::DeleteLoadBalancer(_) => "DeleteLoadBalancer",
            CloudCall::SetIpAddressType { .. } => "SetIpAddressType",
            CloudCall::SetSubnets { .. } => "SetSubnets",
            CloudCall::DescribeLoadBalancerAttributes(_) => "DescribeLoadBalancerAttributes",
            CloudCall::ModifyLoadBalancerAttributes { .. } => "ModifyLoadBalancerAttributes",
            CloudCall::GetWebAclSummary(_) => "GetWebACLForResource",
            CloudCall::WebAclExists(_) => "GetWebACL",
            CloudCall::AssociateWaf { .. } => "AssociateWebACL",
            CloudCall::DisassociateWaf(_) => "DisassociateWebACL",
            CloudCall::GetSecurityGroupsByName(_) => "DescribeSecurityGroups",
            CloudCall::GetSubnetsByName(_) => "DescribeSubnets",
            CloudCall::ClusterSubnets(_) => "DescribeClusterSubnets",
        }
    }

    /// Returns true for calls that change cloud state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            CloudCall::CreateLoadBalancer(_)
                | CloudCall::DeleteLoadBalancer(_)
                | CloudCall::SetIpAddressType { .. }
                | CloudCall::SetSubnets { .. }
                | CloudCall::ModifyLoadBalancerAttributes { .. }
                | CloudCall::AssociateWaf { .. }
                | CloudCall::DisassociateWaf(_)
        )
    }
}

/// Mock cloud client for testing
///
/// This mock stores resources in memory and can be configured to fail
/// specific operations for testing error paths.
#[derive(Debug, Clone)]
pub struct MockCloudClient {
    pub(crate) region: String,
    // In-memory storage for resources
    pub(crate) load_balancers: Arc<Mutex<HashMap<String, LoadBalancer>>>,
    pub(crate) attributes: Arc<Mutex<HashMap<String, BTreeMap<String, String>>>>,
    pub(crate) web_acls: Arc<Mutex<HashSet<String>>>,
    pub(crate) waf_associations: Arc<Mutex<HashMap<String, String>>>,
    pub(crate) security_groups: Arc<Mutex<Vec<SecurityGroup>>>,
    pub(crate) named_subnets: Arc<Mutex<HashMap<String, String>>>,
    pub(crate) cluster_subnets: Arc<Mutex<HashMap<Scheme, Vec<String>>>>,
    // Call journal and one-shot failures keyed by operation name
    calls: Arc<Mutex<Vec<CloudCall>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockCloudClient {
    /// Create a new mock client for a region
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            load_balancers: Arc::new(Mutex::new(HashMap::new())),
            attributes: Arc::new(Mutex::new(HashMap::new())),
            web_acls: Arc::new(Mutex::new(HashSet::new())),
            waf_associations: Arc::new(Mutex::new(HashMap::new())),
            security_groups: Arc::new(Mutex::new(Vec::new())),
            named_subnets: Arc::new(Mutex::new(HashMap::new())),
            cluster_subnets: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add an existing load balancer built from the given attributes (for test setup)
    pub fn seed_load_balancer(
        &self,
        name: &str,
        scheme: Scheme,
        ip_address_type: IpAddressType,
        subnets: &[&str],
    ) -> LoadBalancer {
        let subnets: Vec<String> = subnets.iter().map(|s| (*s).to_string()).collect();
        let lb = helpers::build_load_balancer(&self.region, name, scheme, ip_address_type, &subnets);
        self.add_load_balancer(lb.clone());
        lb
    }

    /// Add a load balancer to the mock store (for test setup)
    pub fn add_load_balancer(&self, lb: LoadBalancer) {
        lock(&self.load_balancers).insert(lb.arn.clone(), lb);
    }

    /// Current load balancer with the given name, if any
    pub fn load_balancer(&self, name: &str) -> Option<LoadBalancer> {
        lock(&self.load_balancers).values().find(|lb| lb.name == name).cloned()
    }

    /// Number of load balancers in the store
    pub fn load_balancer_count(&self) -> usize {
        lock(&self.load_balancers).len()
    }

    /// Set the attribute map of a load balancer (for test setup)
    pub fn set_attributes(&self, arn: &str, attributes: BTreeMap<String, String>) {
        lock(&self.attributes).insert(arn.to_string(), attributes);
    }

    /// Current attribute map of a load balancer
    pub fn attributes(&self, arn: &str) -> BTreeMap<String, String> {
        lock(&self.attributes).get(arn).cloned().unwrap_or_default()
    }

    /// Register a web ACL so that existence checks succeed (for test setup)
    pub fn add_web_acl(&self, web_acl_id: &str) {
        lock(&self.web_acls).insert(web_acl_id.to_string());
    }

    /// Associate a web ACL with a load balancer (for test setup)
    pub fn set_waf_association(&self, arn: &str, web_acl_id: &str) {
        self.add_web_acl(web_acl_id);
        lock(&self.waf_associations).insert(arn.to_string(), web_acl_id.to_string());
    }

    /// Web ACL currently associated with a load balancer
    pub fn waf_association(&self, arn: &str) -> Option<String> {
        lock(&self.waf_associations).get(arn).cloned()
    }

    /// Add a security group to the inventory (for test setup)
    pub fn add_security_group(&self, group_id: &str, group_name: &str) {
        lock(&self.security_groups).push(SecurityGroup {
            group_id: group_id.to_string(),
            group_name: group_name.to_string(),
        });
    }

    /// Add a named subnet to the inventory (for test setup)
    pub fn add_named_subnet(&self, name: &str, subnet_id: &str) {
        lock(&self.named_subnets).insert(name.to_string(), subnet_id.to_string());
    }

    /// Set the cluster default subnets for a scheme (for test setup)
    pub fn set_cluster_subnets(&self, scheme: Scheme, subnets: &[&str]) {
        lock(&self.cluster_subnets).insert(scheme, subnets.iter().map(|s| (*s).to_string()).collect());
    }

    /// Make the next call of `operation` fail with an API error
    pub fn fail_next(&self, operation: &str, message: &str) {
        lock(&self.failures).insert(operation.to_string(), message.to_string());
    }

    /// All calls recorded so far, in order
    pub fn calls(&self) -> Vec<CloudCall> {
        lock(&self.calls).clone()
    }

    /// Recorded calls that change cloud state, in order
    pub fn mutating_calls(&self) -> Vec<CloudCall> {
        self.calls().into_iter().filter(CloudCall::is_mutating).collect()
    }

    /// Forget recorded calls (the store is left untouched)
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Records the call, applies any injected failure, then runs `op` under the context.
    async fn invoke<T, F>(&self, ctx: &CallContext, call: CloudCall, op: F) -> Result<T, CloudError>
    where
        T: Send,
        F: FnOnce(&Self) -> Result<T, CloudError> + Send,
    {
        let operation = call.operation();
        ctx.run(operation, async move {
            lock(&self.calls).push(call);
            if let Some(message) = lock(&self.failures).remove(operation) {
                debug!("Mock: injected failure for {}: {}", operation, message);
                return Err(CloudError::Api { operation: operation.to_string(), message });
            }
            op(self)
        })
        .await
    }
}

#[async_trait::async_trait]
impl CloudApiTrait for MockCloudClient {
    // Load balancer operations - delegated to elbv2 module
    async fn get_load_balancer_by_name(&self, ctx: &CallContext, name: &str) -> Result<Option<LoadBalancer>, CloudError> {
        self.invoke(ctx, CloudCall::GetLoadBalancerByName(name.to_string()), |c| Ok(elbv2::get_by_name(c, name)))
            .await
    }

    async fn create_load_balancer(&self, ctx: &CallContext, request: &CreateLoadBalancerRequest) -> Result<LoadBalancer, CloudError> {
        self.invoke(ctx, CloudCall::CreateLoadBalancer(request.clone()), |c| elbv2::create(c, request))
            .await
    }

    async fn delete_load_balancer_by_arn(&self, ctx: &CallContext, arn: &str) -> Result<(), CloudError> {
        self.invoke(ctx, CloudCall::DeleteLoadBalancer(arn.to_string()), |c| {
            elbv2::delete(c, arn);
            Ok(())
        })
        .await
    }

    async fn set_ip_address_type(&self, ctx: &CallContext, arn: &str, ip_address_type: IpAddressType) -> Result<(), CloudError> {
        let call = CloudCall::SetIpAddressType { arn: arn.to_string(), ip_address_type };
        self.invoke(ctx, call, |c| elbv2::set_ip_address_type(c, arn, ip_address_type)).await
    }

    async fn set_subnets(&self, ctx: &CallContext, arn: &str, subnets: &[String]) -> Result<(), CloudError> {
        let call = CloudCall::SetSubnets { arn: arn.to_string(), subnets: subnets.to_vec() };
        self.invoke(ctx, call, |c| elbv2::set_subnets(c, arn, subnets)).await
    }

    async fn describe_load_balancer_attributes(&self, ctx: &CallContext, arn: &str) -> Result<BTreeMap<String, String>, CloudError> {
        self.invoke(ctx, CloudCall::DescribeLoadBalancerAttributes(arn.to_string()), |c| {
            elbv2::describe_attributes(c, arn)
        })
        .await
    }

    async fn modify_load_balancer_attributes(&self, ctx: &CallContext, arn: &str, attributes: &BTreeMap<String, String>) -> Result<(), CloudError> {
        let call = CloudCall::ModifyLoadBalancerAttributes { arn: arn.to_string(), attributes: attributes.clone() };
        self.invoke(ctx, call, |c| elbv2::modify_attributes(c, arn, attributes)).await
    }

    // WAF operations - delegated to waf module
    async fn get_web_acl_summary(&self, ctx: &CallContext, arn: &str) -> Result<Option<WebAclSummary>, CloudError> {
        self.invoke(ctx, CloudCall::GetWebAclSummary(arn.to_string()), |c| Ok(waf::summary(c, arn)))
            .await
    }

    async fn web_acl_exists(&self, ctx: &CallContext, web_acl_id: &str) -> Result<bool, CloudError> {
        self.invoke(ctx, CloudCall::WebAclExists(web_acl_id.to_string()), |c| Ok(waf::exists(c, web_acl_id)))
            .await
    }

    async fn associate_waf(&self, ctx: &CallContext, arn: &str, web_acl_id: &str) -> Result<(), CloudError> {
        let call = CloudCall::AssociateWaf { arn: arn.to_string(), web_acl_id: web_acl_id.to_string() };
        self.invoke(ctx, call, |c| waf::associate(c, arn, web_acl_id)).await
    }

    async fn disassociate_waf(&self, ctx: &CallContext, arn: &str) -> Result<(), CloudError> {
        self.invoke(ctx, CloudCall::DisassociateWaf(arn.to_string()), |c| {
            waf::disassociate(c, arn);
            Ok(())
        })
        .await
    }

    // EC2 inventory operations - delegated to ec2 module
    async fn get_security_groups_by_name(&self, ctx: &CallContext, names: &[String]) -> Result<Vec<SecurityGroup>, CloudError> {
        self.invoke(ctx, CloudCall::GetSecurityGroupsByName(names.to_vec()), |c| {
            Ok(ec2::security_groups_by_name(c, names))
        })
        .await
    }

    async fn get_subnets_by_name(&self, ctx: &CallContext, names: &[String]) -> Result<Vec<String>, CloudError> {
        self.invoke(ctx, CloudCall::GetSubnetsByName(names.to_vec()), |c| Ok(ec2::subnets_by_name(c, names)))
            .await
    }

    async fn cluster_subnets(&self, ctx: &CallContext, scheme: Scheme) -> Result<Vec<String>, CloudError> {
        self.invoke(ctx, CloudCall::ClusterSubnets(scheme), |c| ec2::cluster_subnets(c, scheme)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_lookup_by_name() {
        let cloud = MockCloudClient::new("us-east-1");
        let ctx = CallContext::new();
        let request = CreateLoadBalancerRequest {
            name: "k8s-default-web-1a2b".to_string(),
            lb_type: LoadBalancerType::Application,
            scheme: Scheme::InternetFacing,
            ip_address_type: IpAddressType::Ipv4,
            subnets: vec!["subnet-a".to_string(), "subnet-b".to_string()],
            tags: BTreeMap::new(),
        };

        let created = cloud.create_load_balancer(&ctx, &request).await.expect("create should succeed");
        let found = cloud
            .get_load_balancer_by_name(&ctx, "k8s-default-web-1a2b")
            .await
            .expect("lookup should succeed")
            .expect("load balancer should exist");

        assert_eq!(created.arn, found.arn);
        assert_eq!(found.subnets(), vec!["subnet-a".to_string(), "subnet-b".to_string()]);
        assert_eq!(cloud.mutating_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let cloud = MockCloudClient::new("us-east-1");
        let ctx = CallContext::new();
        let lb = cloud.seed_load_balancer("web", Scheme::Internal, IpAddressType::Ipv4, &["subnet-a"]);
        cloud.fail_next("SetIpAddressType", "throttled");

        let first = cloud.set_ip_address_type(&ctx, &lb.arn, IpAddressType::Dualstack).await;
        assert!(matches!(first, Err(CloudError::Api { ref message, .. }) if message == "throttled"));

        cloud
            .set_ip_address_type(&ctx, &lb.arn, IpAddressType::Dualstack)
            .await
            .expect("second attempt should succeed");
        assert_eq!(
            cloud.load_balancer("web").map(|lb| lb.ip_address_type),
            Some(IpAddressType::Dualstack)
        );
    }

    #[tokio::test]
    async fn test_delete_tolerates_absent() {
        let cloud = MockCloudClient::new("us-east-1");
        let ctx = CallContext::new();
        cloud
            .delete_load_balancer_by_arn(&ctx, "arn:aws:elasticloadbalancing:missing")
            .await
            .expect("deleting an absent load balancer should succeed");
    }

    #[tokio::test]
    async fn test_cancelled_call_is_not_recorded() {
        let cloud = MockCloudClient::new("us-east-1");
        let ctx = CallContext::new();
        ctx.cancel();

        let result = cloud.get_load_balancer_by_name(&ctx, "web").await;
        assert!(matches!(result, Err(ref e) if e.is_cancellation()));
        assert!(cloud.calls().is_empty());
    }

    #[tokio::test]
    async fn test_security_group_lookup_skips_unknown_names() {
        let cloud = MockCloudClient::new("us-east-1");
        let ctx = CallContext::new();
        cloud.add_security_group("sg-0abc", "web-ingress");

        let groups = cloud
            .get_security_groups_by_name(&ctx, &["web-ingress".to_string(), "missing".to_string()])
            .await
            .expect("lookup should succeed");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_id, "sg-0abc");
    }

    #[tokio::test]
    async fn test_associate_requires_existing_acl() {
        let cloud = MockCloudClient::new("us-east-1");
        let ctx = CallContext::new();
        let lb = cloud.seed_load_balancer("web", Scheme::Internal, IpAddressType::Ipv4, &["subnet-a"]);

        assert!(cloud.associate_waf(&ctx, &lb.arn, "acl-missing").await.is_err());
        cloud.add_web_acl("acl-1");
        cloud.associate_waf(&ctx, &lb.arn, "acl-1").await.expect("associate should succeed");
        assert_eq!(cloud.waf_association(&lb.arn).as_deref(), Some("acl-1"));
    }
}
