//! Test utilities for unit testing the load balancer controller
//!
//! Provides recording fakes for the sub-reconcilers that share one ordered
//! journal, plus helpers for building ingresses, annotations and a controller
//! wired to the mock cloud client.

use crate::naming::DefaultNameTagGenerator;
use crate::reconciler::LoadBalancerController;
use crate::store::InMemoryStore;
use crate::subcontrollers::{
    ListenerReconciler, SecurityGroupAssociation, SecurityGroupAssociationReconciler, TargetGroup,
    TargetGroupReconciler, TargetGroupSet,
};
use alb_cloud_client::{CallContext, MockCloudClient, Scheme};
use ingress_types::{ControllerConfig, IngressAnnotations, IngressKey, LoadBalancerAnnotations};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const REGION: &str = "us-east-1";

/// Ordered record of sub-reconciler calls, with one-shot failure injection
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    associations: Arc<Mutex<Vec<SecurityGroupAssociation>>>,
}

impl Journal {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Make the next call recorded as `entry` fail
    pub fn fail(&self, entry: &str) {
        self.failing.lock().unwrap().insert(entry.to_string());
    }

    /// Associations passed to the security group reconciler
    pub fn associations(&self) -> Vec<SecurityGroupAssociation> {
        self.associations.lock().unwrap().clone()
    }

    fn record(&self, ctx: &CallContext, entry: &str) -> anyhow::Result<()> {
        ctx.check(entry)?;
        self.entries.lock().unwrap().push(entry.to_string());
        if self.failing.lock().unwrap().remove(entry) {
            anyhow::bail!("injected failure in {}", entry);
        }
        Ok(())
    }
}

/// Target group reconciler returning one target group per ingress
#[derive(Debug)]
pub struct FakeTargetGroups {
    pub journal: Journal,
}

#[async_trait::async_trait]
impl TargetGroupReconciler for FakeTargetGroups {
    async fn reconcile(&self, ctx: &CallContext, ingress: &Ingress) -> anyhow::Result<TargetGroupSet> {
        self.journal.record(ctx, "tg.reconcile")?;
        let name = ingress.metadata.name.clone().unwrap_or_default();
        Ok(TargetGroupSet::new([TargetGroup {
            arn: format!("arn:aws:elasticloadbalancing:{}:000000000000:targetgroup/{}/0001", REGION, name),
            name: format!("{}-tg", name),
            service_name: name,
            service_port: 80,
        }]))
    }

    async fn garbage_collect(&self, ctx: &CallContext, _in_use: &TargetGroupSet) -> anyhow::Result<()> {
        self.journal.record(ctx, "tg.gc")
    }

    async fn delete(&self, ctx: &CallContext, _key: &IngressKey) -> anyhow::Result<()> {
        self.journal.record(ctx, "tg.delete")
    }
}

#[derive(Debug)]
pub struct FakeListeners {
    pub journal: Journal,
}

#[async_trait::async_trait]
impl ListenerReconciler for FakeListeners {
    async fn reconcile(
        &self,
        ctx: &CallContext,
        _lb_arn: &str,
        _ingress: &Ingress,
        _target_groups: &TargetGroupSet,
    ) -> anyhow::Result<()> {
        self.journal.record(ctx, "ls.reconcile")
    }

    async fn delete(&self, ctx: &CallContext, _lb_arn: &str) -> anyhow::Result<()> {
        self.journal.record(ctx, "ls.delete")
    }
}

#[derive(Debug)]
pub struct FakeSecurityGroups {
    pub journal: Journal,
}

#[async_trait::async_trait]
impl SecurityGroupAssociationReconciler for FakeSecurityGroups {
    async fn reconcile(&self, ctx: &CallContext, association: &SecurityGroupAssociation) -> anyhow::Result<()> {
        self.journal.record(ctx, "sg.reconcile")?;
        self.journal.associations.lock().unwrap().push(association.clone());
        Ok(())
    }

    async fn delete(&self, ctx: &CallContext, _association: &SecurityGroupAssociation) -> anyhow::Result<()> {
        self.journal.record(ctx, "sg.delete")
    }
}

/// Everything a controller test needs to drive and inspect a reconcile
#[derive(Debug)]
pub struct TestHarness {
    pub cloud: MockCloudClient,
    pub store: Arc<InMemoryStore>,
    pub journal: Journal,
    pub controller: LoadBalancerController,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        let cloud = MockCloudClient::new(REGION);
        let store = Arc::new(InMemoryStore::new(config.clone()));
        let journal = Journal::default();
        let controller = LoadBalancerController::new(
            Arc::new(cloud.clone()),
            store.clone(),
            Arc::new(DefaultNameTagGenerator::from_config(&config)),
            Arc::new(FakeTargetGroups { journal: journal.clone() }),
            Arc::new(FakeListeners { journal: journal.clone() }),
            Arc::new(FakeSecurityGroups { journal: journal.clone() }),
        );
        Self {
            cloud,
            store,
            journal,
            controller,
        }
    }

    /// Register annotations for an ingress and return the ingress object
    pub fn ingress(&self, namespace: &str, name: &str, annotations: IngressAnnotations) -> Ingress {
        self.store.set_annotations(IngressKey::new(namespace, name), annotations);
        create_test_ingress(namespace, name)
    }

    /// Name the controller derives for an ingress
    pub fn lb_name(&self, namespace: &str, name: &str) -> String {
        self.controller.name_tag_gen.name_lb(namespace, name)
    }
}

pub fn create_test_ingress(namespace: &str, name: &str) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn create_test_annotations(scheme: Scheme, subnets: &[&str]) -> IngressAnnotations {
    IngressAnnotations {
        load_balancer: LoadBalancerAnnotations {
            scheme,
            subnets: strings(subnets),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
