//! Unit tests for load balancer deletion

use crate::error::{ControllerError, TeardownStep};
use crate::test_utils::*;
use alb_cloud_client::{CallContext, CloudCall, IpAddressType, Scheme};
use ingress_types::IngressKey;

#[tokio::test]
async fn test_delete_without_load_balancer_is_noop() {
    let harness = TestHarness::new();

    harness
        .controller
        .delete(&CallContext::new(), &IngressKey::new("default", "web"))
        .await
        .expect("delete should succeed");

    assert!(harness.journal.entries().is_empty());
    assert!(harness.cloud.mutating_calls().is_empty());
}

#[tokio::test]
async fn test_delete_runs_in_reverse_dependency_order() {
    let harness = TestHarness::new();
    let lb = harness.cloud.seed_load_balancer(
        &harness.lb_name("default", "web"),
        Scheme::InternetFacing,
        IpAddressType::Ipv4,
        &["subnet-a"],
    );

    harness
        .controller
        .delete(&CallContext::new(), &IngressKey::new("default", "web"))
        .await
        .expect("delete should succeed");

    assert_eq!(harness.journal.entries(), ["sg.delete", "ls.delete", "tg.delete"]);
    assert_eq!(harness.cloud.mutating_calls(), vec![CloudCall::DeleteLoadBalancer(lb.arn.clone())]);
    assert_eq!(harness.cloud.load_balancer_count(), 0);
}

#[tokio::test]
async fn test_delete_failure_stops_later_steps_and_retry_completes() {
    let harness = TestHarness::new();
    harness.cloud.seed_load_balancer(
        &harness.lb_name("default", "web"),
        Scheme::Internal,
        IpAddressType::Ipv4,
        &["subnet-a"],
    );
    harness.journal.fail("ls.delete");
    let key = IngressKey::new("default", "web");

    let err = harness.controller.delete(&CallContext::new(), &key).await.unwrap_err();

    assert!(matches!(
        err,
        ControllerError::Teardown {
            step: TeardownStep::Listeners,
            ..
        }
    ));
    assert_eq!(harness.journal.entries(), ["sg.delete", "ls.delete"]);
    assert!(harness.cloud.mutating_calls().is_empty());
    assert_eq!(harness.cloud.load_balancer_count(), 1);

    harness.journal.clear();
    harness.controller.delete(&CallContext::new(), &key).await.expect("retry should succeed");

    assert_eq!(harness.journal.entries(), ["sg.delete", "ls.delete", "tg.delete"]);
    assert_eq!(harness.cloud.load_balancer_count(), 0);
}

#[tokio::test]
async fn test_load_balancer_delete_failure_is_reported() {
    let harness = TestHarness::new();
    harness.cloud.seed_load_balancer(
        &harness.lb_name("default", "web"),
        Scheme::Internal,
        IpAddressType::Ipv4,
        &["subnet-a"],
    );
    harness.cloud.fail_next("DeleteLoadBalancer", "dependency violation");

    let err = harness
        .controller
        .delete(&CallContext::new(), &IngressKey::new("default", "web"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ControllerError::Teardown {
            step: TeardownStep::LoadBalancer,
            ..
        }
    ));
    assert_eq!(harness.cloud.load_balancer_count(), 1);
}

#[tokio::test]
async fn test_reconcile_then_delete_leaves_nothing_behind() {
    let harness = TestHarness::new();
    let ingress = harness.ingress("default", "web", create_test_annotations(Scheme::Internal, &["subnet-a"]));
    let ctx = CallContext::new();

    harness.controller.reconcile(&ctx, &ingress).await.expect("reconcile");
    harness.journal.clear();
    harness
        .controller
        .delete(&ctx, &IngressKey::new("default", "web"))
        .await
        .expect("delete");

    assert_eq!(harness.journal.entries(), ["sg.delete", "ls.delete", "tg.delete"]);
    assert_eq!(harness.cloud.load_balancer_count(), 0);
}
