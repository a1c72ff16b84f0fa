//! Load balancer instance convergence: create, recreate or patch in place

use super::desired::DesiredLoadBalancerConfig;
use crate::error::ControllerError;
use alb_cloud_client::{CallContext, CloudApiTrait, LoadBalancer};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Scheme cannot be changed on an existing load balancer
pub fn needs_recreation(current: &LoadBalancer, desired: &DesiredLoadBalancerConfig) -> bool {
    current.scheme != desired.scheme
}

/// Subnets are compared as sets; order is not significant
pub fn subnets_differ(current: &[String], desired: &[String]) -> bool {
    let current: BTreeSet<&String> = current.iter().collect();
    let desired: BTreeSet<&String> = desired.iter().collect();
    current != desired
}

/// Find, create, recreate or patch the load balancer so that it matches `desired`.
pub async fn ensure_instance(
    cloud: &dyn CloudApiTrait,
    ctx: &CallContext,
    desired: &DesiredLoadBalancerConfig,
) -> Result<LoadBalancer, ControllerError> {
    let existing = cloud
        .get_load_balancer_by_name(ctx, &desired.name)
        .await
        .map_err(|source| ControllerError::Lookup {
            name: desired.name.clone(),
            source,
        })?;

    match existing {
        None => create_instance(cloud, ctx, desired).await,
        Some(current) if needs_recreation(&current, desired) => recreate_instance(cloud, ctx, &current, desired).await,
        Some(current) => {
            patch_instance(cloud, ctx, &current, desired).await?;
            Ok(current)
        }
    }
}

async fn create_instance(
    cloud: &dyn CloudApiTrait,
    ctx: &CallContext,
    desired: &DesiredLoadBalancerConfig,
) -> Result<LoadBalancer, ControllerError> {
    info!("Creating LoadBalancer {} ({})", desired.name, desired.scheme);
    let lb = cloud
        .create_load_balancer(ctx, &desired.to_create_request())
        .await
        .map_err(|source| ControllerError::Provision {
            name: desired.name.clone(),
            action: "create",
            source,
        })?;
    info!("Created LoadBalancer {} ({})", lb.name, lb.arn);
    Ok(lb)
}

async fn recreate_instance(
    cloud: &dyn CloudApiTrait,
    ctx: &CallContext,
    current: &LoadBalancer,
    desired: &DesiredLoadBalancerConfig,
) -> Result<LoadBalancer, ControllerError> {
    info!(
        "Recreating LoadBalancer {}: scheme changed from {} to {}",
        current.name, current.scheme, desired.scheme
    );
    cloud
        .delete_load_balancer_by_arn(ctx, &current.arn)
        .await
        .map_err(|source| ControllerError::Provision {
            name: current.name.clone(),
            action: "delete for recreation",
            source,
        })?;
    info!("Deleted LoadBalancer {} ({}) for recreation", current.name, current.arn);

    match cloud.create_load_balancer(ctx, &desired.to_create_request()).await {
        Ok(lb) => {
            info!("Recreated LoadBalancer {} ({})", lb.name, lb.arn);
            Ok(lb)
        }
        Err(source) => {
            warn!(
                "LoadBalancer {} was deleted but could not be recreated, ingress has no load balancer until the next reconcile: {}",
                desired.name, source
            );
            Err(ControllerError::Recreation {
                name: desired.name.clone(),
                previous_arn: current.arn.clone(),
                source,
            })
        }
    }
}

async fn patch_instance(
    cloud: &dyn CloudApiTrait,
    ctx: &CallContext,
    current: &LoadBalancer,
    desired: &DesiredLoadBalancerConfig,
) -> Result<(), ControllerError> {
    if current.ip_address_type != desired.ip_address_type {
        info!(
            "Modifying IpAddressType of {} from {} to {}",
            current.arn, current.ip_address_type, desired.ip_address_type
        );
        cloud
            .set_ip_address_type(ctx, &current.arn, desired.ip_address_type)
            .await
            .map_err(|source| ControllerError::AttributeUpdate {
                arn: current.arn.clone(),
                attribute: "IpAddressType",
                source,
            })?;
    }

    let current_subnets = current.subnets();
    if subnets_differ(&current_subnets, &desired.subnets) {
        info!(
            "Modifying Subnets of {} from {:?} to {:?}",
            current.arn, current_subnets, desired.subnets
        );
        cloud
            .set_subnets(ctx, &current.arn, &desired.subnets)
            .await
            .map_err(|source| ControllerError::AttributeUpdate {
                arn: current.arn.clone(),
                attribute: "Subnets",
                source,
            })?;
    }

    debug!("LoadBalancer {} attributes converged", current.arn);
    Ok(())
}
