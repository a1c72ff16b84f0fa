//! Builders for ARNs, DNS names and availability zones

use crate::models::*;

/// Builds a load balancer the way the service would describe it after creation
pub(crate) fn build_load_balancer(
    region: &str,
    name: &str,
    scheme: Scheme,
    ip_address_type: IpAddressType,
    subnets: &[String],
) -> LoadBalancer {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let short = &suffix[..16];
    let dns_prefix = match scheme {
        Scheme::Internal => format!("internal-{}", name),
        Scheme::InternetFacing => name.to_string(),
    };
    LoadBalancer {
        arn: format!("arn:aws:elasticloadbalancing:{}:000000000000:loadbalancer/app/{}/{}", region, name, short),
        name: name.to_string(),
        dns_name: format!("{}-{}.{}.elb.amazonaws.com", dns_prefix, short, region),
        lb_type: LoadBalancerType::Application,
        scheme,
        ip_address_type,
        availability_zones: availability_zones(region, subnets),
        created_time: Some(chrono::Utc::now()),
    }
}

/// One zone per subnet, named `<region>a`, `<region>b`, ...
pub(crate) fn availability_zones(region: &str, subnets: &[String]) -> Vec<AvailabilityZone> {
    subnets
        .iter()
        .zip(('a'..='z').cycle())
        .map(|(subnet, zone)| AvailabilityZone {
            zone_name: format!("{}{}", region, zone),
            subnet_id: subnet.clone(),
        })
        .collect()
}
