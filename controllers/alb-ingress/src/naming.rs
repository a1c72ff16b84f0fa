//! Naming and tagging policy for load balancers.
//!
//! The name must be a pure function of the ingress namespace and name: it is
//! the only handle used to find the load balancer again on the next cycle.

use ingress_types::ControllerConfig;
use std::collections::BTreeMap;

/// Tag carrying the ingress namespace
pub const TAG_KEY_NAMESPACE: &str = "kubernetes.io/namespace";
/// Tag carrying the ingress name
pub const TAG_KEY_INGRESS_NAME: &str = "kubernetes.io/ingress-name";

/// Load balancer names are capped at 32 characters by the service.
const MAX_NAME_BODY: usize = 26;

/// Derives stable names and base tags for the resources of an ingress
pub trait NameTagGenerator: Send + Sync {
    /// Load balancer name for an ingress
    fn name_lb(&self, namespace: &str, ingress_name: &str) -> String;

    /// Tags every load balancer of the ingress carries
    fn tag_lb(&self, namespace: &str, ingress_name: &str) -> BTreeMap<String, String>;
}

/// `<prefix>-<namespace><name>` truncated, plus a short hash of namespace+name
#[derive(Debug, Clone)]
pub struct DefaultNameTagGenerator {
    alb_name_prefix: String,
    cluster_name: Option<String>,
}

impl DefaultNameTagGenerator {
    pub fn new(alb_name_prefix: impl Into<String>, cluster_name: Option<String>) -> Self {
        Self {
            alb_name_prefix: alb_name_prefix.into(),
            cluster_name,
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.alb_name_prefix.clone(), config.cluster_name.clone())
    }
}

impl NameTagGenerator for DefaultNameTagGenerator {
    fn name_lb(&self, namespace: &str, ingress_name: &str) -> String {
        let digest = md5::compute(format!("{}{}", namespace, ingress_name));
        let hash = format!("{:x}", digest);

        let prefix: String = self
            .alb_name_prefix
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let strip = |s: &str| -> String { s.chars().filter(char::is_ascii_alphanumeric).collect() };

        let mut name = format!("{}-{}-{}", prefix, strip(namespace), strip(ingress_name));
        // Every char is ASCII here, so byte truncation is safe.
        name.truncate(MAX_NAME_BODY);
        format!("{}-{}", name, &hash[..4])
    }

    fn tag_lb(&self, namespace: &str, ingress_name: &str) -> BTreeMap<String, String> {
        let mut tags = BTreeMap::from([
            (TAG_KEY_NAMESPACE.to_string(), namespace.to_string()),
            (TAG_KEY_INGRESS_NAME.to_string(), ingress_name.to_string()),
        ]);
        if let Some(cluster) = &self.cluster_name {
            tags.insert(format!("kubernetes.io/cluster/{}", cluster), "owned".to_string());
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_stable_and_bounded() {
        let generator = DefaultNameTagGenerator::new("k8s", None);
        let first = generator.name_lb("default", "web");
        assert_eq!(first, generator.name_lb("default", "web"));
        assert!(first.starts_with("k8s-default-web-"));
        assert_eq!(first.len(), "k8s-default-web-".len() + 4);

        let long = generator.name_lb("a-very-long-namespace-name", "and-an-even-longer-ingress-name");
        assert_eq!(long.len(), MAX_NAME_BODY + 5);
    }

    #[test]
    fn test_name_strips_non_alphanumerics() {
        let generator = DefaultNameTagGenerator::new("my_prefix", None);
        let name = generator.name_lb("team-a", "web.app");
        assert!(name.starts_with("my-prefix-teama-webapp-"), "unexpected name {}", name);
    }

    #[test]
    fn test_hash_distinguishes_truncated_names() {
        let generator = DefaultNameTagGenerator::new("k8s", None);
        let a = generator.name_lb("namespace-one", "ingress-with-a-long-name-a");
        let b = generator.name_lb("namespace-one", "ingress-with-a-long-name-b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_tags_include_cluster_ownership() {
        let generator = DefaultNameTagGenerator::new("k8s", Some("blue".to_string()));
        let tags = generator.tag_lb("default", "web");
        assert_eq!(tags.get(TAG_KEY_NAMESPACE).map(String::as_str), Some("default"));
        assert_eq!(tags.get(TAG_KEY_INGRESS_NAME).map(String::as_str), Some("web"));
        assert_eq!(tags.get("kubernetes.io/cluster/blue").map(String::as_str), Some("owned"));
    }
}
