//! Routing-intent identity

use k8s_openapi::api::networking::v1::Ingress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace/name pair identifying an ingress
///
/// Every cloud resource owned by an ingress is named after this key, so it
/// must be stable for the lifetime of the ingress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngressKey {
    pub namespace: String,
    pub name: String,
}

impl IngressKey {
    /// Create a key from a namespace and name
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key of an ingress object. Returns `None` when the object has no name.
    /// A missing namespace falls back to `default`.
    pub fn from_ingress(ingress: &Ingress) -> Option<Self> {
        let name = ingress.metadata.name.as_ref()?;
        let namespace = ingress.metadata.namespace.as_deref().unwrap_or("default");
        Some(Self::new(namespace, name.clone()))
    }
}

impl fmt::Display for IngressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_from_ingress_defaults_namespace() {
        let ingress = Ingress {
            metadata: ObjectMeta {
                name: Some("web".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let key = IngressKey::from_ingress(&ingress);
        assert_eq!(key, Some(IngressKey::new("default", "web")));
        assert_eq!(key.map(|k| k.to_string()).as_deref(), Some("default/web"));
    }

    #[test]
    fn test_from_ingress_requires_name() {
        assert_eq!(IngressKey::from_ingress(&Ingress::default()), None);
    }
}
