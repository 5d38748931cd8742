//! Deployment backends.
//!
//! The provider is a closed tagged union keyed by its `name` field:
//!
//! ```yaml
//! provider:
//!   name: kubernetes
//!   namespace: ml-serving
//! ```

use crate::config::provider_type::ProviderType;
use crate::errors::{ConfigResult, ErrorKind};
use crate::reader::fields::StringValidation;
use crate::reader::{InterfaceStructValidation, StringFormat, StructReader, StructValidation};
use serde::Serialize;

/// Key holding the provider discriminator.
pub const PROVIDER_TYPE_KEY: &str = "name";

pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Provider {
    /// Containers on the local Docker daemon.
    #[default]
    Local,
    Kubernetes(KubernetesProvider),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubernetesProvider {
    pub namespace: String,
}

impl Default for KubernetesProvider {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

fn namespace_validation() -> StringValidation {
    StringValidation {
        default: Some(DEFAULT_NAMESPACE.to_string()),
        format: Some(StringFormat::Dns1123),
        ..Default::default()
    }
}

impl KubernetesProvider {
    fn read(reader: &mut StructReader<'_>) -> KubernetesProvider {
        KubernetesProvider {
            namespace: reader.field("namespace", &namespace_validation()),
        }
    }
}

impl Provider {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Provider::Local => ProviderType::Local,
            Provider::Kubernetes(_) => ProviderType::Kubernetes,
        }
    }

    /// Check invariants that hold for providers built outside the reader too.
    pub fn validate(&self) -> ConfigResult<()> {
        match self {
            Provider::Local => Ok(()),
            Provider::Kubernetes(k8s) => StringFormat::Dns1123
                .check(&k8s.namespace)
                .map_err(|e| e.wrap("namespace")),
        }
    }
}

fn dispatch_provider(name: &str, reader: &mut StructReader<'_>) -> ConfigResult<Provider> {
    match ProviderType::parse(name) {
        ProviderType::Unknown => Err(ErrorKind::InvalidProviderType {
            name: name.to_string(),
            valid: ProviderType::valid_strings()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
        .into()),
        ProviderType::Local => Ok(Provider::Local),
        ProviderType::Kubernetes => Ok(Provider::Kubernetes(KubernetesProvider::read(reader))),
    }
}

/// Schema for the `provider` field of a deployment.
pub fn provider_validation() -> InterfaceStructValidation<Provider> {
    InterfaceStructValidation {
        required: true,
        type_key: PROVIDER_TYPE_KEY,
        struct_validation: StructValidation::default(),
        dispatch: dispatch_provider,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::FieldValidation;
    use serde_yaml::Value;

    fn read(yaml: &str) -> ConfigResult<Provider> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        provider_validation().validate(Some(&value))
    }

    #[test]
    fn test_local_provider() {
        assert_eq!(read("name: local").unwrap(), Provider::Local);
    }

    #[test]
    fn test_kubernetes_namespace_default() {
        let provider = read("name: kubernetes").unwrap();
        assert_eq!(
            provider,
            Provider::Kubernetes(KubernetesProvider {
                namespace: "default".to_string()
            })
        );
    }

    #[test]
    fn test_kubernetes_namespace_set() {
        let provider = read("name: kubernetes\nnamespace: ml-serving").unwrap();
        assert_eq!(
            provider,
            Provider::Kubernetes(KubernetesProvider {
                namespace: "ml-serving".to_string()
            })
        );
    }

    #[test]
    fn test_kubernetes_namespace_rejects_uppercase_and_underscore() {
        for ns in ["MlServing", "ml_serving"] {
            let err = read(&format!("name: kubernetes\nnamespace: {}", ns)).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::InvalidDns1123 { .. }),
                "namespace {} should be rejected",
                ns
            );
            assert_eq!(err.context(), &["namespace"]);
        }
    }

    #[test]
    fn test_unknown_provider() {
        let err = read("name: ecs").unwrap_err();
        assert_eq!(
            err.to_string(),
            "name: invalid provider \"ecs\" (valid providers are \"local\" and \"kubernetes\")"
        );
    }

    #[test]
    fn test_local_rejects_namespace() {
        let err = read("name: local\nnamespace: default").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnsupportedKey);
    }

    #[test]
    fn test_provider_rejects_non_string_keys() {
        let err = read("name: local\n1: x").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnsupportedKey);
        assert_eq!(err.context(), &["1"]);
    }

    #[test]
    fn test_provider_type_round_trip() {
        for provider in [
            Provider::Local,
            Provider::Kubernetes(KubernetesProvider::default()),
        ] {
            let serialized = serde_yaml::to_string(&provider).unwrap();
            let value: Value = serde_yaml::from_str(&serialized).unwrap();
            let name = value.get(PROVIDER_TYPE_KEY).and_then(Value::as_str).unwrap();
            assert_eq!(ProviderType::parse(name), provider.provider_type());
            assert_eq!(read(&serialized).unwrap(), provider);
        }
    }

    #[test]
    fn test_validate_programmatic_namespace() {
        let bad = Provider::Kubernetes(KubernetesProvider {
            namespace: "Bad_NS".to_string(),
        });
        assert!(bad.validate().is_err());
        assert!(Provider::Local.validate().is_ok());
    }
}
