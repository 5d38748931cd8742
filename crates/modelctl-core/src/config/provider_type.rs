use serde::{Deserialize, Serialize};

/// Backend a deployment targets, as written in the provider's `name` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Unknown,
    Local,
    Kubernetes,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Unknown => "unknown",
            ProviderType::Local => "local",
            ProviderType::Kubernetes => "kubernetes",
        }
    }

    /// Exact-match parse. Anything unrecognized maps to `Unknown`.
    pub fn parse(s: &str) -> ProviderType {
        match s {
            "local" => ProviderType::Local,
            "kubernetes" => ProviderType::Kubernetes,
            _ => ProviderType::Unknown,
        }
    }

    /// Names of the concrete providers, excluding `unknown`.
    pub fn valid_strings() -> &'static [&'static str] {
        &["local", "kubernetes"]
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parse() {
        assert_eq!(ProviderType::parse("local"), ProviderType::Local);
        assert_eq!(ProviderType::parse("kubernetes"), ProviderType::Kubernetes);
        assert_eq!(ProviderType::parse("Kubernetes"), ProviderType::Unknown);
        assert_eq!(ProviderType::parse("k8s"), ProviderType::Unknown);
        assert_eq!(ProviderType::parse("unknown"), ProviderType::Unknown);
    }

    #[test]
    fn test_provider_type_round_trip() {
        for t in [ProviderType::Local, ProviderType::Kubernetes] {
            assert_eq!(ProviderType::parse(&t.to_string()), t);
        }
    }

    #[test]
    fn test_valid_strings() {
        assert_eq!(ProviderType::valid_strings(), &["local", "kubernetes"]);
    }
}
