//! Resource kinds that can appear in deployment documents.

use crate::errors::{ConfigError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of a resource, as written in a document's `kind` key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Unknown,
    Deployment,
    Api,
}

/// Resource types reachable from the command line.
pub const VISIBLE_TYPES: &[ResourceType] = &[ResourceType::Deployment, ResourceType::Api];

impl ResourceType {
    pub fn all() -> &'static [ResourceType] {
        &[
            ResourceType::Unknown,
            ResourceType::Deployment,
            ResourceType::Api,
        ]
    }

    /// Canonical singular name, also the document discriminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Unknown => "unknown",
            ResourceType::Deployment => "deployment",
            ResourceType::Api => "api",
        }
    }

    /// Plural name used in messages.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceType::Unknown => "unknown",
            ResourceType::Deployment => "deployments",
            ResourceType::Api => "apis",
        }
    }

    /// Exact match against the singular name only, as used for the `kind` key.
    pub fn from_kind_str(s: &str) -> ResourceType {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .unwrap_or(ResourceType::Unknown)
    }

    /// Exact match against either the singular or the plural name.
    pub fn parse(s: &str) -> ResourceType {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s || t.plural() == s)
            .unwrap_or(ResourceType::Unknown)
    }

    /// Resolve a possibly abbreviated, case-insensitive type name typed on the CLI.
    ///
    /// An exact singular or plural name always wins. Otherwise every visible
    /// type whose singular or plural name starts with `prefix` is a candidate;
    /// more than one candidate is an ambiguity error.
    pub fn from_prefix(prefix: &str) -> Result<ResourceType, ConfigError> {
        let prefix = prefix.to_lowercase();

        let exact = Self::parse(&prefix);
        if exact != ResourceType::Unknown {
            return Ok(exact);
        }

        let candidates: BTreeSet<ResourceType> = VISIBLE_TYPES
            .iter()
            .copied()
            .filter(|t| t.as_str().starts_with(&prefix) || t.plural().starts_with(&prefix))
            .collect();

        match candidates.len() {
            0 => Err(ErrorKind::UnknownResourceKind { kind: prefix }.into()),
            1 => Ok(candidates.into_iter().next().unwrap_or_default()),
            _ => Err(ErrorKind::BeMoreSpecific {
                options: candidates.iter().map(|t| t.plural().to_string()).collect(),
            }
            .into()),
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_kind_str(s) {
            ResourceType::Unknown => Err(ErrorKind::UnknownResourceKind {
                kind: s.to_string(),
            }
            .into()),
            t => Ok(t),
        }
    }
}

/// Join resource types by their plural names, e.g. `apis, deployments`.
pub fn plurals(types: &[ResourceType]) -> Vec<String> {
    types.iter().map(|t| t.plural().to_string()).collect()
}
