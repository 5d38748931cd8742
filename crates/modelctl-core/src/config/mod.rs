//! Deployment documents: resource schemas, loading, merging and validation.

pub mod api;
pub mod cache;
pub mod deployment;
pub mod duplicates;
pub mod loading;
mod lookup;
pub mod provider;
pub mod provider_type;
pub mod resource;
pub mod resource_type;

pub use api::Api;
pub use cache::ConfigCache;
pub use deployment::Deployment;
pub use loading::{
    Config, Document, is_yaml_path, merge_configs, new_partial, new_partial_path,
    read_deployment_name, read_deployment_name_path,
};
pub use provider::{KubernetesProvider, Provider};
pub use provider_type::ProviderType;
pub use resource::{Resource, ResourceFields};
pub use resource_type::ResourceType;
