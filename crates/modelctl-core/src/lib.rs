//! modelctl-core: Core library for declarative model-serving deployments
//!
//! This library reads a project's deployment documents (one deployment plus
//! any number of APIs), validates them and merges them into a single
//! [`Config`]. It is used by the `modelctl` CLI.
//!
//! # Main Entry Points
//!
//! - [`config`] - Load, merge and validate deployment documents
//! - [`reader`] - Field validation framework over untyped YAML/JSON values
//! - [`status`] - Summarize resource statuses into one line
//! - [`jobs`] - Batch job submission contract
//! - [`settings`] - The CLI's own TOML settings

pub mod config;
pub mod errors;
pub mod events;
pub mod jobs;
pub mod logging;
pub mod quantity;
pub mod reader;
pub mod settings;
pub mod status;
pub mod strings;

// Re-export commonly used types at crate root for convenience
pub use config::{
    Api, Config, ConfigCache, Deployment, Provider, ProviderType, Resource, ResourceType,
};
pub use errors::{ConfigError, ConfigResult, ErrorKind, ModelctlError, SettingsError};
pub use quantity::Quantity;
pub use settings::{CliSettings, OutputFormat};
pub use status::{ApiStatus, Status, StatusCode, status_str};

// Re-export logging initialization
pub use logging::init_logging;
