//! Document loading and merging.
//!
//! A project is described by any number of YAML documents, each a list of
//! resources tagged with a `kind`. Documents are read in the order given and
//! merged into one [`Config`]:
//!
//! 1. **Parse** each file into a list of maps (`MalformedConfig` otherwise)
//! 2. **Read** every item through the schema for its kind; the first failing
//!    item aborts the whole file
//! 3. **Merge** the file into the accumulated config (at most one deployment)
//! 4. **Partial validation** of the accumulated config after every file
//! 5. **Final validation** once all files are merged (a deployment must exist)
//!
//! Every error is wrapped with the file, the resource and the key it came
//! from, so the rendered message reads as a breadcrumb trail.

use crate::config::api::{Api, validate_apis};
use crate::config::deployment::Deployment;
use crate::config::resource::{KIND_KEY, NAME_KEY, identify};
use crate::config::resource_type::ResourceType;
use crate::errors::{ConfigError, ConfigResult, ErrorKind};
use crate::reader::fields::StringValidation;
use crate::reader::yaml::{map_slice, read_yaml_bytes};
use crate::reader::{FieldValidation, first_error};
use crate::strings::index;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Everything defined by a project's documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Deployment>,
    pub apis: Vec<Api>,
}

/// One resource as it is written in a document, tagged with its `kind`.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Document<'a> {
    Deployment(&'a Deployment),
    Api(&'a Api),
}

/// Whether a path names a YAML document (`.yaml` or `.yml`, any case).
pub fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

fn in_file(error: ConfigError, file_path: &str) -> ConfigError {
    if file_path.is_empty() {
        error
    } else {
        error.wrap(file_path)
    }
}

fn read_error(error: std::io::Error, file_path: &str) -> ConfigError {
    in_file(
        ErrorKind::ReadConfig {
            message: error.to_string(),
        }
        .into(),
        file_path,
    )
}

/// Read the raw `kind` discriminator of one document item.
///
/// An empty string is returned as-is so it is reported as an unknown kind.
fn read_kind(data: &Mapping) -> ConfigResult<String> {
    StringValidation {
        required: true,
        allow_empty: true,
        ..Default::default()
    }
    .validate(data.get(KIND_KEY))
    .map_err(|e| e.wrap(KIND_KEY))
}

/// Fold `source` into `target`.
///
/// Fails without touching `target` when both define a deployment. APIs are
/// appended as-is; duplicates are left to validation.
pub fn merge_configs(target: &mut Config, source: Config) -> ConfigResult<()> {
    if source.deployment.is_some() && target.deployment.is_some() {
        return Err(ErrorKind::DuplicateConfig {
            resource_type: ResourceType::Deployment,
        }
        .into());
    }

    if let Some(deployment) = source.deployment {
        target.deployment = Some(deployment);
    }
    target.apis.extend(source.apis);
    Ok(())
}

/// Build a config from one parsed document without merging it anywhere.
pub fn new_partial(value: &Value, file_path: &str) -> ConfigResult<Config> {
    let items = map_slice(value).map_err(|e| in_file(e, file_path))?;

    let mut config = Config::default();
    for (i, data) in items.into_iter().enumerate() {
        let kind = read_kind(data)
            .map_err(|e| e.wrap_all(&identify(file_path, ResourceType::Unknown, "", i)))?;
        let resource_type = ResourceType::from_kind_str(&kind);

        let name = data.get(NAME_KEY).and_then(Value::as_str).unwrap_or_default();
        let located = |errors: Vec<ConfigError>| {
            first_error(errors).wrap_all(&identify(file_path, resource_type, name, i))
        };

        match resource_type {
            ResourceType::Deployment => {
                let deployment = Deployment::read(data, file_path, i).map_err(located)?;
                if config.deployment.is_some() {
                    return Err(located(vec![
                        ErrorKind::DuplicateConfig {
                            resource_type: ResourceType::Deployment,
                        }
                        .into(),
                    ]));
                }
                config.deployment = Some(deployment);
            }
            ResourceType::Api => config.apis.push(Api::read(data, file_path, i).map_err(located)?),
            ResourceType::Unknown => {
                return Err(ConfigError::new(ErrorKind::UnknownResourceKind { kind })
                    .wrap_all(&identify(file_path, ResourceType::Unknown, "", i)));
            }
        }
    }

    config.validate_partial()?;

    debug!(
        event = "core.config.document_read",
        file = file_path,
        has_deployment = config.deployment.is_some(),
        api_count = config.apis.len()
    );

    Ok(config)
}

/// Read, parse and partially validate one file on its own.
pub fn new_partial_path(path: &Path) -> ConfigResult<Config> {
    let file_path = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| read_error(e, &file_path))?;
    let value = read_yaml_bytes(&bytes).map_err(|e| in_file(e, &file_path))?;
    new_partial(&value, &file_path)
}

impl Config {
    /// Checks that hold for any subset of a project's documents.
    pub fn validate_partial(&self) -> ConfigResult<()> {
        if let Some(deployment) = &self.deployment {
            deployment.validate()?;
        }
        validate_apis(&self.apis)
    }

    /// Checks that need the complete document set.
    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_partial()?;

        if self.deployment.is_none() {
            return Err(ErrorKind::UndefinedConfig {
                resource_type: ResourceType::Deployment,
            }
            .into());
        }

        validate_apis(&self.apis)
    }

    /// Parse one file's bytes and merge it in.
    ///
    /// On error `self` is left as it was before the call.
    pub fn merge_bytes(&mut self, bytes: &[u8], file_path: &str) -> ConfigResult<()> {
        let value = read_yaml_bytes(bytes).map_err(|e| in_file(e, file_path))?;
        let source = new_partial(&value, file_path)?;

        let mut merged = self.clone();
        merge_configs(&mut merged, source).map_err(|e| in_file(e, file_path))?;
        merged.validate_partial()?;

        *self = merged;
        Ok(())
    }

    /// Load in-memory documents in iteration order. Non-YAML paths are skipped.
    pub fn new_from_bytes<I, P, B>(configs: I) -> ConfigResult<Config>
    where
        I: IntoIterator<Item = (P, B)>,
        P: AsRef<str>,
        B: AsRef<[u8]>,
    {
        let mut config = Config::default();
        for (file_path, bytes) in configs {
            let file_path = file_path.as_ref();
            if !is_yaml_path(Path::new(file_path)) {
                debug!(event = "core.config.file_skipped", file = file_path);
                continue;
            }
            config.merge_bytes(bytes.as_ref(), file_path)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load documents from disk in the given order. Non-YAML paths are skipped.
    pub fn new_from_files<P: AsRef<Path>>(paths: &[P]) -> ConfigResult<Config> {
        info!(event = "core.config.load_started", file_count = paths.len());

        let mut config = Config::default();
        for path in paths {
            let path = path.as_ref();
            let file_path = path.display().to_string();
            if !is_yaml_path(path) {
                debug!(event = "core.config.file_skipped", file = %file_path);
                continue;
            }

            let bytes = fs::read(path).map_err(|e| read_error(e, &file_path))?;
            config.merge_bytes(&bytes, &file_path)?;
        }

        config.validate()?;

        info!(
            event = "core.config.load_completed",
            deployment = config.deployment.as_ref().map(|d| d.resource.name.as_str()),
            api_count = config.apis.len()
        );

        Ok(config)
    }

    /// Every resource as a kind-tagged document, deployment first.
    pub fn documents(&self) -> Vec<Document<'_>> {
        self.deployment
            .iter()
            .map(Document::Deployment)
            .chain(self.apis.iter().map(Document::Api))
            .collect()
    }
}

/// Find the deployment name in a root document without validating the rest.
///
/// `relative_path` is only used to locate errors.
pub fn read_deployment_name(bytes: &[u8], relative_path: &str) -> ConfigResult<String> {
    let value = read_yaml_bytes(bytes).map_err(|e| in_file(e, relative_path))?;
    let items = map_slice(&value).map_err(|e| in_file(e, relative_path))?;

    let missing = || {
        ConfigError::new(ErrorKind::MissingDeploymentDefinition {
            file_name: relative_path.to_string(),
        })
    };

    let mut deployment_name: Option<String> = None;
    for (i, item) in items.into_iter().enumerate() {
        let is_deployment = item
            .get(KIND_KEY)
            .and_then(Value::as_str)
            .map(ResourceType::from_kind_str)
            == Some(ResourceType::Deployment);
        if !is_deployment {
            continue;
        }

        if deployment_name.is_some() {
            return Err(in_file(
                ErrorKind::DuplicateConfig {
                    resource_type: ResourceType::Deployment,
                }
                .into(),
                relative_path,
            ));
        }

        let name = StringValidation {
            required: true,
            ..Default::default()
        }
        .validate(item.get(NAME_KEY))
        .map_err(|e| {
            in_file(
                e.wrap(NAME_KEY)
                    .wrap(format!("{} at {}", ResourceType::Deployment, index(i))),
                relative_path,
            )
        })?;
        deployment_name = Some(name);
    }

    deployment_name.ok_or_else(missing)
}

/// [`read_deployment_name`] for a file on disk.
pub fn read_deployment_name_path(path: &Path, relative_path: &str) -> ConfigResult<String> {
    let bytes = fs::read(path).map_err(|e| read_error(e, relative_path))?;
    read_deployment_name(&bytes, relative_path)
}
