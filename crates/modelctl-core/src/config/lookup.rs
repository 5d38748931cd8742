use crate::config::api::Api;
use crate::config::loading::Config;
use crate::config::resource::Resource;
use crate::config::resource_type::ResourceType;
use crate::errors::{ConfigResult, ErrorKind};

impl Config {
    /// Every resource, deployment first.
    pub fn resources(&self) -> Vec<&dyn Resource> {
        let mut resources: Vec<&dyn Resource> = Vec::with_capacity(self.apis.len() + 1);
        if let Some(deployment) = &self.deployment {
            resources.push(deployment);
        }
        resources.extend(self.apis.iter().map(|a| a as &dyn Resource));
        resources
    }

    pub fn api(&self, name: &str) -> ConfigResult<&Api> {
        self.apis
            .iter()
            .find(|api| api.name() == name)
            .ok_or_else(|| {
                ErrorKind::ResourceNotFound {
                    name: name.to_string(),
                    resource_type: ResourceType::Api,
                }
                .into()
            })
    }

    pub fn api_names(&self) -> Vec<&str> {
        self.apis.iter().map(|api| api.name()).collect()
    }

    /// Any resource by name, whatever its type.
    pub fn resource(&self, name: &str) -> ConfigResult<&dyn Resource> {
        self.resources()
            .into_iter()
            .find(|r| r.name() == name)
            .ok_or_else(|| {
                ErrorKind::ResourceNameNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// A resource by name, restricted to `types`.
    ///
    /// Distinguishes a name that is not defined at all from one defined only
    /// under a type that is not allowed here.
    pub fn resource_of_type(
        &self,
        name: &str,
        types: &[ResourceType],
    ) -> ConfigResult<&dyn Resource> {
        let matches: Vec<&dyn Resource> = self
            .resources()
            .into_iter()
            .filter(|r| r.name() == name)
            .collect();

        if let Some(found) = matches.iter().find(|r| types.contains(&r.resource_type())) {
            return Ok(*found);
        }

        if matches.is_empty() {
            return Err(ErrorKind::UndefinedResource {
                name: name.to_string(),
                resource_types: types.to_vec(),
            }
            .into());
        }

        let mut actual: Vec<ResourceType> = matches.iter().map(|r| r.resource_type()).collect();
        actual.sort();
        actual.dedup();
        Err(ErrorKind::ResourceWrongType {
            name: name.to_string(),
            actual,
            valid: types.to_vec(),
        }
        .into())
    }
}
