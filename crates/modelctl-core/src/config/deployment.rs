use crate::config::provider::{Provider, provider_validation};
use crate::config::resource::{KIND_KEY, NAME_KEY, Resource, ResourceFields, identify_resource};
use crate::config::resource_type::ResourceType;
use crate::errors::{ConfigError, ConfigResult};
use crate::reader::fields::StringValidation;
use crate::reader::{StringFormat, StructReader, StructValidation};
use serde::Serialize;
use serde_yaml::Mapping;

/// The one deployment every project defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
    #[serde(flatten)]
    pub resource: ResourceFields,
    pub provider: Provider,
}

pub(crate) fn name_validation() -> StringValidation {
    StringValidation {
        required: true,
        format: Some(StringFormat::AlphaNumericDashUnderscore),
        ..Default::default()
    }
}

impl Deployment {
    pub fn read(
        data: &Mapping,
        file_path: &str,
        index: usize,
    ) -> Result<Deployment, Vec<ConfigError>> {
        let mut reader = StructReader::new(data, &StructValidation::default());
        reader.claim(KIND_KEY);

        let name = reader.field(NAME_KEY, &name_validation());
        let provider = reader.field("provider", &provider_validation());

        reader.finish()?;

        Ok(Deployment {
            resource: ResourceFields {
                name,
                file_path: file_path.to_string(),
                index,
            },
            provider,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.provider
            .validate()
            .map_err(|e| e.wrap("provider").wrap_all(&identify_resource(self)))
    }
}

impl Resource for Deployment {
    fn fields(&self) -> &ResourceFields {
        &self.resource
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::Deployment
    }
}
