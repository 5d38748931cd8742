use crate::config::duplicates::check_unique_names;
use crate::config::resource::{KIND_KEY, NAME_KEY, Resource, ResourceFields, identify_resource};
use crate::config::resource_type::ResourceType;
use crate::errors::{ConfigError, ConfigResult, ErrorKind};
use crate::quantity::{Quantity, QuantityValidation, quantity_parser};
use crate::reader::fields::{
    Int32Validation, Int64Validation, IntBounds, Parsed, StringPtrValidation, StringValidation,
};
use crate::reader::{StringFormat, StructReader, StructValidation};
use serde::Serialize;
use serde_yaml::Mapping;

/// A model served behind an HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Api {
    #[serde(flatten)]
    pub resource: ResourceFields,
    /// Location of the model artifact.
    pub model: String,
    pub replicas: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem: Option<Quantity>,
    pub gpu: i64,
}

fn name_validation() -> StringValidation {
    StringValidation {
        required: true,
        format: Some(StringFormat::Dns1035),
        ..Default::default()
    }
}

type QuantityField =
    Parsed<StringPtrValidation, Box<dyn Fn(Option<String>) -> ConfigResult<Option<Quantity>>>>;

/// Optional compute quantity; bare numbers are accepted.
fn compute_validation() -> QuantityField {
    Parsed {
        validation: StringPtrValidation {
            cast_number: true,
            ..Default::default()
        },
        parser: Box::new(quantity_parser(QuantityValidation {
            min: Some(Quantity::zero()),
            int: false,
        })),
    }
}

impl Api {
    /// Read one document item. Every field error is reported, in field order.
    pub fn read(data: &Mapping, file_path: &str, index: usize) -> Result<Api, Vec<ConfigError>> {
        let mut reader = StructReader::new(data, &StructValidation::default());
        reader.claim(KIND_KEY);

        let name = reader.field(NAME_KEY, &name_validation());
        let model = reader.field(
            "model",
            &StringValidation {
                required: true,
                ..Default::default()
            },
        );
        let replicas = reader.field(
            "replicas",
            &Int32Validation {
                default: 1,
                bounds: IntBounds {
                    greater_than: Some(0),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let cpu = reader.field("cpu", &compute_validation());
        let mem = reader.field("mem", &compute_validation());
        let gpu = reader.field(
            "gpu",
            &Int64Validation {
                bounds: IntBounds {
                    greater_than_or_equal_to: Some(0),
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        reader.finish()?;

        Ok(Api {
            resource: ResourceFields {
                name,
                file_path: file_path.to_string(),
                index,
            },
            model,
            replicas,
            cpu,
            mem,
            gpu,
        })
    }

    /// Invariants that also hold for APIs built in code.
    pub fn validate(&self) -> ConfigResult<()> {
        StringFormat::Dns1035
            .check(self.name())
            .map_err(|e| e.wrap(NAME_KEY))?;

        if self.model.is_empty() {
            return Err(ConfigError::new(ErrorKind::CannotBeEmpty).wrap("model"));
        }
        if self.replicas <= 0 {
            return Err(ConfigError::new(ErrorKind::MustBeGreaterThan {
                bound: "0".to_string(),
                got: self.replicas.to_string(),
            })
            .wrap("replicas"));
        }
        if self.gpu < 0 {
            return Err(ConfigError::new(ErrorKind::MustBeGreaterThanOrEqualTo {
                bound: "0".to_string(),
                got: self.gpu.to_string(),
            })
            .wrap("gpu"));
        }
        for (key, quantity) in [("cpu", &self.cpu), ("mem", &self.mem)] {
            if let Some(q) = quantity
                && q.value() < 0.0
            {
                return Err(ConfigError::new(ErrorKind::MustBeGreaterThanOrEqualTo {
                    bound: "0".to_string(),
                    got: q.to_string(),
                })
                .wrap(key));
            }
        }
        Ok(())
    }
}

impl Resource for Api {
    fn fields(&self) -> &ResourceFields {
        &self.resource
    }

    fn resource_type(&self) -> ResourceType {
        ResourceType::Api
    }
}

/// Validate every API, then require names to be unique among them.
pub fn validate_apis(apis: &[Api]) -> ConfigResult<()> {
    for api in apis {
        api.validate()
            .map_err(|e| e.wrap_all(&identify_resource(api)))?;
    }
    let resources: Vec<&dyn Resource> = apis.iter().map(|a| a as &dyn Resource).collect();
    check_unique_names(&resources)
}
