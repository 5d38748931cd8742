//! # Field Validation Framework
//!
//! Reads untyped documents (lists of string-keyed maps) into typed values.
//!
//! A struct is read with a [`StructReader`]: each call to
//! [`StructReader::field`] validates one key against a [`FieldValidation`],
//! records any error under that key, and returns the typed value (or its
//! default when the key failed). [`StructReader::finish`] then reports every
//! recorded error, plus any keys no field claimed when extra fields are not
//! allowed.
//!
//! ```rust
//! use modelctl_core::reader::{StructReader, StructValidation};
//! use modelctl_core::reader::fields::{Int32Validation, IntBounds};
//!
//! let data: serde_yaml::Mapping = serde_yaml::from_str("replicas: 3").unwrap();
//! let mut reader = StructReader::new(&data, &StructValidation::default());
//! let replicas = reader.field(
//!     "replicas",
//!     &Int32Validation {
//!         default: 1,
//!         bounds: IntBounds { greater_than: Some(0), ..Default::default() },
//!         ..Default::default()
//!     },
//! );
//! reader.finish().unwrap();
//! assert_eq!(replicas, 3);
//! ```

pub mod fields;
pub mod format;
pub mod yaml;

pub use fields::FieldValidation;
pub use format::StringFormat;

use crate::errors::{ConfigError, ConfigResult, ErrorKind};
use fields::StringValidation;
use serde_yaml::{Mapping, Value};

/// Struct-level options.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructValidation {
    /// Stop validating fields after the first error.
    pub short_circuit: bool,
    /// Let keys that no field claims pass silently.
    pub allow_extra_fields: bool,
}

/// Reads the fields of one map, collecting errors as it goes.
pub struct StructReader<'a> {
    data: &'a Mapping,
    validation: StructValidation,
    known_keys: Vec<&'a str>,
    errors: Vec<ConfigError>,
}

impl<'a> StructReader<'a> {
    pub fn new(data: &'a Mapping, validation: &StructValidation) -> Self {
        Self {
            data,
            validation: *validation,
            known_keys: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Validate one key. On error the error is recorded and the default returned.
    pub fn field<V>(&mut self, key: &'a str, validation: &V) -> V::Output
    where
        V: FieldValidation,
        V::Output: Default,
    {
        self.known_keys.push(key);

        if self.validation.short_circuit && !self.errors.is_empty() {
            return V::Output::default();
        }

        match validation.validate(self.data.get(key)) {
            Ok(value) => value,
            Err(e) => {
                self.errors.push(e.wrap(key));
                V::Output::default()
            }
        }
    }

    /// Claim a key without validating it (e.g. a discriminator read elsewhere).
    pub fn claim(&mut self, key: &'a str) {
        self.known_keys.push(key);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All recorded errors, including unclaimed keys, in document order.
    ///
    /// Keys that are not strings are never accepted.
    pub fn finish(mut self) -> Result<(), Vec<ConfigError>> {
        let data = self.data;
        for key in data.keys() {
            let unsupported = match key.as_str() {
                Some(key) => !self.validation.allow_extra_fields && !self.known_keys.contains(&key),
                None => true,
            };
            if unsupported {
                let label = key.as_str().map_or_else(|| yaml::describe(key), str::to_string);
                self.errors
                    .push(ConfigError::new(ErrorKind::UnsupportedKey).wrap(label));
            }
        }

        if self.validation.short_circuit {
            self.errors.truncate(1);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Like [`finish`](Self::finish), keeping only the first error.
    pub fn finish_first(self) -> ConfigResult<()> {
        self.finish().map_err(first_error)
    }
}

/// The first of a non-empty error list.
pub fn first_error(errors: Vec<ConfigError>) -> ConfigError {
    errors
        .into_iter()
        .next()
        .unwrap_or_else(|| ConfigError::new(ErrorKind::Unknown))
}

/// A field whose schema depends on a discriminator key inside it.
///
/// `dispatch` receives the discriminator string and a reader over the same
/// map, and builds the concrete variant. It is expected to match
/// exhaustively over the parsed discriminator and fail for unknown values.
pub struct InterfaceStructValidation<T> {
    pub required: bool,
    pub type_key: &'static str,
    pub struct_validation: StructValidation,
    pub dispatch: fn(&str, &mut StructReader<'_>) -> ConfigResult<T>,
}

impl<T: Default> FieldValidation for InterfaceStructValidation<T> {
    type Output = T;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<T> {
        let data = match value {
            None if self.required => return Err(ErrorKind::MustBeDefined.into()),
            None => return Ok(T::default()),
            Some(Value::Null) => return Err(ErrorKind::CannotBeNull.into()),
            Some(Value::Mapping(map)) => map,
            Some(other) => {
                return Err(ErrorKind::InvalidPrimitiveType {
                    got: yaml::describe(other),
                    expected: "map".to_string(),
                }
                .into());
            }
        };

        let type_validation = StringValidation {
            required: true,
            ..Default::default()
        };
        let type_str = type_validation
            .validate(data.get(self.type_key))
            .map_err(|e| e.wrap(self.type_key))?;

        let mut reader = StructReader::new(data, &self.struct_validation);
        reader.claim(self.type_key);
        let parsed = (self.dispatch)(&type_str, &mut reader).map_err(|e| e.wrap(self.type_key))?;
        reader.finish_first()?;
        Ok(parsed)
    }
}

fn is_set(data: &Mapping, key: &str) -> bool {
    matches!(data.get(key), Some(v) if !v.is_null())
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

/// Exactly one of `keys` must be set.
pub fn check_specify_only_one(data: &Mapping, keys: &[&str]) -> ConfigResult<()> {
    match keys.iter().filter(|k| is_set(data, k)).count() {
        1 => Ok(()),
        0 => Err(ErrorKind::SpecifyOnlyOneMissing { keys: owned(keys) }.into()),
        _ => Err(ErrorKind::SpecifyOnlyOne { keys: owned(keys) }.into()),
    }
}

/// Either every key in `keys` is set, or none is.
pub fn check_all_or_none(data: &Mapping, keys: &[&str]) -> ConfigResult<()> {
    let set = keys.iter().filter(|k| is_set(data, k)).count();
    if set == 0 || set == keys.len() {
        Ok(())
    } else {
        Err(ErrorKind::SpecifyAllOrNone { keys: owned(keys) }.into())
    }
}

/// When `key` is set, at least one of `prerequisites` must be set too.
pub fn check_prerequisites(data: &Mapping, key: &str, prerequisites: &[&str]) -> ConfigResult<()> {
    if is_set(data, key) && !prerequisites.iter().any(|p| is_set(data, p)) {
        return Err(ErrorKind::OneOfPrerequisitesNotDefined {
            key: key.to_string(),
            prerequisites: owned(prerequisites),
        }
        .into());
    }
    Ok(())
}
