//! Per-field validations.
//!
//! Each validation takes the raw value for one key (or `None` when the key
//! is absent) and either produces a typed value or an error. Key context is
//! added by the caller.

use crate::errors::{ConfigError, ConfigResult, ErrorKind};
use crate::reader::format::StringFormat;
use crate::reader::yaml::describe;
use serde_yaml::{Mapping, Value};

/// A validation for a single field.
pub trait FieldValidation {
    type Output;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<Self::Output>;
}

fn invalid_type(value: &Value, expected: &str) -> ConfigError {
    ErrorKind::InvalidPrimitiveType {
        got: describe(value),
        expected: expected.to_string(),
    }
    .into()
}

fn coerce_string(value: &Value, cast_number: bool) -> ConfigResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if cast_number => Ok(n.to_string()),
        other => Err(invalid_type(other, "string")),
    }
}

fn coerce_int(value: &Value) -> ConfigResult<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(invalid_type(value, "integer")),
            }
        }
        other => Err(invalid_type(other, "integer")),
    }
}

/// A required or defaulted string.
///
/// `null` is rejected even when the field is optional; use
/// [`StringPtrValidation`] for fields that may be unset.
#[derive(Debug, Clone, Default)]
pub struct StringValidation {
    pub required: bool,
    pub default: Option<String>,
    pub allow_empty: bool,
    pub cast_number: bool,
    pub format: Option<StringFormat>,
}

impl StringValidation {
    fn check(&self, s: String) -> ConfigResult<String> {
        if s.is_empty() {
            if self.allow_empty {
                return Ok(s);
            }
            return Err(ErrorKind::CannotBeEmpty.into());
        }
        if let Some(format) = self.format {
            format.check(&s)?;
        }
        Ok(s)
    }
}

impl FieldValidation for StringValidation {
    type Output = String;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<String> {
        match value {
            None if self.required => Err(ErrorKind::MustBeDefined.into()),
            None => Ok(self.default.clone().unwrap_or_default()),
            Some(Value::Null) => Err(ErrorKind::CannotBeNull.into()),
            Some(v) => self.check(coerce_string(v, self.cast_number)?),
        }
    }
}

/// An optional string; absent and `null` both yield the default.
#[derive(Debug, Clone, Default)]
pub struct StringPtrValidation {
    pub required: bool,
    pub default: Option<String>,
    pub allow_empty: bool,
    pub cast_number: bool,
    pub format: Option<StringFormat>,
}

impl FieldValidation for StringPtrValidation {
    type Output = Option<String>;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<Option<String>> {
        match value {
            None if self.required => Err(ErrorKind::MustBeDefined.into()),
            None | Some(Value::Null) => Ok(self.default.clone()),
            Some(v) => {
                let s = coerce_string(v, self.cast_number)?;
                if s.is_empty() && !self.allow_empty {
                    return Err(ErrorKind::CannotBeEmpty.into());
                }
                if let Some(format) = self.format {
                    format.check(&s)?;
                }
                Ok(Some(s))
            }
        }
    }
}

/// Numeric lower bounds shared by the integer validations.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntBounds {
    pub greater_than: Option<i64>,
    pub greater_than_or_equal_to: Option<i64>,
}

impl IntBounds {
    fn check(&self, n: i64) -> ConfigResult<i64> {
        if let Some(bound) = self.greater_than
            && n <= bound
        {
            return Err(ErrorKind::MustBeGreaterThan {
                bound: bound.to_string(),
                got: n.to_string(),
            }
            .into());
        }
        if let Some(bound) = self.greater_than_or_equal_to
            && n < bound
        {
            return Err(ErrorKind::MustBeGreaterThanOrEqualTo {
                bound: bound.to_string(),
                got: n.to_string(),
            }
            .into());
        }
        Ok(n)
    }
}

/// A 64-bit integer with a default.
#[derive(Debug, Clone, Default)]
pub struct Int64Validation {
    pub required: bool,
    pub default: i64,
    pub bounds: IntBounds,
}

impl FieldValidation for Int64Validation {
    type Output = i64;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<i64> {
        match value {
            None if self.required => Err(ErrorKind::MustBeDefined.into()),
            None => Ok(self.default),
            Some(Value::Null) => Err(ErrorKind::CannotBeNull.into()),
            Some(v) => self.bounds.check(coerce_int(v)?),
        }
    }
}

/// A 32-bit integer with a default. Values outside `i32` are type errors.
#[derive(Debug, Clone, Default)]
pub struct Int32Validation {
    pub required: bool,
    pub default: i32,
    pub bounds: IntBounds,
}

impl FieldValidation for Int32Validation {
    type Output = i32;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<i32> {
        match value {
            None if self.required => Err(ErrorKind::MustBeDefined.into()),
            None => Ok(self.default),
            Some(Value::Null) => Err(ErrorKind::CannotBeNull.into()),
            Some(v) => {
                let n = coerce_int(v)?;
                let n = i32::try_from(n).map_err(|_| invalid_type(v, "32-bit integer"))?;
                self.bounds.check(n.into())?;
                Ok(n)
            }
        }
    }
}

/// An optional 64-bit integer; absent and `null` yield `None`.
#[derive(Debug, Clone, Default)]
pub struct Int64PtrValidation {
    pub bounds: IntBounds,
}

impl FieldValidation for Int64PtrValidation {
    type Output = Option<i64>;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<Option<i64>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(v) => Ok(Some(self.bounds.check(coerce_int(v)?)?)),
        }
    }
}

/// A list of strings.
#[derive(Debug, Clone, Default)]
pub struct StringListValidation {
    pub required: bool,
    pub allow_empty: bool,
}

impl FieldValidation for StringListValidation {
    type Output = Vec<String>;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<Vec<String>> {
        let items = match value {
            None if self.required => return Err(ErrorKind::MustBeDefined.into()),
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Sequence(items)) => items,
            Some(other) => return Err(invalid_type(other, "list of strings")),
        };
        if items.is_empty() && !self.allow_empty {
            return Err(ErrorKind::CannotBeEmpty.into());
        }
        items
            .iter()
            .enumerate()
            .map(|(i, item)| coerce_string(item, false).map_err(|e| e.wrap(i.to_string())))
            .collect()
    }
}

/// A list of arbitrary values, passed through untouched.
#[derive(Debug, Clone, Default)]
pub struct ListValidation {
    pub required: bool,
    pub allow_empty: bool,
}

impl FieldValidation for ListValidation {
    type Output = Vec<Value>;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<Vec<Value>> {
        match value {
            None if self.required => Err(ErrorKind::MustBeDefined.into()),
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(items)) if items.is_empty() && !self.allow_empty => {
                Err(ErrorKind::CannotBeEmpty.into())
            }
            Some(Value::Sequence(items)) => Ok(items.clone()),
            Some(other) => Err(invalid_type(other, "list")),
        }
    }
}

/// A nested map, returned raw for a nested struct reader to consume.
#[derive(Debug, Clone, Default)]
pub struct MapValidation {
    pub required: bool,
}

impl FieldValidation for MapValidation {
    type Output = Option<Mapping>;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<Option<Mapping>> {
        match value {
            None if self.required => Err(ErrorKind::MustBeDefined.into()),
            None | Some(Value::Null) => Ok(None),
            Some(Value::Mapping(map)) if map.keys().all(Value::is_string) => Ok(Some(map.clone())),
            Some(other) => Err(invalid_type(other, "map")),
        }
    }
}

/// Run a validation, then map its output through a custom parser.
pub struct Parsed<V, F> {
    pub validation: V,
    pub parser: F,
}

impl<V, F, T> FieldValidation for Parsed<V, F>
where
    V: FieldValidation,
    F: Fn(V::Output) -> ConfigResult<T>,
{
    type Output = T;

    fn validate(&self, value: Option<&Value>) -> ConfigResult<T> {
        let raw = self.validation.validate(value)?;
        (self.parser)(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn n(v: i64) -> Value {
        Value::Number(v.into())
    }

    #[test]
    fn test_string_required_and_default() {
        let required = StringValidation {
            required: true,
            ..Default::default()
        };
        let err = required.validate(None).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MustBeDefined);

        let defaulted = StringValidation {
            default: Some("default".to_string()),
            ..Default::default()
        };
        assert_eq!(defaulted.validate(None).unwrap(), "default");
        assert_eq!(defaulted.validate(Some(&s("team"))).unwrap(), "team");
    }

    #[test]
    fn test_string_null_and_empty() {
        let v = StringValidation::default();
        assert_eq!(
            v.validate(Some(&Value::Null)).unwrap_err().kind(),
            &ErrorKind::CannotBeNull
        );
        assert_eq!(
            v.validate(Some(&s(""))).unwrap_err().kind(),
            &ErrorKind::CannotBeEmpty
        );

        let allow_empty = StringValidation {
            allow_empty: true,
            ..Default::default()
        };
        assert_eq!(allow_empty.validate(Some(&s(""))).unwrap(), "");
    }

    #[test]
    fn test_string_type_mismatch() {
        let v = StringValidation::default();
        let err = v.validate(Some(&n(3))).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::InvalidPrimitiveType {
                got: "3".to_string(),
                expected: "string".to_string()
            }
        );

        let cast = StringValidation {
            cast_number: true,
            ..Default::default()
        };
        assert_eq!(cast.validate(Some(&n(3))).unwrap(), "3");
    }

    #[test]
    fn test_string_format() {
        let v = StringValidation {
            format: Some(StringFormat::Dns1035),
            ..Default::default()
        };
        assert!(v.validate(Some(&s("iris"))).is_ok());
        let err = v.validate(Some(&s("Iris"))).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidDns1035 { .. }));
    }

    #[test]
    fn test_string_ptr() {
        let v = StringPtrValidation {
            cast_number: true,
            ..Default::default()
        };
        assert_eq!(v.validate(None).unwrap(), None);
        assert_eq!(v.validate(Some(&Value::Null)).unwrap(), None);
        assert_eq!(v.validate(Some(&s("1Gi"))).unwrap(), Some("1Gi".to_string()));
        assert_eq!(v.validate(Some(&n(2))).unwrap(), Some("2".to_string()));
        assert!(v.validate(Some(&Value::Bool(true))).is_err());
    }

    #[test]
    fn test_int32_bounds_and_default() {
        let v = Int32Validation {
            default: 1,
            bounds: IntBounds {
                greater_than: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(v.validate(None).unwrap(), 1);
        assert_eq!(v.validate(Some(&n(4))).unwrap(), 4);

        let err = v.validate(Some(&n(0))).unwrap_err();
        assert_eq!(err.to_string(), "must be greater than 0 (got 0)");
        assert!(v.validate(Some(&n(-3))).is_err());
    }

    #[test]
    fn test_int32_coercion() {
        let v = Int32Validation::default();
        let whole: Value = serde_yaml::from_str("2.0").unwrap();
        assert_eq!(v.validate(Some(&whole)).unwrap(), 2);

        let fractional: Value = serde_yaml::from_str("2.5").unwrap();
        assert!(v.validate(Some(&fractional)).is_err());

        let err = v.validate(Some(&s("3"))).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidPrimitiveType { .. }));

        let too_big = n(i64::from(i32::MAX) + 1);
        assert!(v.validate(Some(&too_big)).is_err());
    }

    #[test]
    fn test_int64_greater_than_or_equal_to() {
        let v = Int64Validation {
            bounds: IntBounds {
                greater_than_or_equal_to: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(v.validate(None).unwrap(), 0);
        assert_eq!(v.validate(Some(&n(0))).unwrap(), 0);
        let err = v.validate(Some(&n(-1))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "must be greater than or equal to 0 (got -1)"
        );
    }

    #[test]
    fn test_int64_ptr() {
        let v = Int64PtrValidation {
            bounds: IntBounds {
                greater_than: Some(0),
                ..Default::default()
            },
        };
        assert_eq!(v.validate(None).unwrap(), None);
        assert_eq!(v.validate(Some(&n(30))).unwrap(), Some(30));
        assert!(v.validate(Some(&n(0))).is_err());
    }

    #[test]
    fn test_string_list() {
        let v = StringListValidation {
            required: true,
            allow_empty: false,
        };
        let list: Value = serde_yaml::from_str("[a, b]").unwrap();
        assert_eq!(v.validate(Some(&list)).unwrap(), vec!["a", "b"]);

        let empty: Value = serde_yaml::from_str("[]").unwrap();
        assert_eq!(
            v.validate(Some(&empty)).unwrap_err().kind(),
            &ErrorKind::CannotBeEmpty
        );

        let mixed: Value = serde_yaml::from_str("[a, 2]").unwrap();
        let err = v.validate(Some(&mixed)).unwrap_err();
        assert_eq!(err.context(), &["1"]);
    }

    #[test]
    fn test_list_and_map() {
        let list = ListValidation {
            required: true,
            allow_empty: false,
        };
        let items: Value = serde_yaml::from_str("[1, {a: b}]").unwrap();
        assert_eq!(list.validate(Some(&items)).unwrap().len(), 2);
        assert!(list.validate(Some(&s("x"))).is_err());

        let map = MapValidation::default();
        let m: Value = serde_yaml::from_str("{a: 1}").unwrap();
        assert!(map.validate(Some(&m)).unwrap().is_some());
        assert!(map.validate(None).unwrap().is_none());
        assert!(map.validate(Some(&items)).is_err());
    }

    #[test]
    fn test_parsed() {
        let v = Parsed {
            validation: StringValidation::default(),
            parser: |s: String| -> ConfigResult<usize> { Ok(s.len()) },
        };
        assert_eq!(v.validate(Some(&s("abcd"))).unwrap(), 4);
    }
}
