//! Raw document reading: bytes to untyped values.

use crate::errors::{ConfigResult, ErrorKind};
use serde_yaml::{Mapping, Value};

/// Parse YAML bytes into an untyped value. Blank input is `Null`.
pub fn read_yaml_bytes(bytes: &[u8]) -> ConfigResult<Value> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Value::Null);
    }
    serde_yaml::from_slice(bytes).map_err(|e| {
        ErrorKind::ParseConfig {
            message: e.to_string(),
        }
        .into()
    })
}

/// Parse JSON bytes into the same untyped value space used for YAML.
pub fn read_json_bytes(bytes: &[u8]) -> ConfigResult<Value> {
    serde_json::from_slice(bytes).map_err(|e| {
        ErrorKind::ParseConfig {
            message: e.to_string(),
        }
        .into()
    })
}

/// View a parsed document as a list of string-keyed maps.
///
/// `Null` (an empty file) is an empty list. Anything else that is not a
/// sequence of maps with string keys is malformed.
pub fn map_slice(value: &Value) -> ConfigResult<Vec<&Mapping>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        _ => return Err(ErrorKind::MalformedConfig.into()),
    };

    items
        .iter()
        .map(|item| match item {
            Value::Mapping(map) if map.keys().all(Value::is_string) => Ok(map),
            _ => Err(ErrorKind::MalformedConfig.into()),
        })
        .collect()
}

/// Short description of a raw value for type errors.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a map".to_string(),
        Value::Tagged(tagged) => describe(&tagged.value),
    }
}
