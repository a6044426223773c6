//! Mapping of tool arguments onto a concrete upstream request.

use crate::catalog::{EndpointSpec, ParamKind, ParamLocation, ParamSpec};
use crate::error::ArgumentError;
use crate::types::HttpMethod;
use serde_json::{Map, Value};

/// A fully resolved upstream call, ready for the HTTP transport
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    /// Path segments relative to the API base URL, not yet percent-encoded
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    /// JSON body; always present for POST, never for GET
    pub body: Option<Value>,
}

impl UpstreamRequest {
    /// Human-readable relative path, for logs
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

/// Validate `arguments` against `spec` and build the upstream request.
///
/// `null` is treated as an empty argument object. Arguments not declared by
/// the endpoint are rejected.
pub fn build_request(
    spec: &EndpointSpec,
    arguments: &Value,
) -> Result<UpstreamRequest, ArgumentError> {
    let empty = Map::new();
    let args = match arguments {
        Value::Null => &empty,
        Value::Object(map) => map,
        _ => return Err(ArgumentError::NotAnObject),
    };

    if let Some(unknown) = args.keys().find(|key| spec.param(key).is_none()) {
        return Err(ArgumentError::Unknown(unknown.clone()));
    }

    let mut path_values: Vec<(&'static str, String)> = Vec::new();
    let mut query = Vec::new();
    let mut body = Map::new();

    for param in spec.params {
        let value = match args.get(param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(ArgumentError::Missing(param.name));
                }
                continue;
            }
            Some(value) => validate(param, value)?,
        };

        match param.location {
            ParamLocation::Path => {
                let rendered = render(&value);
                if rendered.trim().is_empty() {
                    return Err(ArgumentError::Empty(param.name));
                }
                path_values.push((param.name, rendered));
            }
            ParamLocation::Query => query.push((param.wire_name.to_string(), render(&value))),
            ParamLocation::Body => {
                body.insert(param.wire_name.to_string(), value);
            }
        }
    }

    let segments = spec
        .path
        .split('/')
        .map(|segment| {
            match segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
            {
                Some(name) => path_values
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default(),
                None => segment.to_string(),
            }
        })
        .collect();

    let body = match spec.method {
        HttpMethod::Post => Some(Value::Object(body)),
        HttpMethod::Get => None,
    };

    Ok(UpstreamRequest {
        method: spec.method,
        segments,
        query,
        body,
    })
}

/// Check a single argument and return the value to forward
fn validate(param: &ParamSpec, value: &Value) -> Result<Value, ArgumentError> {
    let invalid = |expected| ArgumentError::InvalidType {
        name: param.name,
        expected,
    };

    match param.kind {
        ParamKind::String => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(invalid("a string")),
        },
        ParamKind::Integer { min, max } => {
            let n = as_integer(value).ok_or_else(|| invalid("an integer"))?;
            let lo = min.unwrap_or(i64::MIN);
            let hi = max.unwrap_or(i64::MAX);
            if n < lo || n > hi {
                return Err(ArgumentError::OutOfRange {
                    name: param.name,
                    min: lo,
                    max: hi,
                    value: n,
                });
            }
            Ok(Value::from(n))
        }
        ParamKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(invalid("a boolean")),
        },
        ParamKind::StringList => {
            let items = value
                .as_array()
                .filter(|items| items.iter().all(Value::is_string))
                .ok_or_else(|| invalid("an array of strings"))?;
            if param.required && items.is_empty() {
                return Err(ArgumentError::Empty(param.name));
            }
            Ok(value.clone())
        }
        ParamKind::Object => match value {
            Value::Object(map) if map.values().all(Value::is_string) => Ok(value.clone()),
            _ => Err(invalid("an object of strings")),
        },
        ParamKind::Enum(choices) => {
            let s = value.as_str().ok_or_else(|| invalid("a string"))?;
            if choices.contains(&s) {
                Ok(value.clone())
            } else {
                Err(ArgumentError::InvalidChoice {
                    name: param.name,
                    value: s.to_string(),
                    allowed: choices.join(", "),
                })
            }
        }
    }
}

/// Integers, including integral floats such as `10.0`
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Render a validated value for the path or query string
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
