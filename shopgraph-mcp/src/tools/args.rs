//! Argument validation and coercion
//!
//! Agents are loose with JSON types, so primitives are coerced where the
//! intent is unambiguous: numbers are accepted for strings, and integral
//! floats or decimal strings for integers. `null` counts as absent.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{ParamKind, ParamSpec, ToolSpec};
use crate::error::{McpError, McpResult};

/// A validated argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    String(String),
    Integer(i64),
}

impl ArgValue {
    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::String(s) => Value::String(s.clone()),
            ArgValue::Integer(i) => Value::from(*i),
        }
    }
}

/// Arguments that passed validation, defaults filled in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    values: BTreeMap<&'static str, ArgValue>,
}

impl Arguments {
    /// Get a string argument
    pub fn string(&self, name: &str) -> McpResult<&str> {
        match self.values.get(name) {
            Some(ArgValue::String(s)) => Ok(s),
            _ => Err(McpError::invalid(name, "expected a string")),
        }
    }

    /// Get an integer argument
    pub fn integer(&self, name: &str) -> McpResult<i64> {
        match self.values.get(name) {
            Some(ArgValue::Integer(i)) => Ok(*i),
            _ => Err(McpError::invalid(name, "expected an integer")),
        }
    }
}

/// Validate raw call arguments against a tool's declared parameters
pub fn validate(spec: &ToolSpec, arguments: &Value) -> McpResult<Arguments> {
    let empty = Map::new();
    let raw = match arguments {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(McpError::invalid(
                "arguments",
                format!("expected an object, got {}", type_name(other)),
            ))
        }
    };

    if let Some(unknown) = raw.keys().find(|k| spec.param(k).is_none()) {
        return Err(McpError::invalid(
            unknown,
            format!("not a parameter of {}", spec.name),
        ));
    }

    let mut values = BTreeMap::new();
    for param in &spec.params {
        let value = match raw.get(param.name).filter(|v| !v.is_null()) {
            Some(value) => coerce(param, value)?,
            None => match (&param.default, param.required) {
                (Some(default), _) => default.clone(),
                (None, true) => return Err(McpError::invalid(param.name, "is required")),
                (None, false) => continue,
            },
        };
        values.insert(param.name, value);
    }

    Ok(Arguments { values })
}

fn coerce(param: &ParamSpec, value: &Value) -> McpResult<ArgValue> {
    match param.kind {
        ParamKind::String => {
            let s = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(McpError::invalid(
                        param.name,
                        format!("expected a string, got {}", type_name(other)),
                    ))
                }
            };
            if param.non_empty && s.is_empty() {
                return Err(McpError::invalid(param.name, "must not be empty"));
            }
            Ok(ArgValue::String(s))
        }
        ParamKind::Integer => {
            let i = match value {
                Value::Number(n) => integral(n),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or_else(|| {
                McpError::invalid(
                    param.name,
                    format!("expected an integer, got {}", value),
                )
            })?;

            if let Some(min) = param.minimum.filter(|min| i < *min) {
                return Err(McpError::invalid(
                    param.name,
                    format!("must be at least {}, got {}", min, i),
                ));
            }
            if let Some(max) = param.maximum.filter(|max| i > *max) {
                return Err(McpError::invalid(
                    param.name,
                    format!("must be at most {}, got {}", max, i),
                ));
            }
            Ok(ArgValue::Integer(i))
        }
    }
}

/// Integer value of a JSON number, if it has no fractional part and fits i64
fn integral(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
