//! Query templates, bound parameters and result records
//!
//! Templates are constant Cypher text plus the parameter names and result
//! columns they declare. Caller-supplied values only ever travel as bound
//! parameters; [`CypherQuery::bind`] refuses names the template does not
//! declare and the executor refuses to run a query with a declared name left
//! unbound.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{GraphError, Result};

/// A fixed, parameterized query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTemplate {
    /// Stable template name, used in logs and errors
    pub name: &'static str,
    /// Cypher text with `$param` placeholders
    pub text: &'static str,
    /// Placeholders the text declares
    pub params: &'static [&'static str],
    /// Columns each returned row carries
    pub columns: &'static [&'static str],
}

impl QueryTemplate {
    /// Returns true if `param` is a declared placeholder
    pub fn declares(&self, param: &str) -> bool {
        self.params.contains(&param)
    }
}

/// A value bound to a query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl ParamValue {
    /// Borrow as a string, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Copy out as an integer, if this is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// A template together with its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CypherQuery {
    template: &'static QueryTemplate,
    params: BTreeMap<&'static str, ParamValue>,
}

impl CypherQuery {
    /// Start a query from a template with nothing bound
    pub fn new(template: &'static QueryTemplate) -> Self {
        Self {
            template,
            params: BTreeMap::new(),
        }
    }

    /// Bind a declared parameter
    pub fn bind(mut self, param: &str, value: impl Into<ParamValue>) -> Result<Self> {
        let declared = self
            .template
            .params
            .iter()
            .find(|p| **p == param)
            .ok_or_else(|| GraphError::UndeclaredParameter {
                template: self.template.name.to_string(),
                param: param.to_string(),
            })?;
        self.params.insert(declared, value.into());
        Ok(self)
    }

    /// Check every declared parameter has a value
    pub fn ensure_bound(&self) -> Result<()> {
        match self
            .template
            .params
            .iter()
            .find(|p| !self.params.contains_key(*p))
        {
            Some(param) => Err(GraphError::UnboundParameter {
                template: self.template.name.to_string(),
                param: param.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn template(&self) -> &'static QueryTemplate {
        self.template
    }

    pub fn name(&self) -> &'static str {
        self.template.name
    }

    pub fn text(&self) -> &'static str {
        self.template.text
    }

    pub fn params(&self) -> &BTreeMap<&'static str, ParamValue> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }
}

/// One materialized result row
///
/// This is an intermediate form only; catalog handlers decode it into their
/// declared record types straight away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.fields.insert(column.into(), value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Take a column out and decode it into `T`
    pub fn decode<T: DeserializeOwned>(&mut self, template: &str, column: &str) -> Result<T> {
        let value = self.fields.remove(column).ok_or_else(|| GraphError::Decode {
            template: template.to_string(),
            column: column.to_string(),
            reason: "column missing from row".to_string(),
        })?;
        serde_json::from_value(value).map_err(|e| GraphError::Decode {
            template: template.to_string(),
            column: column.to_string(),
            reason: e.to_string(),
        })
    }
}
