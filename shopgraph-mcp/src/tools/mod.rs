//! MCP Tool definitions
//!
//! These are the tools exposed to agents through the MCP protocol. Each
//! [`ToolSpec`] declares its parameters once; the JSON Schema advertised in
//! `tools/list` and the argument validation in [`args`] are both derived
//! from that declaration.

pub mod args;
pub mod customer;
pub mod recommend;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use shopgraph_core::QueryTemplate;

pub use args::{ArgValue, Arguments};

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description shown to the agent
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Primitive parameter types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
}

impl ParamKind {
    fn schema_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
        }
    }
}

/// One declared tool parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
    /// Substituted when an optional parameter is absent
    pub default: Option<ArgValue>,
    /// Strings: reject ""
    pub non_empty: bool,
    /// Integers: inclusive bounds
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
}

impl ParamSpec {
    /// A required parameter
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            default: None,
            non_empty: false,
            minimum: None,
            maximum: None,
        }
    }

    /// An optional parameter with a default
    pub fn optional(
        name: &'static str,
        kind: ParamKind,
        description: &'static str,
        default: ArgValue,
    ) -> Self {
        Self {
            required: false,
            default: Some(default),
            ..Self::required(name, kind, description)
        }
    }

    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.kind.schema_type()));
        schema.insert("description".into(), json!(self.description));
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.to_json());
        }
        if self.non_empty {
            schema.insert("minLength".into(), json!(1));
        }
        if let Some(min) = self.minimum {
            schema.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.maximum {
            schema.insert("maximum".into(), json!(max));
        }
        Value::Object(schema)
    }
}

/// Which handler serves a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    SearchCustomer,
    RecommendProduct,
}

/// Immutable descriptor of one catalog entry
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
    pub template: &'static QueryTemplate,
    pub kind: ToolKind,
}

impl ToolSpec {
    /// Look up a declared parameter
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// The MCP definition advertised in `tools/list`
    pub fn definition(&self) -> ToolDefinition {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: json!({
                "type": "object",
                "properties": properties,
                "required": required
            }),
        }
    }
}

/// The fixed set of tools, keyed by name
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: BTreeMap<&'static str, ToolSpec>,
}

impl ToolCatalog {
    /// The standard commerce catalog
    pub fn standard() -> Self {
        Self::from_specs(vec![
            customer::search_customer_tool(),
            recommend::recommend_product_tool(),
        ])
    }

    fn from_specs(specs: Vec<ToolSpec>) -> Self {
        Self {
            tools: specs.into_iter().map(|s| (s.name, s)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(ToolSpec::definition).collect()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
