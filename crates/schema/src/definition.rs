//! Declarative schema definitions
//!
//! A [`SchemaDefinition`] describes a schema as data so that it can live in
//! a configuration file and be compiled at startup against a
//! [`PluginRegistry`].
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {
//!     "name": { "type": "string", "rules": { "min_length": 1 } },
//!     "port": { "type": "number", "coerce": true, "rules": { "integer": true, "gte": 1 } },
//!     "mode": { "type": "union", "variants": [
//!       { "type": "literal", "literal": "fast" },
//!       { "type": "literal", "literal": "safe" }
//!     ] }
//!   },
//!   "messages": { "identity": "Expected a settings object." }
//! }
//! ```
//!
//! Container rules are given as dedicated fields (`items`, `properties`,
//! `variants`, `json`) rather than inside `rules`.

use crate::foundation::{Messages, Value};
use crate::plugin::{DataType, IDENTITY, Plugin, PluginRegistry, RuleArg};
use crate::schema::Schema;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Failure to load or compile a [`SchemaDefinition`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DefinitionError {
    #[error("invalid schema definition: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("{at}: unknown data type '{data_type}'")]
    UnknownType { at: String, data_type: String },

    #[error("{at}: rule '{rule}' is not defined for data type '{data_type}'")]
    UnknownRule {
        at: String,
        data_type: String,
        rule: String,
    },

    #[error("{at}: rule '{rule}' {reason}")]
    InvalidArgument {
        at: String,
        rule: String,
        reason: &'static str,
    },

    #[error("{at}: rule '{rule}' has an invalid pattern")]
    Pattern {
        at: String,
        rule: String,
        #[source]
        source: regex::Error,
    },
}

/// Serializable description of a schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    /// Data-type tag of the plugin, e.g. `"string"`.
    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default)]
    pub coerce: bool,

    /// Scalar rule arguments keyed by rule name, in application order.
    #[serde(default)]
    pub rules: IndexMap<String, serde_json::Value>,

    #[serde(default)]
    pub messages: Messages,

    #[serde(default)]
    pub items: Option<Box<SchemaDefinition>>,

    #[serde(default)]
    pub properties: Option<IndexMap<String, SchemaDefinition>>,

    #[serde(default)]
    pub variants: Option<Vec<SchemaDefinition>>,

    #[serde(default)]
    pub json: Option<Box<SchemaDefinition>>,

    /// Expected value of a `literal` schema.
    #[serde(default)]
    pub literal: Option<serde_json::Value>,
}

impl SchemaDefinition {
    pub fn from_json(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Compiles against the builtin plugins.
    pub fn compile(&self) -> Result<Schema, DefinitionError> {
        self.compile_with(PluginRegistry::builtin())
    }

    /// Compiles against `registry`, which may hold caller plugins.
    pub fn compile_with(&self, registry: &PluginRegistry) -> Result<Schema, DefinitionError> {
        let schema = self.compile_at(registry, "$")?;
        debug!(data_type = %schema.data_type(), "compiled schema definition");
        Ok(schema)
    }

    fn compile_at(&self, registry: &PluginRegistry, at: &str) -> Result<Schema, DefinitionError> {
        let plugin = registry
            .find(&self.data_type)
            .cloned()
            .ok_or_else(|| DefinitionError::UnknownType {
                at: at.to_owned(),
                data_type: self.data_type.clone(),
            })?;
        let mut schema = Schema::new(Arc::clone(&plugin)).messages(&self.messages);
        if self.coerce {
            schema = schema.coerce();
        }

        if let Some(literal) = &self.literal {
            schema = schema.check(IDENTITY, RuleArg::Value(Value::from(literal.clone())));
        }

        for (rule, raw) in &self.rules {
            require_rule(&plugin, rule, at)?;
            let arg = scalar_arg(plugin.data_type(), rule, raw, at)?;
            schema = schema.check(rule.clone(), arg);
        }

        if let Some(items) = &self.items {
            require_rule(&plugin, "items", at)?;
            schema = schema.check("items", items.compile_at(registry, &format!("{at}.items"))?);
        }

        if let Some(json) = &self.json {
            require_rule(&plugin, "json", at)?;
            schema = schema.check("json", json.compile_at(registry, &format!("{at}.json"))?);
        }

        if let Some(properties) = &self.properties {
            require_rule(&plugin, "properties", at)?;
            let mut compiled = IndexMap::with_capacity(properties.len());
            for (key, definition) in properties {
                let nested = definition.compile_at(registry, &format!("{at}.properties.{key}"))?;
                compiled.insert(key.clone(), nested);
            }
            schema = schema.check("properties", compiled);
        }

        if let Some(variants) = &self.variants {
            require_rule(&plugin, "variants", at)?;
            let compiled = variants
                .iter()
                .enumerate()
                .map(|(i, definition)| definition.compile_at(registry, &format!("{at}.variants[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            schema = schema.check("variants", compiled);
        }

        Ok(schema)
    }
}

fn require_rule(plugin: &Plugin, rule: &str, at: &str) -> Result<(), DefinitionError> {
    if plugin.rule(rule).is_some() {
        Ok(())
    } else {
        Err(DefinitionError::UnknownRule {
            at: at.to_owned(),
            data_type: plugin.data_type().to_string(),
            rule: rule.to_owned(),
        })
    }
}

/// Maps a JSON rule argument to the shape the builtin rules expect.
fn scalar_arg(
    data_type: DataType,
    rule: &str,
    raw: &serde_json::Value,
    at: &str,
) -> Result<RuleArg, DefinitionError> {
    let invalid = |reason| DefinitionError::InvalidArgument {
        at: at.to_owned(),
        rule: rule.to_owned(),
        reason,
    };

    match (rule, raw) {
        ("pattern", serde_json::Value::String(source)) => Regex::new(source)
            .map(RuleArg::Pattern)
            .map_err(|source| DefinitionError::Pattern {
                at: at.to_owned(),
                rule: rule.to_owned(),
                source,
            }),
        ("pattern", _) => Err(invalid("expects a regular expression string")),
        ("gt" | "gte" | "lt" | "lte", _) if data_type == DataType::BigInt => match raw {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(|n| RuleArg::BigInt(i128::from(n)))
                .ok_or_else(|| invalid("expects an integral bound")),
            serde_json::Value::String(s) => s
                .parse::<i128>()
                .map(RuleArg::BigInt)
                .map_err(|_| invalid("expects an integral bound")),
            _ => Err(invalid("expects an integral bound")),
        },
        (_, serde_json::Value::Null) => Ok(RuleArg::None),
        (_, serde_json::Value::Bool(b)) => Ok(RuleArg::Bool(*b)),
        (_, serde_json::Value::Number(n)) => n
            .as_f64()
            .map(RuleArg::Number)
            .ok_or_else(|| invalid("expects a finite number")),
        (_, serde_json::Value::String(s)) => Ok(RuleArg::Text(s.clone())),
        (_, other) => Ok(RuleArg::Value(Value::from(other.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_fields() {
        let err = SchemaDefinition::from_json(r#"{"type": "string", "rule": {}}"#).unwrap_err();
        assert!(matches!(err, DefinitionError::Syntax(_)));
    }

    #[test]
    fn bigint_bounds_are_integral() {
        let arg = scalar_arg(DataType::BigInt, "gt", &serde_json::json!("170141183460469231731687303715884105727"), "$")
            .unwrap();
        assert!(matches!(arg, RuleArg::BigInt(i128::MAX)));
        assert!(scalar_arg(DataType::BigInt, "gt", &serde_json::json!(1.5), "$").is_err());
        assert!(matches!(
            scalar_arg(DataType::Number, "gt", &serde_json::json!(1.5), "$"),
            Ok(RuleArg::Number(n)) if n == 1.5
        ));
    }

    #[test]
    fn bad_pattern_keeps_location() {
        let definition = SchemaDefinition::from_value(serde_json::json!({
            "type": "object",
            "properties": { "code": { "type": "string", "rules": { "pattern": "(" } } }
        }))
        .unwrap();
        let err = definition.compile().unwrap_err();
        assert!(matches!(&err, DefinitionError::Pattern { at, .. } if at == "$.properties.code"));
    }
}
