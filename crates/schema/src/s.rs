//! Schema factories
//!
//! Short constructors for the builtin plugins, plus shorthand builder
//! methods that set the same-named rule argument.
//!
//! ```
//! use sval_schema::s;
//!
//! let user = s::object([
//!     ("name", s::string().min_length(1)),
//!     ("tags", s::array(s::string()).max_length(8)),
//!     ("id", s::union([s::string(), s::number().integer()])),
//! ]);
//! # let _ = user;
//! ```

use crate::foundation::Value;
use crate::plugin::{IDENTITY, RuleArg};
use crate::plugins;
use crate::schema::Schema;
use indexmap::IndexMap;
use regex::Regex;

pub fn string() -> Schema {
    Schema::new(plugins::string())
}

pub fn number() -> Schema {
    Schema::new(plugins::number())
}

pub fn bigint() -> Schema {
    Schema::new(plugins::bigint())
}

pub fn nan() -> Schema {
    Schema::new(plugins::nan())
}

pub fn boolean() -> Schema {
    Schema::new(plugins::boolean())
}

/// Array whose elements all satisfy `item`.
pub fn array(item: Schema) -> Schema {
    Schema::new(plugins::array()).items(item)
}

/// Set whose elements all satisfy `item`.
pub fn set(item: Schema) -> Schema {
    Schema::new(plugins::set()).items(item)
}

/// Object with the given property schemas, validated in declaration order.
pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Schema)>) -> Schema {
    Schema::new(plugins::object()).properties(properties)
}

/// Exactly `value`.
pub fn literal(value: impl Into<Value>) -> Schema {
    Schema::new(plugins::literal()).check(IDENTITY, RuleArg::Value(value.into()))
}

/// First of `variants` that accepts the value.
pub fn union(variants: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::new(plugins::union()).of(variants)
}

impl Schema {
    /// Minimum length: characters for strings, elements for arrays.
    #[must_use = "builder methods must be chained or built"]
    pub fn min_length(self, n: usize) -> Self {
        self.check("min_length", n)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max_length(self, n: usize) -> Self {
        self.check("max_length", n)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn length(self, n: usize) -> Self {
        self.check("length", n)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn pattern(self, re: Regex) -> Self {
        self.check("pattern", re)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.check("starts_with", RuleArg::Text(prefix.into()))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.check("ends_with", RuleArg::Text(suffix.into()))
    }

    /// The string must hold a JSON document accepted by `schema`.
    #[must_use = "builder methods must be chained or built"]
    pub fn json(self, schema: Schema) -> Self {
        self.check("json", schema)
    }

    /// Bounds take `f64`/`i32` on number schemas and `i128` on bigint ones.
    #[must_use = "builder methods must be chained or built"]
    pub fn gt(self, bound: impl Into<RuleArg>) -> Self {
        self.check("gt", bound)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn gte(self, bound: impl Into<RuleArg>) -> Self {
        self.check("gte", bound)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn lt(self, bound: impl Into<RuleArg>) -> Self {
        self.check("lt", bound)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn lte(self, bound: impl Into<RuleArg>) -> Self {
        self.check("lte", bound)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn integer(self) -> Self {
        self.check("integer", true)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn includes(self, element: impl Into<Value>) -> Self {
        self.check("includes", RuleArg::Value(element.into()))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn items(self, item: Schema) -> Self {
        self.check("items", item)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn properties<K: Into<String>>(self, properties: impl IntoIterator<Item = (K, Schema)>) -> Self {
        let properties: IndexMap<String, Schema> = properties
            .into_iter()
            .map(|(key, schema)| (key.into(), schema))
            .collect();
        self.check("properties", properties)
    }

    /// Union candidates, tried in order.
    #[must_use = "builder methods must be chained or built"]
    pub fn of(self, variants: impl IntoIterator<Item = Schema>) -> Self {
        self.check("variants", variants.into_iter().collect::<Vec<_>>())
    }
}
