//! Prelude module for convenient imports.
//!
//! ```rust
//! use sval_schema::prelude::*;
//!
//! let port = s::number().coerce().integer().gte(1).lte(65535);
//! # let _ = port;
//! ```

// ============================================================================
// FOUNDATION: Values, context, errors
// ============================================================================

pub use crate::foundation::{
    BoxError, Issue, Messages, ParseError, Path, PathSegment, ValidationContext, ValidationError,
    Value,
};

// ============================================================================
// SCHEMAS: Engine, configuration, factories
// ============================================================================

pub use crate::s;
pub use crate::schema::{CustomRule, SafeParse, Schema, SchemaConfig, Step};

// ============================================================================
// PLUGINS: Extension points
// ============================================================================

pub use crate::plugin::{
    DataType, PluginDescriptor, PluginRegistry, RuleArg, RuleDef, RuleOutcome, define_plugin,
};

// ============================================================================
// DEFINITIONS: Declarative loading
// ============================================================================

pub use crate::definition::{DefinitionError, SchemaDefinition};
