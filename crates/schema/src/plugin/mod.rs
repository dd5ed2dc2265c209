//! Plugins: data-type tags bound to rule tables
//!
//! A [`Plugin`] is an immutable rule table for one [`DataType`]. Every plugin
//! carries the mandatory `identity` rule, the type-membership test that the
//! pipeline runs before anything else, plus any number of named rules whose
//! parameters come from the schema configuration under the same name.
//!
//! Plugins are built with [`PluginDescriptor`] and sealed by
//! [`define_plugin`], which refuses a table without `identity`.
//!
//! # Examples
//!
//! ```
//! use sval_schema::plugin::{define_plugin, DataType, PluginDescriptor, RuleDef};
//!
//! let even = define_plugin(
//!     PluginDescriptor::new(DataType::Custom("even"))
//!         .rule("identity", RuleDef::check(
//!             |value, _| Ok(value.as_f64().is_some_and(|n| n % 2.0 == 0.0)),
//!             |ctx, _| format!("Expected an even number, received {}.", ctx.value()),
//!         )),
//! )
//! .unwrap();
//! assert_eq!(even.data_type().as_str(), "even");
//! ```

pub mod registry;

pub use registry::{PluginRegistry, PluginRegistryBuilder};

use crate::foundation::{EngineError, ParseError, PluginError, ValidationContext, Value};
use crate::schema::Schema;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Name of the mandatory type-membership rule.
pub const IDENTITY: &str = "identity";

// ============================================================================
// DATA TYPE
// ============================================================================

/// Closed set of data-type tags, plus an escape hatch for caller plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Number,
    BigInt,
    NaN,
    Boolean,
    Array,
    Object,
    Set,
    Literal,
    Union,
    /// Caller-defined plugin.
    Custom(&'static str),
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::NaN => "nan",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Set => "set",
            Self::Literal => "literal",
            Self::Union => "union",
            Self::Custom(tag) => tag,
        }
    }

    /// Builtin tag for `name`, if any.
    pub fn builtin(name: &str) -> Option<Self> {
        Some(match name {
            "string" => Self::String,
            "number" => Self::Number,
            "bigint" => Self::BigInt,
            "nan" => Self::NaN,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            "set" => Self::Set,
            "literal" => Self::Literal,
            "union" => Self::Union,
            _ => return None,
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RULE ARGUMENTS
// ============================================================================

/// Parameter handed to a rule, taken from the schema configuration.
#[derive(Debug, Clone)]
pub enum RuleArg {
    /// Rule configured without a parameter.
    None,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    Length(usize),
    Text(String),
    Value(Value),
    Pattern(Regex),
    Schema(Box<Schema>),
    Schemas(Vec<Schema>),
    Properties(IndexMap<String, Schema>),
}

impl RuleArg {
    /// Shape name used in [`EngineError::InvalidArgument`].
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "nothing",
            Self::Bool(_) => "a boolean",
            Self::Number(_) => "a number",
            Self::BigInt(_) => "a bigint",
            Self::Length(_) => "a length",
            Self::Text(_) => "text",
            Self::Value(_) => "a value",
            Self::Pattern(_) => "a pattern",
            Self::Schema(_) => "a schema",
            Self::Schemas(_) => "a schema list",
            Self::Properties(_) => "a property map",
        }
    }

    fn mismatch(&self, rule: &'static str, expected: &'static str) -> EngineError {
        EngineError::InvalidArgument {
            rule: Cow::Borrowed(rule),
            expected,
            actual: self.kind(),
        }
    }

    pub fn number(&self, rule: &'static str) -> Result<f64, EngineError> {
        match self {
            Self::Number(n) => Ok(*n),
            _ => Err(self.mismatch(rule, "a number")),
        }
    }

    pub fn bigint(&self, rule: &'static str) -> Result<i128, EngineError> {
        match self {
            Self::BigInt(n) => Ok(*n),
            _ => Err(self.mismatch(rule, "a bigint")),
        }
    }

    /// Lengths also accept non-negative integral numbers.
    pub fn length(&self, rule: &'static str) -> Result<usize, EngineError> {
        match self {
            Self::Length(n) => Ok(*n),
            Self::Number(n) if n.fract() == 0.0 && *n >= 0.0 => Ok(*n as usize),
            _ => Err(self.mismatch(rule, "a length")),
        }
    }

    pub fn text(&self, rule: &'static str) -> Result<&str, EngineError> {
        match self {
            Self::Text(s) => Ok(s),
            _ => Err(self.mismatch(rule, "text")),
        }
    }

    pub fn flag(&self, rule: &'static str) -> Result<bool, EngineError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::None => Ok(true),
            _ => Err(self.mismatch(rule, "a boolean")),
        }
    }

    pub fn pattern(&self, rule: &'static str) -> Result<&Regex, EngineError> {
        match self {
            Self::Pattern(re) => Ok(re),
            _ => Err(self.mismatch(rule, "a pattern")),
        }
    }

    /// Any value; text, numbers and booleans are promoted.
    pub fn value(&self, rule: &'static str) -> Result<Value, EngineError> {
        match self {
            Self::Value(v) => Ok(v.clone()),
            Self::Text(s) => Ok(Value::Text(s.clone())),
            Self::Number(n) => Ok(Value::Number(*n)),
            Self::BigInt(n) => Ok(Value::BigInt(*n)),
            Self::Bool(b) => Ok(Value::Boolean(*b)),
            _ => Err(self.mismatch(rule, "a value")),
        }
    }

    pub fn schema(&self, rule: &'static str) -> Result<&Schema, EngineError> {
        match self {
            Self::Schema(schema) => Ok(schema),
            _ => Err(self.mismatch(rule, "a schema")),
        }
    }

    pub fn schemas(&self, rule: &'static str) -> Result<&[Schema], EngineError> {
        match self {
            Self::Schemas(schemas) => Ok(schemas),
            _ => Err(self.mismatch(rule, "a schema list")),
        }
    }

    pub fn properties(&self, rule: &'static str) -> Result<&IndexMap<String, Schema>, EngineError> {
        match self {
            Self::Properties(props) => Ok(props),
            _ => Err(self.mismatch(rule, "a property map")),
        }
    }
}

impl fmt::Display for RuleArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::Length(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Value(v) => write!(f, "{v}"),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
            Self::Schema(schema) => write!(f, "<{} schema>", schema.data_type()),
            Self::Schemas(schemas) => write!(f, "<{} schemas>", schemas.len()),
            Self::Properties(props) => write!(f, "<{} properties>", props.len()),
        }
    }
}

impl From<bool> for RuleArg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for RuleArg {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for RuleArg {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<usize> for RuleArg {
    fn from(v: usize) -> Self {
        Self::Length(v)
    }
}

impl From<i128> for RuleArg {
    fn from(v: i128) -> Self {
        Self::BigInt(v)
    }
}

impl From<&str> for RuleArg {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for RuleArg {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Value> for RuleArg {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<Regex> for RuleArg {
    fn from(v: Regex) -> Self {
        Self::Pattern(v)
    }
}

impl From<Schema> for RuleArg {
    fn from(v: Schema) -> Self {
        Self::Schema(Box::new(v))
    }
}

impl From<Vec<Schema>> for RuleArg {
    fn from(v: Vec<Schema>) -> Self {
        Self::Schemas(v)
    }
}

impl From<IndexMap<String, Schema>> for RuleArg {
    fn from(v: IndexMap<String, Schema>) -> Self {
        Self::Properties(v)
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Result of a passing or failing rule.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Valid,
    Invalid,
    /// Valid, and the subject is replaced by this value for later stages.
    Output(Value),
}

impl RuleOutcome {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl From<bool> for RuleOutcome {
    fn from(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }
}

/// Synchronous check. Errors are configuration defects.
pub type CheckFn = fn(&Value, &RuleArg) -> Result<bool, EngineError>;

/// Asynchronous rule with access to the context, able to recurse into
/// nested schemas and to raise aggregated issues.
pub type AsyncRuleFn = for<'a> fn(
    &'a Value,
    &'a RuleArg,
    &'a ValidationContext,
) -> BoxFuture<'a, Result<RuleOutcome, ParseError>>;

/// Default message producer.
pub type MessageFn = fn(&ValidationContext, &RuleArg) -> String;

/// Lossless coercion; `None` leaves the value untouched.
pub type CoerceFn = fn(&Value) -> Option<Value>;

#[derive(Clone, Copy)]
enum RuleValidator {
    Check(CheckFn),
    Async(AsyncRuleFn),
}

/// A rule: validator plus default message.
#[derive(Clone, Copy)]
pub struct RuleDef {
    validator: RuleValidator,
    message: MessageFn,
}

impl RuleDef {
    pub const fn check(validator: CheckFn, message: MessageFn) -> Self {
        Self {
            validator: RuleValidator::Check(validator),
            message,
        }
    }

    pub const fn asynchronous(validator: AsyncRuleFn, message: MessageFn) -> Self {
        Self {
            validator: RuleValidator::Async(validator),
            message,
        }
    }

    /// Runs the validator against `value`.
    pub async fn evaluate(
        &self,
        value: &Value,
        arg: &RuleArg,
        ctx: &ValidationContext,
    ) -> Result<RuleOutcome, ParseError> {
        match self.validator {
            RuleValidator::Check(check) => Ok(check(value, arg)?.into()),
            RuleValidator::Async(rule) => rule(value, arg, ctx).await,
        }
    }

    /// Default message for a failure in `ctx`.
    pub fn message(&self, ctx: &ValidationContext, arg: &RuleArg) -> String {
        (self.message)(ctx, arg)
    }

    pub fn is_async(&self) -> bool {
        matches!(self.validator, RuleValidator::Async(_))
    }
}

impl fmt::Debug for RuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDef")
            .field("async", &self.is_async())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PLUGIN
// ============================================================================

/// Unsealed plugin table handed to [`define_plugin`].
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    data_type: DataType,
    validate: IndexMap<&'static str, RuleDef>,
    coerce: Option<CoerceFn>,
}

impl PluginDescriptor {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            validate: IndexMap::new(),
            coerce: None,
        }
    }

    /// Adds or replaces a rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, name: &'static str, rule: RuleDef) -> Self {
        self.validate.insert(name, rule);
        self
    }

    /// Sets the coercion used when a schema enables `coerce`.
    #[must_use = "builder methods must be chained or built"]
    pub fn coerce(mut self, coerce: CoerceFn) -> Self {
        self.coerce = Some(coerce);
        self
    }
}

/// Sealed, immutable rule table for one data type.
#[derive(Debug)]
pub struct Plugin {
    data_type: DataType,
    identity: RuleDef,
    rules: IndexMap<&'static str, RuleDef>,
    coerce: Option<CoerceFn>,
}

impl Plugin {
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn identity(&self) -> &RuleDef {
        &self.identity
    }

    /// Looks up a rule by name, `identity` included.
    pub fn rule(&self, name: &str) -> Option<&RuleDef> {
        if name == IDENTITY {
            Some(&self.identity)
        } else {
            self.rules.get(name)
        }
    }

    /// Names of the non-identity rules, in definition order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    pub fn coercion(&self) -> Option<CoerceFn> {
        self.coerce
    }
}

/// Seals a descriptor into a shareable plugin.
///
/// Fails with [`PluginError::MissingIdentity`] when the table has no
/// `identity` rule, and with [`PluginError::ReservedTag`] when a
/// [`DataType::Custom`] tag names a builtin data type.
pub fn define_plugin(descriptor: PluginDescriptor) -> Result<Arc<Plugin>, PluginError> {
    let PluginDescriptor {
        data_type,
        mut validate,
        coerce,
    } = descriptor;

    if let DataType::Custom(tag) = data_type
        && DataType::builtin(tag).is_some()
    {
        return Err(PluginError::ReservedTag(tag.to_owned()));
    }

    let identity = validate
        .shift_remove(IDENTITY)
        .ok_or_else(|| PluginError::MissingIdentity(data_type.to_string()))?;

    Ok(Arc::new(Plugin {
        data_type,
        identity,
        rules: validate,
        coerce,
    }))
}
