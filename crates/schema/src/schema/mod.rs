//! Schemas: a plugin plus a configuration
//!
//! A [`Schema`] is an immutable pair of a shared [`Plugin`] and a
//! [`SchemaConfig`]. Builder methods return a modified copy, so one schema
//! can be reused as the base of several others and shared between tasks.
//!
//! # Examples
//!
//! ```
//! use sval_schema::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let name = s::string()
//!     .min_length(2)
//!     .message("min_length", "Name is too short.")
//!     .transform(|value| match value {
//!         Value::Text(s) => Value::Text(s.to_uppercase()),
//!         other => other,
//!     });
//!
//! assert_eq!(name.parse("ada").await.unwrap(), Value::from("ADA"));
//!
//! let SafeParse::Error(error) = name.safe_parse("a").await.unwrap() else {
//!     panic!("expected a validation error");
//! };
//! assert_eq!(error.first().message, "Name is too short.");
//! # }
//! ```

pub mod config;
mod pipeline;

pub use config::{CustomRule, PrepareConfig, SchemaConfig, Step, TransformConfig, ValidateConfig};

use crate::foundation::{BoxError, Messages, ParseError, ValidationContext, ValidationError, Value};
use crate::plugin::{DataType, Plugin, RuleArg};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Plugin plus configuration; cheap to clone.
#[derive(Clone)]
pub struct Schema {
    plugin: Arc<Plugin>,
    config: Arc<SchemaConfig>,
}

impl Schema {
    /// Schema with an empty configuration.
    pub fn new(plugin: Arc<Plugin>) -> Self {
        Self::with_config(plugin, SchemaConfig::default())
    }

    pub fn with_config(plugin: Arc<Plugin>, config: SchemaConfig) -> Self {
        Self {
            plugin,
            config: Arc::new(config),
        }
    }

    pub fn plugin(&self) -> &Arc<Plugin> {
        &self.plugin
    }

    pub fn data_type(&self) -> DataType {
        self.plugin.data_type()
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    fn edit(mut self, f: impl FnOnce(&mut SchemaConfig)) -> Self {
        f(Arc::make_mut(&mut self.config));
        self
    }

    // ------------------------------------------------------------------------
    // Builder
    // ------------------------------------------------------------------------

    /// Enables the plugin's coercion in the prepare stage.
    #[must_use = "builder methods must be chained or built"]
    pub fn coerce(self) -> Self {
        self.edit(|config| config.prepare.coerce = true)
    }

    /// Appends a synchronous prepare step.
    #[must_use = "builder methods must be chained or built"]
    pub fn prepare<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.prepare_step(Step::new(f))
    }

    /// Appends an asynchronous prepare step.
    #[must_use = "builder methods must be chained or built"]
    pub fn prepare_async<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ParseError>> + Send + 'static,
    {
        self.prepare_step(Step::from_async(f))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn prepare_step(self, step: Step) -> Self {
        self.edit(|config| config.prepare.custom.push(step))
    }

    /// Configures a plugin rule; a second call for the same rule replaces
    /// the argument but keeps the original position.
    #[must_use = "builder methods must be chained or built"]
    pub fn check(self, rule: impl Into<String>, arg: impl Into<RuleArg>) -> Self {
        let (rule, arg) = (rule.into(), arg.into());
        self.edit(|config| {
            config.validate.rules.insert(rule, arg);
        })
    }

    /// Appends a custom rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn custom(self, rule: CustomRule) -> Self {
        self.edit(|config| config.validate.custom.push(rule))
    }

    /// Shorthand for a synchronous custom rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn refine<F>(self, name: &'static str, check: F) -> Self
    where
        F: Fn(&Value, &ValidationContext) -> bool + Send + Sync + 'static,
    {
        self.custom(CustomRule::new(name, check))
    }

    /// Appends a synchronous transform step.
    #[must_use = "builder methods must be chained or built"]
    pub fn transform<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transform_step(Step::new(f))
    }

    /// Appends an asynchronous transform step.
    #[must_use = "builder methods must be chained or built"]
    pub fn transform_async<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ParseError>> + Send + 'static,
    {
        self.transform_step(Step::from_async(f))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn transform_step(self, step: Step) -> Self {
        self.edit(|config| config.transform.custom.push(step))
    }

    /// Overrides the message of one rule, custom rules included.
    ///
    /// The override is inherited by nested schemas (object properties,
    /// array items, `json` documents and union candidates) unless they set
    /// their own message for the same rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        let (rule, message) = (rule.into(), message.into());
        self.edit(|config| config.messages.insert(rule, message))
    }

    /// Overlays a set of overrides, inherited like [`Schema::message`].
    #[must_use = "builder methods must be chained or built"]
    pub fn messages(self, messages: &Messages) -> Self {
        self.edit(|config| config.messages = config.messages.overlay(messages))
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    /// Runs the pipeline on `value` from a fresh root context.
    pub async fn parse(&self, value: impl Into<Value>) -> Result<Value, ParseError> {
        self.run(value.into(), &ValidationContext::new()).await
    }

    /// Runs the pipeline on `value` as a part of a larger validation.
    ///
    /// The context supplies the location, inherited message overrides and
    /// ambient data; its current value is ignored.
    pub async fn parse_with(
        &self,
        value: impl Into<Value>,
        ctx: &ValidationContext,
    ) -> Result<Value, ParseError> {
        self.run(value.into(), ctx).await
    }

    /// Like [`parse`](Self::parse), but returns validation failures as data.
    ///
    /// Only defects remain in the `Err` position.
    pub async fn safe_parse(&self, value: impl Into<Value>) -> Result<SafeParse, BoxError> {
        SafeParse::from_parse(self.parse(value).await)
    }

    pub async fn safe_parse_with(
        &self,
        value: impl Into<Value>,
        ctx: &ValidationContext,
    ) -> Result<SafeParse, BoxError> {
        SafeParse::from_parse(self.parse_with(value, ctx).await)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("data_type", &self.data_type())
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// SAFE PARSE
// ============================================================================

/// Outcome of [`Schema::safe_parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParse {
    Success(Value),
    Error(ValidationError),
}

impl SafeParse {
    fn from_parse(result: Result<Value, ParseError>) -> Result<Self, BoxError> {
        match result {
            Ok(value) => Ok(Self::Success(value)),
            Err(ParseError::Invalid(error)) => Ok(Self::Error(error)),
            Err(ParseError::Defect(defect)) => Err(defect),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// `"success"` or `"error"`.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Success(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<Value, ValidationError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Error(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s;

    #[test]
    fn builders_do_not_touch_the_base_schema() {
        let base = s::string();
        let strict = base.clone().min_length(3).message("min_length", "short");

        assert!(base.config().validate.rules.is_empty());
        assert!(base.config().messages.is_empty());
        assert_eq!(strict.config().validate.rules.len(), 1);
        assert_eq!(strict.config().messages.get("min_length"), Some("short"));
    }

    #[test]
    fn check_replaces_in_place() {
        let schema = s::number().gt(1).lt(10).gt(2);
        let rules: Vec<_> = schema.config().validate.rules.keys().cloned().collect();
        assert_eq!(rules, vec!["gt", "lt"]);
        assert!(matches!(schema.config().rule("gt"), Some(RuleArg::Number(n)) if *n == 2.0));
    }

    #[test]
    fn schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }

    #[tokio::test]
    async fn parse_futures_are_send() {
        let schema = s::string();
        let handle = tokio::spawn(async move { schema.parse("x").await.map_err(|e| e.to_string()) });
        assert_eq!(handle.await.unwrap(), Ok(Value::from("x")));
    }

    #[test]
    fn safe_parse_accessors() {
        let ok = SafeParse::Success(Value::from(1));
        assert!(ok.is_success());
        assert_eq!(ok.status(), "success");
        assert_eq!(ok.value(), Some(&Value::from(1)));
        assert!(ok.error().is_none());
    }
}
