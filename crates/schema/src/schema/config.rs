//! Schema configuration
//!
//! A [`SchemaConfig`] mirrors the three pipeline stages plus message
//! overrides:
//!
//! - `prepare`: optional plugin coercion, then caller [`Step`]s in order
//! - `validate`: rule arguments keyed by rule name, plus [`CustomRule`]s
//! - `transform`: caller [`Step`]s applied to the validated value
//! - `messages`: rule name → override text
//!
//! Configs are usually filled through the builder methods on
//! [`Schema`](crate::schema::Schema) rather than by hand.

use crate::foundation::{Messages, ParseError, ValidationContext, Value};
use crate::plugin::RuleArg;
use futures::FutureExt;
use futures::future::{BoxFuture, ready};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// STEP
// ============================================================================

type StepFn = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, ParseError>> + Send + Sync>;

/// One prepare or transform function.
///
/// # Examples
///
/// ```
/// use sval_schema::foundation::Value;
/// use sval_schema::schema::Step;
///
/// let trim = Step::new(|value| match value {
///     Value::Text(s) => Value::Text(s.trim().to_owned()),
///     other => other,
/// });
/// let lookup = Step::from_async(|value| async move { Ok(value) });
/// # let _ = (trim, lookup);
/// ```
#[derive(Clone)]
pub struct Step {
    apply: StepFn,
}

impl Step {
    /// Synchronous, infallible step.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            apply: Arc::new(move |value| ready(Ok(f(value))).boxed()),
        }
    }

    /// Asynchronous step; an `Err` other than [`ParseError::Invalid`] is a defect.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ParseError>> + Send + 'static,
    {
        Self {
            apply: Arc::new(move |value| f(value).boxed()),
        }
    }

    pub(crate) fn apply(&self, value: Value) -> BoxFuture<'static, Result<Value, ParseError>> {
        (self.apply)(value)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Step(<function>)")
    }
}

// ============================================================================
// CUSTOM RULE
// ============================================================================

type CustomFn =
    Arc<dyn Fn(Value, ValidationContext) -> BoxFuture<'static, Result<bool, ParseError>> + Send + Sync>;

/// Caller-supplied named rule, run in the validate stage.
///
/// Returning `false` records one issue under the rule's name. Returning
/// `Err(ParseError::Invalid(_))` records the carried issues; any other error
/// aborts the parse as a defect.
#[derive(Clone)]
pub struct CustomRule {
    name: Cow<'static, str>,
    validator: CustomFn,
    message: Option<String>,
}

impl CustomRule {
    /// Synchronous check.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, check: F) -> Self
    where
        F: Fn(&Value, &ValidationContext) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            validator: Arc::new(move |value, ctx| ready(Ok(check(&value, &ctx))).boxed()),
            message: None,
        }
    }

    /// Asynchronous, fallible validator.
    pub fn from_async<F, Fut>(name: impl Into<Cow<'static, str>>, validator: F) -> Self
    where
        F: Fn(Value, ValidationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, ParseError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            validator: Arc::new(move |value, ctx| validator(value, ctx).boxed()),
            message: None,
        }
    }

    /// Default message, used when no override exists for the rule name.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn code(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    pub(crate) fn default_message(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!("Custom rule '{}' failed.", self.name),
        }
    }

    pub(crate) fn run(&self, ctx: &ValidationContext) -> BoxFuture<'static, Result<bool, ParseError>> {
        (self.validator)(ctx.value().clone(), ctx.clone())
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// STAGE CONFIGS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PrepareConfig {
    /// Attempt the plugin's lossless coercion before custom steps.
    pub coerce: bool,
    pub custom: Vec<Step>,
}

#[derive(Debug, Clone, Default)]
pub struct ValidateConfig {
    /// Rule arguments keyed by rule name, in configuration order.
    pub rules: IndexMap<String, RuleArg>,
    pub custom: Vec<CustomRule>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformConfig {
    pub custom: Vec<Step>,
}

/// Full configuration of one schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaConfig {
    pub prepare: PrepareConfig,
    pub validate: ValidateConfig,
    pub transform: TransformConfig,
    pub messages: Messages,
}

impl SchemaConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Argument configured for `rule`.
    pub fn rule(&self, rule: &str) -> Option<&RuleArg> {
        self.validate.rules.get(rule)
    }
}
