//! Pipeline execution
//!
//! Every parse runs three stages against one value:
//!
//! 1. **prepare**: plugin coercion (when enabled), then prepare steps in order
//! 2. **validate**: `identity` first and alone; on success every custom rule
//!    and then every configured plugin rule runs, all failures collected
//! 3. **transform**: transform steps in order on the validated value
//!
//! Nested schemas re-enter through [`Schema::run`], which returns a boxed
//! future so that recursion through container rules stays finite.

use super::Schema;
use crate::foundation::{EngineError, Issue, ParseError, ValidationContext, ValidationError, Value};
use crate::plugin::{IDENTITY, RuleArg, RuleDef, RuleOutcome};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::borrow::Cow;
use tracing::{Instrument, debug, debug_span, trace, warn};

/// Issues and replacement output gathered during the validate stage.
#[derive(Default)]
struct Collected {
    issues: Vec<Issue>,
    output: Option<Value>,
}

impl Collected {
    fn record(
        &mut self,
        code: Cow<'static, str>,
        ctx: &ValidationContext,
        result: Result<RuleOutcome, ParseError>,
        default_message: impl FnOnce() -> String,
    ) -> Result<(), ParseError> {
        match result {
            Ok(RuleOutcome::Valid) => {}
            Ok(RuleOutcome::Output(value)) => self.output = Some(value),
            Ok(RuleOutcome::Invalid) => {
                let message = match ctx.message_for(&code) {
                    Some(message) => message.to_owned(),
                    None => default_message(),
                };
                self.issues.push(Issue::new(ctx.path().clone(), code, message));
            }
            Err(ParseError::Invalid(error)) => self.issues.extend(error),
            Err(defect) => {
                warn!(rule = %code, path = %ctx.path(), "rule raised a defect");
                return Err(defect);
            }
        }
        Ok(())
    }
}

impl Schema {
    /// Runs every stage of this schema on `value`.
    pub(crate) fn run<'a>(
        &'a self,
        value: Value,
        parent: &'a ValidationContext,
    ) -> BoxFuture<'a, Result<Value, ParseError>> {
        let span = debug_span!(
            "schema.parse",
            data_type = %self.data_type(),
            path = %parent.path(),
        );

        async move {
            let ctx = parent.with_messages(&self.config.messages);

            let prepared = self.prepare_stage(value).await?;
            trace!(value = %prepared, "prepare stage complete");

            let ctx = ctx.with_value(prepared);
            let validated = self.validate_stage(&ctx).await?;
            trace!("validate stage complete");

            let output = self.transform_stage(validated).await?;
            trace!(value = %output, "transform stage complete");
            Ok(output)
        }
        .instrument(span)
        .boxed()
    }

    async fn prepare_stage(&self, mut value: Value) -> Result<Value, ParseError> {
        let prepare = &self.config.prepare;

        if prepare.coerce
            && let Some(coerce) = self.plugin.coercion()
            && let Some(coerced) = coerce(&value)
        {
            trace!(from = %value, to = %coerced, "coerced value");
            value = coerced;
        }

        for step in &prepare.custom {
            value = step.apply(value).await?;
        }
        Ok(value)
    }

    async fn validate_stage(&self, ctx: &ValidationContext) -> Result<Value, ParseError> {
        let rules = &self.config.validate.rules;

        // Misconfiguration surfaces even when the value is of the wrong type.
        let mut configured: Vec<(&str, &RuleDef, &RuleArg)> = Vec::with_capacity(rules.len());
        for (name, arg) in rules {
            if name == IDENTITY {
                continue;
            }
            let Some(rule) = self.plugin.rule(name) else {
                warn!(rule = %name, data_type = %self.data_type(), "schema configures an unknown rule");
                return Err(EngineError::UnknownRule {
                    data_type: self.data_type().to_string(),
                    rule: name.clone(),
                }
                .into());
            };
            configured.push((name.as_str(), rule, arg));
        }

        let value = ctx.value();
        let mut collected = Collected::default();

        let no_arg = RuleArg::None;
        let identity_arg = rules.get(IDENTITY).unwrap_or(&no_arg);
        let identity = self.plugin.identity();
        match identity.evaluate(value, identity_arg, ctx).await {
            Ok(RuleOutcome::Valid) => {}
            Ok(RuleOutcome::Output(output)) => collected.output = Some(output),
            Ok(RuleOutcome::Invalid) | Err(ParseError::Invalid(_)) => {
                let message = match ctx.message_for(IDENTITY) {
                    Some(message) => message.to_owned(),
                    None => identity.message(ctx, identity_arg),
                };
                debug!(received = value.type_name(), "identity rejected value");
                return Err(ValidationError::new(Issue::new(ctx.path().clone(), IDENTITY, message)).into());
            }
            Err(defect) => {
                warn!(rule = IDENTITY, path = %ctx.path(), "rule raised a defect");
                return Err(defect);
            }
        }

        for rule in &self.config.validate.custom {
            let result = rule.run(ctx).await.map(RuleOutcome::from);
            collected.record(rule.code(), ctx, result, || rule.default_message())?;
        }

        for (name, rule, arg) in configured {
            let result = rule.evaluate(value, arg, ctx).await;
            collected.record(Cow::Owned(name.to_owned()), ctx, result, || rule.message(ctx, arg))?;
        }

        if let Some(error) = ValidationError::from_issues(collected.issues) {
            debug!(issues = error.len(), "validate stage rejected value");
            return Err(error.into());
        }

        Ok(collected.output.unwrap_or_else(|| value.clone()))
    }

    async fn transform_stage(&self, mut value: Value) -> Result<Value, ParseError> {
        for step in &self.config.transform.custom {
            value = step.apply(value).await?;
        }
        Ok(value)
    }
}
