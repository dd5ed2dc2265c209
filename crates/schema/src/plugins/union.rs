//! `union` plugin: the first candidate schema that accepts the value wins.

use crate::foundation::{EngineError, ParseError, ValidationContext, ValidationError, Value};
use crate::plugin::{DataType, PluginDescriptor, RuleArg, RuleDef, RuleOutcome};
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

pub(super) fn descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::Union)
        .rule("identity", RuleDef::check(identity, identity_message))
        .rule("variants", RuleDef::asynchronous(variants, variants_message))
}

fn identity(_: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(true)
}

fn identity_message(_: &ValidationContext, _: &RuleArg) -> String {
    "is any".to_owned()
}

/// Tries candidates in declared order under the union's own context, so
/// no path segment is added. The winner's output replaces the value; if
/// none wins, the issues of every candidate are raised in order.
fn variants<'a>(
    value: &'a Value,
    arg: &'a RuleArg,
    ctx: &'a ValidationContext,
) -> BoxFuture<'a, Result<RuleOutcome, ParseError>> {
    async move {
        let candidates = arg.schemas("variants")?;
        let mut issues = Vec::new();
        for (index, candidate) in candidates.iter().enumerate() {
            match candidate.parse_with(value.clone(), ctx).await {
                Ok(output) => return Ok(RuleOutcome::Output(output)),
                Err(ParseError::Invalid(error)) => {
                    debug!(
                        variant = index,
                        data_type = %candidate.data_type(),
                        issues = error.len(),
                        "union candidate rejected value"
                    );
                    issues.extend(error);
                }
                Err(defect) => return Err(defect),
            }
        }
        match ValidationError::from_issues(issues) {
            Some(error) => Err(error.into()),
            None => Ok(RuleOutcome::Invalid),
        }
    }
    .boxed()
}

fn variants_message(_: &ValidationContext, _: &RuleArg) -> String {
    "No union variant matched the provided value.".to_owned()
}
