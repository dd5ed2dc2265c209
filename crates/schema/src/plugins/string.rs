use super::type_mismatch;
use crate::foundation::{EngineError, ParseError, ValidationContext, Value};
use crate::plugin::{DataType, PluginDescriptor, RuleArg, RuleDef, RuleOutcome};
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

pub(super) fn descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::String)
        .rule("identity", RuleDef::check(identity, identity_message))
        .rule("min_length", RuleDef::check(min_length, min_length_message))
        .rule("max_length", RuleDef::check(max_length, max_length_message))
        .rule("length", RuleDef::check(length, length_message))
        .rule("pattern", RuleDef::check(pattern, pattern_message))
        .rule("starts_with", RuleDef::check(starts_with, starts_with_message))
        .rule("ends_with", RuleDef::check(ends_with, ends_with_message))
        .rule("json", RuleDef::asynchronous(json, json_message))
}

fn chars(value: &Value) -> usize {
    value.as_str().map_or(0, |s| s.chars().count())
}

fn identity(value: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(matches!(value, Value::Text(_)))
}

fn identity_message(ctx: &ValidationContext, _: &RuleArg) -> String {
    type_mismatch("string", ctx)
}

fn min_length(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    Ok(chars(value) >= arg.length("min_length")?)
}

fn min_length_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must be at least {arg} characters long.")
}

fn max_length(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    Ok(chars(value) <= arg.length("max_length")?)
}

fn max_length_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must be at most {arg} characters long.")
}

fn length(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    Ok(chars(value) == arg.length("length")?)
}

fn length_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must be exactly {arg} characters long.")
}

fn pattern(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    let re = arg.pattern("pattern")?;
    Ok(value.as_str().is_some_and(|s| re.is_match(s)))
}

fn pattern_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must match the pattern {arg}.")
}

fn starts_with(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    let prefix = arg.text("starts_with")?;
    Ok(value.as_str().is_some_and(|s| s.starts_with(prefix)))
}

fn starts_with_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must start with {arg}.")
}

fn ends_with(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    let suffix = arg.text("ends_with")?;
    Ok(value.as_str().is_some_and(|s| s.ends_with(suffix)))
}

fn ends_with_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must end with {arg}.")
}

/// Parses the text as JSON and validates the document against the nested
/// schema. The string itself stays the subject; the parsed document is
/// only used for validation.
fn json<'a>(
    value: &'a Value,
    arg: &'a RuleArg,
    ctx: &'a ValidationContext,
) -> BoxFuture<'a, Result<RuleOutcome, ParseError>> {
    async move {
        let schema = arg.schema("json")?;
        let Some(text) = value.as_str() else {
            return Ok(RuleOutcome::Invalid);
        };
        let document: serde_json::Value = match serde_json::from_str(text) {
            Ok(document) => document,
            Err(err) => {
                debug!(error = %err, "text is not a JSON document");
                return Ok(RuleOutcome::Invalid);
            }
        };
        schema.parse_with(Value::from(document), ctx).await?;
        Ok(RuleOutcome::Valid)
    }
    .boxed()
}

fn json_message(_: &ValidationContext, _: &RuleArg) -> String {
    "Invalid JSON.".to_owned()
}
