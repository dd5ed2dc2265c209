//! `array` and `set` plugins.

use super::{type_mismatch, validate_members};
use crate::foundation::{EngineError, ParseError, ValidationContext, Value};
use crate::plugin::{DataType, PluginDescriptor, RuleArg, RuleDef, RuleOutcome};
use futures::FutureExt;
use futures::future::BoxFuture;

pub(super) fn array_descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::Array)
        .rule("identity", RuleDef::check(array_identity, array_identity_message))
        .rule("items", RuleDef::asynchronous(items, items_message))
        .rule("min_length", RuleDef::check(min_length, min_length_message))
        .rule("max_length", RuleDef::check(max_length, max_length_message))
        .rule("includes", RuleDef::check(includes, includes_message))
}

pub(super) fn set_descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::Set)
        .rule("identity", RuleDef::check(set_identity, set_identity_message))
        .rule("items", RuleDef::asynchronous(items, items_message))
        .rule("includes", RuleDef::check(includes, includes_message))
}

fn array_identity(value: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(matches!(value, Value::Array(_)))
}

fn array_identity_message(ctx: &ValidationContext, _: &RuleArg) -> String {
    type_mismatch("array", ctx)
}

fn set_identity(value: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(matches!(value, Value::Set(_)))
}

fn set_identity_message(ctx: &ValidationContext, _: &RuleArg) -> String {
    type_mismatch("set", ctx)
}

fn len(value: &Value) -> usize {
    value.as_elements().map_or(0, <[Value]>::len)
}

/// Validates every element against the item schema, located by index.
/// Set elements are indexed by insertion order.
fn items<'a>(
    value: &'a Value,
    arg: &'a RuleArg,
    ctx: &'a ValidationContext,
) -> BoxFuture<'a, Result<RuleOutcome, ParseError>> {
    async move {
        let schema = arg.schema("items")?;
        let Some(elements) = value.as_elements() else {
            return Ok(RuleOutcome::Invalid);
        };
        let members = elements
            .iter()
            .enumerate()
            .map(|(index, element)| (index, schema, element.clone()))
            .collect::<Vec<_>>();
        validate_members(ctx, members).await
    }
    .boxed()
}

fn items_message(_: &ValidationContext, _: &RuleArg) -> String {
    "Invalid items.".to_owned()
}

fn min_length(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    Ok(len(value) >= arg.length("min_length")?)
}

fn min_length_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must contain at least {arg} items.")
}

fn max_length(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    Ok(len(value) <= arg.length("max_length")?)
}

fn max_length_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must contain at most {arg} items.")
}

fn includes(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    let needle = arg.value("includes")?;
    Ok(value.as_elements().is_some_and(|items| items.contains(&needle)))
}

fn includes_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must include {arg}.")
}

#[cfg(test)]
mod tests {
    use crate::foundation::{Path, Value};
    use crate::s;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn element_issues_are_indexed() {
        let schema = s::array(s::number());
        let input = Value::from(vec![Value::from(1), Value::from("2"), Value::from(3), Value::Null]);
        let error = schema.parse(input).await.unwrap_err().into_validation().unwrap();

        let paths: Vec<_> = error.issues().iter().map(|i| i.path.clone()).collect();
        assert_eq!(paths, vec![Path::root().join(1_usize), Path::root().join(3_usize)]);
    }

    #[tokio::test]
    async fn length_and_includes_collect_together() {
        let schema = s::array(s::string()).min_length(3).includes("x");
        let error = schema
            .parse(Value::from(vec![Value::from("a")]))
            .await
            .unwrap_err()
            .into_validation()
            .unwrap();

        let codes: Vec<_> = error.issues().iter().map(|i| i.code.as_ref()).collect();
        assert_eq!(codes, vec!["min_length", "includes"]);
        assert_eq!(error.first().message, "Must contain at least 3 items.");
    }

    #[tokio::test]
    async fn set_is_not_an_array() {
        let schema = s::set(s::number());
        assert!(schema.parse(Value::set([Value::from(1), Value::from(1)])).await.is_ok());

        let error = schema.parse(Value::Array(vec![])).await.unwrap_err().into_validation().unwrap();
        assert_eq!(error.first().message, "Invalid type. Expected set, received array.");
    }

    #[tokio::test]
    async fn set_items_and_includes() {
        let schema = s::set(s::number()).includes(2);
        let error = schema
            .parse(Value::set([Value::from(1), Value::from("x")]))
            .await
            .unwrap_err()
            .into_validation()
            .unwrap();
        let codes: Vec<_> = error.issues().iter().map(|i| i.code.as_ref()).collect();
        assert_eq!(codes, vec!["identity", "includes"]);
        assert_eq!(error.first().path, Path::root().join(1_usize));
    }
}
