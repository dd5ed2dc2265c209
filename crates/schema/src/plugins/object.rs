use super::{type_mismatch, validate_members};
use crate::foundation::{EngineError, ParseError, ValidationContext, Value};
use crate::plugin::{DataType, PluginDescriptor, RuleArg, RuleDef, RuleOutcome};
use futures::FutureExt;
use futures::future::BoxFuture;

pub(super) fn descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::Object)
        .rule("identity", RuleDef::check(identity, identity_message))
        .rule("properties", RuleDef::asynchronous(properties, properties_message))
}

fn identity(value: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(matches!(value, Value::Object(_)))
}

fn identity_message(ctx: &ValidationContext, _: &RuleArg) -> String {
    type_mismatch("object", ctx)
}

/// Validates each declared property; an absent key is validated as `Null`.
/// Keys without a declared schema are ignored.
fn properties<'a>(
    value: &'a Value,
    arg: &'a RuleArg,
    ctx: &'a ValidationContext,
) -> BoxFuture<'a, Result<RuleOutcome, ParseError>> {
    async move {
        let props = arg.properties("properties")?;
        let Some(object) = value.as_object() else {
            return Ok(RuleOutcome::Invalid);
        };
        let members = props
            .iter()
            .map(|(key, schema)| (key.as_str(), schema, object.get(key).cloned().unwrap_or_default()))
            .collect::<Vec<_>>();
        validate_members(ctx, members).await
    }
    .boxed()
}

fn properties_message(_: &ValidationContext, _: &RuleArg) -> String {
    "Invalid object properties.".to_owned()
}

#[cfg(test)]
mod tests {
    use crate::foundation::{Path, Value};
    use crate::s;
    use pretty_assertions::assert_eq;

    fn user() -> crate::schema::Schema {
        s::object([("name", s::string()), ("age", s::number())])
    }

    #[tokio::test]
    async fn output_is_the_input_object() {
        let input = Value::object([("name", Value::from("Ada")), ("age", Value::from(36)), ("extra", Value::Null)]);
        assert_eq!(user().parse(input.clone()).await.unwrap(), input);
    }

    #[tokio::test]
    async fn issues_carry_property_paths() {
        let input = Value::object([("name", Value::from(1))]);
        let error = user().parse(input).await.unwrap_err().into_validation().unwrap();

        let located: Vec<_> = error.issues().iter().map(|i| (i.path.to_string(), i.code.as_ref())).collect();
        assert_eq!(
            located,
            vec![("name".to_owned(), "identity"), ("age".to_owned(), "identity")]
        );
        assert_eq!(error.issues()[1].message, "Invalid type. Expected number, received null.");
    }

    #[tokio::test]
    async fn nested_paths_are_absolute() {
        let schema = s::object([("user", user())]);
        let input = Value::object([("user", Value::object([("name", Value::from("Ada")), ("age", Value::from("x"))]))]);
        let error = schema.parse(input).await.unwrap_err().into_validation().unwrap();
        assert_eq!(error.first().path, Path::root().join("user").join("age"));
    }

    #[tokio::test]
    async fn rejects_non_objects() {
        let error = user().parse(Value::Array(vec![])).await.unwrap_err().into_validation().unwrap();
        assert_eq!(error.len(), 1);
        assert_eq!(error.first().message, "Invalid type. Expected object, received array.");
    }
}
