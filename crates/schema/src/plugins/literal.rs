use crate::foundation::{EngineError, ValidationContext, Value};
use crate::plugin::{DataType, IDENTITY, PluginDescriptor, RuleArg, RuleDef};

pub(super) fn descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::Literal).rule("identity", RuleDef::check(identity, identity_message))
}

/// Equality with the configured literal. NaN never equals itself, so a NaN
/// literal matches nothing; use the `nan` plugin instead.
fn identity(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    Ok(*value == arg.value(IDENTITY)?)
}

fn identity_message(ctx: &ValidationContext, arg: &RuleArg) -> String {
    format!("Invalid literal. Expected {arg}, received {}.", ctx.value())
}

#[cfg(test)]
mod tests {
    use crate::foundation::Value;
    use crate::s;

    #[tokio::test]
    async fn matches_exactly() {
        let schema = s::literal("a");
        assert_eq!(schema.parse("a").await.unwrap(), Value::from("a"));

        let error = schema.parse("b").await.unwrap_err().into_validation().unwrap();
        assert_eq!(error.first().message, r#"Invalid literal. Expected "a", received "b"."#);
    }

    #[tokio::test]
    async fn numbers_and_booleans() {
        assert!(s::literal(3).parse(3.0).await.is_ok());
        assert!(s::literal(true).parse(false).await.is_err());
    }

    #[tokio::test]
    async fn missing_literal_is_a_defect() {
        let schema = crate::schema::Schema::new(crate::plugins::literal());
        assert!(schema.parse("a").await.unwrap_err().is_defect());
    }
}
