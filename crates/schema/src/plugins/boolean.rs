use super::type_mismatch;
use crate::foundation::{EngineError, ValidationContext, Value};
use crate::plugin::{DataType, PluginDescriptor, RuleArg, RuleDef};

pub(super) fn descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::Boolean)
        .rule("identity", RuleDef::check(identity, identity_message))
        .coerce(coerce)
}

fn identity(value: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(matches!(value, Value::Boolean(_)))
}

fn identity_message(ctx: &ValidationContext, _: &RuleArg) -> String {
    type_mismatch("boolean", ctx)
}

fn coerce(value: &Value) -> Option<Value> {
    match value.as_str()?.trim() {
        "true" => Some(Value::Boolean(true)),
        "false" => Some(Value::Boolean(false)),
        _ => None,
    }
}
