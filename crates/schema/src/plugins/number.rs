//! `number`, `bigint` and `nan` plugins.

use super::type_mismatch;
use crate::foundation::{EngineError, ValidationContext, Value};
use crate::plugin::{DataType, PluginDescriptor, RuleArg, RuleDef};

// ============================================================================
// NUMBER
// ============================================================================

pub(super) fn number_descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::Number)
        .rule("identity", RuleDef::check(number_identity, number_identity_message))
        .rule("gt", RuleDef::check(gt, gt_message))
        .rule("gte", RuleDef::check(gte, gte_message))
        .rule("lt", RuleDef::check(lt, lt_message))
        .rule("lte", RuleDef::check(lte, lte_message))
        .rule("integer", RuleDef::check(integer, integer_message))
        .coerce(coerce_number)
}

fn number_identity(value: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(matches!(value, Value::Number(n) if !n.is_nan()))
}

fn number_identity_message(ctx: &ValidationContext, _: &RuleArg) -> String {
    if ctx.value().is_nan() {
        "Invalid type. Expected number, received NaN.".to_owned()
    } else {
        type_mismatch("number", ctx)
    }
}

fn integer(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    let required = arg.flag("integer")?;
    Ok(!required || value.as_f64().is_some_and(|n| n.is_finite() && n.fract() == 0.0))
}

fn integer_message(_: &ValidationContext, _: &RuleArg) -> String {
    "Must be an integer.".to_owned()
}

/// Decimal text to a finite number. Anything else is left for the
/// identity rule to reject.
fn coerce_number(value: &Value) -> Option<Value> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    let n: f64 = text.parse().ok()?;
    n.is_finite().then_some(Value::Number(n))
}

// ============================================================================
// BIGINT
// ============================================================================

pub(super) fn bigint_descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::BigInt)
        .rule("identity", RuleDef::check(bigint_identity, bigint_identity_message))
        .rule("gt", RuleDef::check(gt, gt_message))
        .rule("gte", RuleDef::check(gte, gte_message))
        .rule("lt", RuleDef::check(lt, lt_message))
        .rule("lte", RuleDef::check(lte, lte_message))
        .coerce(coerce_bigint)
}

fn bigint_identity(value: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(matches!(value, Value::BigInt(_)))
}

fn bigint_identity_message(ctx: &ValidationContext, _: &RuleArg) -> String {
    type_mismatch("bigint", ctx)
}

/// Integral text or an integral finite number to bigint.
fn coerce_bigint(value: &Value) -> Option<Value> {
    match value {
        Value::Text(text) => text.trim().parse::<i128>().ok().map(Value::BigInt),
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => {
            // `as` saturates outside [-2^127, 2^127).
            let limit = 2f64.powi(127);
            (*n >= -limit && *n < limit).then(|| Value::BigInt(*n as i128))
        }
        _ => None,
    }
}

// ============================================================================
// NAN
// ============================================================================

pub(super) fn nan_descriptor() -> PluginDescriptor {
    PluginDescriptor::new(DataType::NaN).rule("identity", RuleDef::check(nan_identity, nan_identity_message))
}

fn nan_identity(value: &Value, _: &RuleArg) -> Result<bool, EngineError> {
    Ok(value.is_nan())
}

fn nan_identity_message(ctx: &ValidationContext, _: &RuleArg) -> String {
    type_mismatch("NaN", ctx)
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Compares a number against a number bound, or a bigint against a bigint
/// bound. Any other pairing of bound and schema is a configuration defect.
fn compare(
    value: &Value,
    arg: &RuleArg,
    rule: &'static str,
    accept: fn(std::cmp::Ordering) -> bool,
) -> Result<bool, EngineError> {
    let ordering = match value {
        Value::BigInt(n) => Some(n.cmp(&arg.bigint(rule)?)),
        Value::Number(n) => n.partial_cmp(&arg.number(rule)?),
        _ => None,
    };
    Ok(ordering.is_some_and(accept))
}

fn gt(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    compare(value, arg, "gt", std::cmp::Ordering::is_gt)
}

fn gt_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must be greater than {arg}.")
}

fn gte(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    compare(value, arg, "gte", std::cmp::Ordering::is_ge)
}

fn gte_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must be greater than or equal to {arg}.")
}

fn lt(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    compare(value, arg, "lt", std::cmp::Ordering::is_lt)
}

fn lt_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must be less than {arg}.")
}

fn lte(value: &Value, arg: &RuleArg) -> Result<bool, EngineError> {
    compare(value, arg, "lte", std::cmp::Ordering::is_le)
}

fn lte_message(_: &ValidationContext, arg: &RuleArg) -> String {
    format!("Must be less than or equal to {arg}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("123", Some(Value::Number(123.0)))]
    #[case("  1.5 ", Some(Value::Number(1.5)))]
    #[case("-0", Some(Value::Number(-0.0)))]
    #[case("123a", None)]
    #[case("", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    fn number_coercion(#[case] input: &str, #[case] expected: Option<Value>) {
        assert_eq!(coerce_number(&Value::from(input)), expected);
    }

    #[rstest]
    #[case(Value::from("123"), Some(Value::BigInt(123)))]
    #[case(Value::from(" -7 "), Some(Value::BigInt(-7)))]
    #[case(Value::from(123), Some(Value::BigInt(123)))]
    #[case(Value::from(1.5), None)]
    #[case(Value::from(f64::INFINITY), None)]
    #[case(Value::from(2f64.powi(127)), None)]
    #[case(Value::from("12.0"), None)]
    #[case(Value::from(true), None)]
    fn bigint_coercion(#[case] input: Value, #[case] expected: Option<Value>) {
        assert_eq!(coerce_bigint(&input), expected);
    }

    #[test]
    fn bound_kind_must_match_value_kind() {
        assert_eq!(gt(&Value::from(6), &RuleArg::Number(5.0)), Ok(true));
        assert_eq!(gt(&Value::BigInt(6), &RuleArg::BigInt(5)), Ok(true));
        assert!(gt(&Value::BigInt(6), &RuleArg::Number(5.0)).is_err());
        assert!(lt(&Value::from(6), &RuleArg::BigInt(5)).is_err());
    }

    #[test]
    fn integer_flag() {
        assert_eq!(integer(&Value::from(2), &RuleArg::None), Ok(true));
        assert_eq!(integer(&Value::from(2.5), &RuleArg::None), Ok(false));
        assert_eq!(integer(&Value::from(2.5), &RuleArg::Bool(false)), Ok(true));
    }
}
