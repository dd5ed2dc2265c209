//! Number, bigint and NaN schemas.

mod common;

use common::issues_of;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sval_schema::prelude::*;

// ============================================================================
// SHORTHANDS
// ============================================================================

#[rstest]
#[case::gt(s::number().gt(5), 6.0, 5.0)]
#[case::gte(s::number().gte(5), 5.0, 4.0)]
#[case::lt(s::number().lt(5), 4.0, 5.0)]
#[case::lte(s::number().lte(5), 5.0, 6.0)]
#[tokio::test]
async fn bounds(#[case] schema: Schema, #[case] accepted: f64, #[case] rejected: f64) {
    assert_eq!(schema.parse(accepted).await.unwrap(), Value::from(accepted));
    assert!(schema.parse(rejected).await.unwrap_err().is_invalid());
}

#[tokio::test]
async fn bound_messages() {
    let error = issues_of(&s::number().gt(5).lte(1), 3).await;
    let messages: Vec<_> = error.issues().iter().map(|i| i.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Must be greater than 5.", "Must be less than or equal to 1."]
    );
}

#[tokio::test]
async fn integer_rule() {
    let schema = s::number().integer();
    assert!(schema.parse(4).await.is_ok());
    assert_eq!(issues_of(&schema, 4.5).await.first().message, "Must be an integer.");
}

#[tokio::test]
async fn nan_is_not_a_number() {
    let error = issues_of(&s::number(), f64::NAN).await;
    assert_eq!(error.first().message, "Invalid type. Expected number, received NaN.");
}

// ============================================================================
// COERCION
// ============================================================================

#[tokio::test]
async fn coerces_numeric_text() {
    assert_eq!(s::number().coerce().parse("123").await.unwrap(), Value::from(123));
}

#[tokio::test]
async fn leaves_invalid_text_for_identity() {
    let error = issues_of(&s::number().coerce(), "123a").await;
    assert_eq!(error.first().code, "identity");
}

#[tokio::test]
async fn does_not_coerce_when_disabled() {
    assert!(s::number().parse("123").await.unwrap_err().is_invalid());
}

// ============================================================================
// BIGINT
// ============================================================================

#[tokio::test]
async fn accepts_bigint() {
    let big = Value::from(9_007_199_254_740_991_i128);
    assert_eq!(s::bigint().parse(big.clone()).await.unwrap(), big);
}

#[tokio::test]
async fn rejects_plain_number_as_bigint() {
    let error = issues_of(&s::bigint(), 123).await;
    assert_eq!(error.first().message, "Invalid type. Expected bigint, received number.");
}

#[rstest]
#[case::text(Value::from("123"))]
#[case::number(Value::from(123))]
#[tokio::test]
async fn coerces_to_bigint(#[case] input: Value) {
    assert_eq!(s::bigint().coerce().parse(input).await.unwrap(), Value::BigInt(123));
}

#[tokio::test]
async fn bigint_coercion_rejects_garbage_and_respects_flag() {
    assert!(s::bigint().coerce().parse("123a").await.unwrap_err().is_invalid());
    assert!(s::bigint().parse("123").await.unwrap_err().is_invalid());
}

#[tokio::test]
async fn bigint_bounds_use_bigint_arguments() {
    let schema = s::bigint().gt(10_i128).lte(i128::MAX);
    assert!(schema.parse(Value::BigInt(11)).await.is_ok());
    assert_eq!(issues_of(&schema, Value::BigInt(10)).await.first().code, "gt");

    let misconfigured = s::bigint().gt(10);
    assert!(misconfigured.parse(Value::BigInt(11)).await.unwrap_err().is_defect());
}

// ============================================================================
// NAN
// ============================================================================

#[tokio::test]
async fn accepts_nan() {
    let output = s::nan().parse(f64::NAN).await.unwrap();
    assert!(output.is_nan());
}

#[tokio::test]
async fn rejects_numbers_as_nan() {
    let error = issues_of(&s::nan(), 123).await;
    assert_eq!(error.first().message, "Invalid type. Expected NaN, received number.");
}
