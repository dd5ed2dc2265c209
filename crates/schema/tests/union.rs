//! Union schemas: candidate order, aggregation, union-level stages.

mod common;

use common::issues_of;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use sval_schema::prelude::*;

fn string_or_number() -> Schema {
    s::union([s::string(), s::number()])
}

fn strict() -> Schema {
    s::union([s::string().min_length(5), s::number().gte(100)])
}

#[tokio::test]
async fn passes_when_one_candidate_matches() {
    let schema = string_or_number();
    assert_eq!(schema.parse("hello").await.unwrap(), Value::from("hello"));
    assert_eq!(schema.parse(123).await.unwrap(), Value::from(123));
}

#[tokio::test]
async fn fails_when_no_candidate_matches() {
    let error = issues_of(&string_or_number(), true).await;
    assert_eq!(error.len(), 2);
    assert_eq!(error.issues()[0].message, "Invalid type. Expected string, received boolean.");
    assert_eq!(error.issues()[1].message, "Invalid type. Expected number, received boolean.");
}

#[tokio::test]
async fn passes_with_constrained_candidates() {
    let schema = strict();
    assert_eq!(schema.parse("long enough").await.unwrap(), Value::from("long enough"));
    assert_eq!(schema.parse(150).await.unwrap(), Value::from(150));
}

#[tokio::test]
async fn collects_one_issue_per_candidate() {
    let result = strict().safe_parse("shrt").await.unwrap();
    assert_eq!(result.status(), "error");

    let error = result.error().unwrap();
    let codes: Vec<_> = error.issues().iter().map(|i| i.code.as_ref()).collect();
    assert_eq!(codes, vec!["min_length", "identity"]);
}

#[tokio::test]
async fn discriminates_object_candidates() {
    let schema = s::union([
        s::object([("type", s::literal("a")), ("a", s::string())]),
        s::object([("type", s::literal("b")), ("b", s::number())]),
    ]);

    let a = Value::object([("type", Value::from("a")), ("a", Value::from("hello"))]);
    let b = Value::object([("type", Value::from("b")), ("b", Value::from(123))]);
    let invalid = Value::object([("type", Value::from("a")), ("a", Value::from(123))]);

    assert_eq!(schema.parse(a.clone()).await.unwrap(), a);
    assert_eq!(schema.parse(b.clone()).await.unwrap(), b);

    let error = issues_of(&schema, invalid).await;
    let located: Vec<_> = error.issues().iter().map(|i| i.path.to_string()).collect();
    assert_eq!(located, vec!["a", "type", "b"]);
}

#[tokio::test]
async fn union_level_custom_message_comes_first() {
    let message = "The value must be a string or a number.";
    let schema = string_or_number()
        .refine("union_level_check", |_, _| false)
        .message("union_level_check", message);

    let result = schema.safe_parse(true).await.unwrap();
    let error = result.error().unwrap();
    assert_eq!(error.first().message, message);
    assert_eq!(error.len(), 3);
}

#[tokio::test]
async fn union_level_custom_failure_overrides_a_match() {
    let schema = string_or_number().refine("never", |_, _| false);
    let error = issues_of(&schema, "hello").await;
    assert_eq!(error.len(), 1);
    assert_eq!(error.first().message, "Custom rule 'never' failed.");
}

#[tokio::test]
async fn prepares_before_trying_candidates() {
    let schema = s::union([s::number(), s::boolean()]).prepare(|value| {
        let parsed = value.as_str().and_then(|text| text.parse::<f64>().ok());
        parsed.map_or(value, Value::Number)
    });
    assert_eq!(schema.parse("123").await.unwrap(), Value::from(123));
    assert_eq!(schema.parse(true).await.unwrap(), Value::from(true));
}

#[tokio::test]
async fn transforms_the_matching_output() {
    let schema = string_or_number().transform(|value| Value::object([("data", value)]));
    assert_eq!(
        schema.parse("hello").await.unwrap(),
        Value::object([("data", Value::from("hello"))])
    );
    assert_eq!(
        schema.parse(123).await.unwrap(),
        Value::object([("data", Value::from(123))])
    );
}

#[tokio::test]
async fn output_is_the_candidate_transform() {
    let schema = s::union([
        s::string().transform(|value| match value {
            Value::Text(text) => Value::from(text.len() as f64),
            other => other,
        }),
        s::number(),
    ]);
    assert_eq!(schema.parse("four").await.unwrap(), Value::from(4));
}

#[tokio::test]
async fn candidate_defect_propagates() {
    let exploding = s::string().custom(CustomRule::from_async("explode", |_, _| async {
        Err::<bool, _>(ParseError::defect(std::io::Error::other("boom")))
    }));
    let schema = s::union([exploding, s::number()]);

    let err = schema.parse("x").await.unwrap_err();
    let ParseError::Defect(defect) = err else {
        panic!("expected a defect");
    };
    assert!(defect.downcast_ref::<std::io::Error>().is_some());
    assert!(schema.safe_parse("x").await.is_err());
}

#[tokio::test]
async fn union_messages_reach_candidates() {
    let schema = string_or_number().message("identity", "Wrong kind.");
    let error = issues_of(&schema, true).await;
    assert!(error.issues().iter().all(|i| i.message == "Wrong kind."));
}

#[tokio::test]
async fn later_candidates_do_not_run_after_a_match() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (prepared, refined) = (Arc::clone(&calls), Arc::clone(&calls));
    let schema = s::union([
        s::number(),
        s::number()
            .prepare(move |value| {
                prepared.fetch_add(1, Ordering::SeqCst);
                value
            })
            .refine("counted", move |_, _| {
                refined.fetch_add(1, Ordering::SeqCst);
                true
            }),
    ]);

    assert_eq!(schema.parse(1).await.unwrap(), Value::from(1));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // A value the first candidate rejects reaches the second one.
    assert!(schema.parse("x").await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
