//! String schemas holding JSON documents.

mod common;

use common::issues_of;
use pretty_assertions::assert_eq;
use sval_schema::prelude::*;

fn person_json() -> Schema {
    s::string().json(s::object([("name", s::string()), ("age", s::number())]))
}

#[tokio::test]
async fn accepts_matching_document_and_returns_the_text() {
    let data = serde_json::json!({"name": "John Doe", "age": 30}).to_string();
    assert_eq!(person_json().parse(data.as_str()).await.unwrap(), Value::from(data));
}

#[tokio::test]
async fn rejects_document_that_does_not_match() {
    let data = serde_json::json!({"name": "John Doe", "age": "30"}).to_string();
    let error = issues_of(&person_json(), data).await;

    assert_eq!(error.len(), 1);
    assert_eq!(error.first().path, Path::root().join("age"));
    assert_eq!(error.first().message, "Invalid type. Expected number, received string.");
}

#[tokio::test]
async fn rejects_text_that_is_not_json() {
    let schema = s::string().json(s::object([("name", s::string())]));
    let error = issues_of(&schema, "not a json string").await;

    assert_eq!(error.len(), 1);
    assert_eq!(error.first().code, "json");
    assert_eq!(error.first().message, "Invalid JSON.");
}

#[tokio::test]
async fn rejects_non_string_input() {
    let schema = s::string().json(s::object([("name", s::string())]));
    let error = issues_of(&schema, 123).await;
    assert_eq!(error.first().code, "identity");
}

#[tokio::test]
async fn validates_nested_arrays() {
    let schema = s::string().json(s::object([("data", s::array(s::number()))]));

    let valid = serde_json::json!({"data": [1, 2, 3]}).to_string();
    assert_eq!(schema.parse(valid.as_str()).await.unwrap(), Value::from(valid));

    let invalid = serde_json::json!({"data": [1, "2", 3]}).to_string();
    let error = issues_of(&schema, invalid).await;
    assert_eq!(error.first().path.to_string(), "data[1]");
}

#[tokio::test]
async fn json_message_can_be_overridden() {
    let schema = s::string()
        .json(s::array(s::number()))
        .message("json", "Expected a JSON list.");
    let error = issues_of(&schema, "[1,").await;
    assert_eq!(error.first().message, "Expected a JSON list.");
}

#[test]
fn parsed_documents_keep_key_order() {
    let document: serde_json::Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": {"y": 3, "b": 4}}"#).unwrap();
    let value = Value::from(document);

    let keys: Vec<_> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
    let nested: Vec<_> = value.as_object().unwrap()["m"].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(nested, vec!["y", "b"]);
}

#[tokio::test]
async fn container_messages_reach_the_document() {
    let schema = s::string()
        .json(s::object([
            ("age", s::number()),
            ("name", s::string().message("identity", "Name must be text.")),
        ]))
        .message("identity", "Wrong type.");

    let data = serde_json::json!({"age": "30", "name": 1}).to_string();
    let error = issues_of(&schema, data).await;
    let messages: Vec<_> = error.issues().iter().map(|i| i.message.as_str()).collect();
    assert_eq!(messages, vec!["Wrong type.", "Name must be text."]);
}
