//! Shared helpers for integration tests.

#![allow(dead_code)]

use sval_schema::prelude::*;

/// Installs a fmt subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Unwraps the validation error of a failed parse.
pub async fn issues_of(schema: &Schema, value: impl Into<Value>) -> ValidationError {
    match schema.parse(value).await {
        Ok(output) => panic!("expected a validation error, got {output}"),
        Err(ParseError::Invalid(error)) => error,
        Err(ParseError::Defect(defect)) => panic!("expected a validation error, got defect {defect}"),
    }
}
