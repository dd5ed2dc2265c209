//! Validation context threaded through recursive parses
//!
//! A [`ValidationContext`] is created per top-level `parse` call and handed
//! down by reference. Nested schemas never mutate the context they receive;
//! they derive a new one (`child`, `with_value`, `with_messages`), so sibling
//! validations cannot observe each other and concurrent parses on the same
//! schema stay independent.
//!
//! # Examples
//!
//! ```
//! use sval_schema::foundation::{Messages, ValidationContext};
//!
//! let ctx = ValidationContext::new()
//!     .with_data("max_items", 10_usize)
//!     .with_messages(&Messages::new().with("identity", "wrong type"));
//!
//! let child = ctx.child("items", "x".into());
//! assert_eq!(child.path().to_string(), "items");
//! assert_eq!(child.get::<usize>("max_items"), Some(&10));
//! assert_eq!(child.message_for("identity"), Some("wrong type"));
//! ```

use crate::foundation::path::{Path, PathSegment};
use crate::foundation::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// MESSAGES
// ============================================================================

/// Message overrides keyed by rule name.
///
/// Deserializes from a plain JSON object so overrides can live in
/// configuration files:
///
/// ```
/// use sval_schema::foundation::Messages;
///
/// let messages: Messages = serde_json::from_str(r#"{"min_length": "Too short"}"#).unwrap();
/// assert_eq!(messages.get("min_length"), Some("Too short"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Messages(IndexMap<String, String>);

impl Messages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an override.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(rule, message);
        self
    }

    pub fn insert(&mut self, rule: impl Into<String>, message: impl Into<String>) {
        self.0.insert(rule.into(), message.into());
    }

    pub fn get(&self, rule: &str) -> Option<&str> {
        self.0.get(rule).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `self` overlaid with `narrower`; entries of `narrower` win.
    #[must_use]
    pub fn overlay(&self, narrower: &Messages) -> Self {
        let mut merged = self.0.clone();
        for (rule, message) in &narrower.0 {
            merged.insert(rule.clone(), message.clone());
        }
        Self(merged)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Messages {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// VALIDATION CONTEXT
// ============================================================================

type Data = HashMap<String, Arc<dyn Any + Send + Sync>>;

/// Per-invocation state: current value, location, overrides and ambient data.
#[derive(Clone, Default)]
pub struct ValidationContext {
    value: Value,
    path: Path,
    messages: Arc<Messages>,
    data: Arc<Data>,
}

impl ValidationContext {
    /// Creates an empty root context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches ambient data readable by rules through [`get`](Self::get).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_data<T: Send + Sync + 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        Arc::make_mut(&mut self.data).insert(key.into(), Arc::new(value));
        self
    }

    /// Reads ambient data; `None` when missing or of a different type.
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.data.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// The value currently under validation.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Location of the current value in the original input.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Override for `rule`, if any ancestor or the current schema set one.
    pub fn message_for(&self, rule: &str) -> Option<&str> {
        self.messages.get(rule)
    }

    /// Same location, new subject value.
    #[must_use]
    pub fn with_value(&self, value: Value) -> Self {
        Self {
            value,
            path: self.path.clone(),
            messages: Arc::clone(&self.messages),
            data: Arc::clone(&self.data),
        }
    }

    /// Context for a member of the current value.
    #[must_use]
    pub fn child(&self, segment: impl Into<PathSegment>, value: Value) -> Self {
        Self {
            value,
            path: self.path.join(segment),
            messages: Arc::clone(&self.messages),
            data: Arc::clone(&self.data),
        }
    }

    /// Overlays narrower message overrides on the inherited ones.
    #[must_use]
    pub fn with_messages(&self, messages: &Messages) -> Self {
        let merged = if messages.is_empty() {
            Arc::clone(&self.messages)
        } else {
            Arc::new(self.messages.overlay(messages))
        };
        Self {
            value: self.value.clone(),
            path: self.path.clone(),
            messages: merged,
            data: Arc::clone(&self.data),
        }
    }

    /// Context rooted at `path`, for validating a fragment of a larger input.
    #[must_use]
    pub fn at_path(mut self, path: Path) -> Self {
        self.path = path;
        self
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.data.keys().collect();
        keys.sort();
        f.debug_struct("ValidationContext")
            .field("value", &self.value)
            .field("path", &self.path)
            .field("messages", &self.messages)
            .field("data", &keys)
            .finish()
    }
}
