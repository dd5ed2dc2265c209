//! Error types for validation failures and defects
//!
//! Two kinds of failure leave a pipeline:
//!
//! - [`ValidationError`]: the input does not satisfy the schema. It is an
//!   ordered, non-empty list of [`Issue`]s and is always recoverable through
//!   `safe_parse`.
//! - a defect: anything else raised by a rule, preparer or transformer, or
//!   by the engine itself on misconfiguration ([`EngineError`]). Defects are
//!   never folded into an issue list; they travel unchanged through every
//!   layer, union aggregation included.
//!
//! [`ParseError`] is the tagged union of the two.

use crate::foundation::path::Path;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Boxed error carried by defects.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// ISSUE
// ============================================================================

/// One located validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Location of the failing value within the top-level input.
    pub path: Path,

    /// Name of the rule that failed.
    ///
    /// Examples: "identity", "min_length", "json", or a custom rule name.
    pub code: Cow<'static, str>,

    /// Human-readable message, already resolved against overrides.
    pub message: String,
}

impl Issue {
    pub fn new(
        path: Path,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path,
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.path, self.code, self.message)
        }
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Ordered, non-empty aggregate of [`Issue`]s.
///
/// # Examples
///
/// ```
/// use sval_schema::foundation::{Issue, Path, ValidationError};
///
/// let error = ValidationError::new(Issue::new(Path::root(), "identity", "Expected string"));
/// assert_eq!(error.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    /// Creates an error holding a single issue.
    pub fn new(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    /// Creates an error from a list of issues; `None` when the list is empty.
    pub fn from_issues(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self { issues })
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// First issue in aggregation order.
    pub fn first(&self) -> &Issue {
        &self.issues[0]
    }

    /// Appends the issues of `other`, preserving order.
    pub fn merge(&mut self, other: ValidationError) {
        self.issues.extend(other.issues);
    }

    /// Issues whose code matches `code`.
    pub fn issues_for<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |issue| issue.code == code)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} issue(s):", self.issues.len())?;
        for (i, issue) in self.issues.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl IntoIterator for ValidationError {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

// ============================================================================
// DEFECTS
// ============================================================================

/// Misconfiguration detected by the engine while running a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The schema configures a rule its plugin does not define.
    #[error("rule '{rule}' is not defined for data type '{data_type}'")]
    UnknownRule { data_type: String, rule: String },

    /// A rule received an argument of the wrong shape.
    #[error("rule '{rule}' expects {expected}, got {actual}")]
    InvalidArgument {
        rule: Cow<'static, str>,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Construction-time defect raised while defining or registering plugins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PluginError {
    #[error("plugin '{0}' does not define the mandatory 'identity' rule")]
    MissingIdentity(String),

    #[error("a plugin for data type '{0}' is already registered")]
    Duplicate(String),

    #[error("custom data type '{0}' reuses a builtin tag")]
    ReservedTag(String),
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Failure of a `parse` call.
///
/// The split is explicit so that only [`ParseError::Invalid`] is ever
/// aggregated; [`ParseError::Defect`] always propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The value does not satisfy the schema.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// An unexpected error from user code or engine misconfiguration.
    #[error(transparent)]
    Defect(BoxError),
}

impl ParseError {
    /// Wraps any error as a defect.
    pub fn defect(error: impl Into<BoxError>) -> Self {
        Self::Defect(error.into())
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn is_defect(&self) -> bool {
        matches!(self, Self::Defect(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::Defect(_) => None,
        }
    }

    pub fn into_validation(self) -> Option<ValidationError> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::Defect(_) => None,
        }
    }
}

impl From<EngineError> for ParseError {
    fn from(error: EngineError) -> Self {
        Self::Defect(Box::new(error))
    }
}
