//! # sval-schema
//!
//! Runtime schema validation for untrusted data. A schema runs a value
//! through three stages and returns either the normalized output or an
//! ordered list of located issues.
//!
//! ## Quick Start
//!
//! ```rust
//! use sval_schema::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let id = s::union([s::string().min_length(5), s::number().gte(100)]);
//!
//! assert_eq!(id.parse(150).await.unwrap(), Value::from(150));
//!
//! let SafeParse::Error(error) = id.safe_parse("shrt").await.unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(error.len(), 2);
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. **prepare**: optional coercion, then caller steps
//! 2. **validate**: `identity` (type membership) alone, then custom rules
//!    and plugin rules with every failure collected
//! 3. **transform**: caller steps on the validated value
//!
//! Validation failures surface as [`ParseError::Invalid`]; anything else a
//! caller step or rule raises is a defect ([`ParseError::Defect`]) and is
//! never folded into the issue list.
//!
//! ## Data types
//!
//! Each data type is a [`Plugin`](plugin::Plugin): an `identity` rule plus
//! named rules. The builtin plugins live in [`plugins`] and are bound by
//! the factories in [`s`]. Caller plugins are sealed with
//! [`define_plugin`](plugin::define_plugin) and registered in a
//! [`PluginRegistry`](plugin::PluginRegistry).
//!
//! [`ParseError::Invalid`]: foundation::ParseError::Invalid
//! [`ParseError::Defect`]: foundation::ParseError::Defect

pub mod definition;
pub mod foundation;
pub mod plugin;
pub mod plugins;
pub mod prelude;
pub mod s;
pub mod schema;
