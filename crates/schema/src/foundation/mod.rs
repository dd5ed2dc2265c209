//! Foundation types shared by every layer
//!
//! - **Values**: [`Value`], the dynamic input/output type
//! - **Locations**: [`Path`], [`PathSegment`]
//! - **Context**: [`ValidationContext`], [`Messages`]
//! - **Errors**: [`Issue`], [`ValidationError`], [`ParseError`],
//!   [`EngineError`], [`PluginError`]

pub mod context;
pub mod error;
pub mod path;
pub mod value;

pub use context::{Messages, ValidationContext};
pub use error::{BoxError, EngineError, Issue, ParseError, PluginError, ValidationError};
pub use path::{Path, PathSegment};
pub use value::{Object, Value};
