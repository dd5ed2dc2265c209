//! Builtin leaf plugins
//!
//! One plugin per builtin [`DataType`](crate::plugin::DataType). Each is
//! sealed once on first use and shared by every schema built from it.
//!
//! | tag       | rules                                                              |
//! |-----------|--------------------------------------------------------------------|
//! | `string`  | `min_length` `max_length` `length` `pattern` `starts_with` `ends_with` `json` |
//! | `number`  | `gt` `gte` `lt` `lte` `integer`, coercion                          |
//! | `bigint`  | `gt` `gte` `lt` `lte`, coercion                                     |
//! | `nan`     |                                                                     |
//! | `boolean` | coercion                                                            |
//! | `array`   | `items` `min_length` `max_length` `includes`                        |
//! | `set`     | `items` `includes`                                                  |
//! | `object`  | `properties`                                                        |
//! | `literal` | identity compares against the configured literal                   |
//! | `union`   | `variants`                                                          |

mod array;
mod boolean;
mod literal;
mod number;
mod object;
mod string;
mod union;

use crate::foundation::{ParseError, PathSegment, ValidationContext, ValidationError, Value};
use crate::plugin::{Plugin, PluginDescriptor, RuleOutcome, define_plugin};
use crate::schema::Schema;
use std::sync::{Arc, LazyLock};

macro_rules! builtin {
    ($(#[$meta:meta])* $accessor:ident, $cell:ident, $descriptor:path) => {
        static $cell: LazyLock<Arc<Plugin>> = LazyLock::new(|| seal($descriptor()));

        $(#[$meta])*
        pub fn $accessor() -> Arc<Plugin> {
            Arc::clone(&$cell)
        }
    };
}

builtin!(
    /// Text values.
    string, STRING, string::descriptor
);
builtin!(
    /// Numbers other than NaN.
    number, NUMBER, number::number_descriptor
);
builtin!(
    /// Large integers.
    bigint, BIGINT, number::bigint_descriptor
);
builtin!(
    /// Only the numeric NaN.
    nan, NAN, number::nan_descriptor
);
builtin!(
    /// Booleans.
    boolean, BOOLEAN, boolean::descriptor
);
builtin!(
    /// Ordered lists.
    array, ARRAY, array::array_descriptor
);
builtin!(
    /// Sets of distinct values.
    set, SET, array::set_descriptor
);
builtin!(
    /// Plain string-keyed objects.
    object, OBJECT, object::descriptor
);
builtin!(
    /// A single exact value.
    literal, LITERAL, literal::descriptor
);
builtin!(
    /// First matching candidate of several schemas.
    union, UNION, union::descriptor
);

/// Every builtin plugin.
pub fn all() -> Vec<Arc<Plugin>> {
    vec![
        string(),
        number(),
        bigint(),
        nan(),
        boolean(),
        array(),
        set(),
        object(),
        literal(),
        union(),
    ]
}

fn seal(descriptor: PluginDescriptor) -> Arc<Plugin> {
    define_plugin(descriptor).expect("builtin plugin defines identity")
}

/// Default identity message shared by the type-tag plugins.
fn type_mismatch(expected: &str, ctx: &ValidationContext) -> String {
    format!(
        "Invalid type. Expected {expected}, received {}.",
        ctx.value().type_name()
    )
}

/// Parses each `(segment, schema, member)` triple under a child context,
/// collecting validation issues. Nested outputs are discarded.
async fn validate_members<'s, S, I>(ctx: &ValidationContext, members: I) -> Result<RuleOutcome, ParseError>
where
    S: Into<PathSegment>,
    I: IntoIterator<Item = (S, &'s Schema, Value)>,
{
    let mut issues = Vec::new();
    for (segment, schema, member) in members {
        let child = ctx.child(segment, member.clone());
        match schema.parse_with(member, &child).await {
            Ok(_) => {}
            Err(ParseError::Invalid(error)) => issues.extend(error),
            Err(defect) => return Err(defect),
        }
    }
    match ValidationError::from_issues(issues) {
        Some(error) => Err(error.into()),
        None => Ok(RuleOutcome::Valid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_share_one_plugin() {
        assert!(Arc::ptr_eq(&string(), &string()));
        assert!(!Arc::ptr_eq(&array(), &set()));
    }

    #[test]
    fn every_tag_is_distinct() {
        let mut tags: Vec<_> = all().iter().map(|p| p.data_type().as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 10);
    }
}
