//! Parser for the repeat-expression mini-language.

use crate::expr::{ExprError, ExpressionCompiler, is_identifier};
use crate::repeat::types::{RepeatDescriptor, TrackBy};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Grammar: `( mapper "as" )? item "in" source ( "track by" key )?`.
/// Inner expressions are greedy but `track by` binds last.
static REPEAT_EXPR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*(?:(.+?)\s+as\s+)?(\S+?)\s+in\s+(.+?)(?:\s+track\s+by\s+(.+?))?\s*$")
        .expect("repeat grammar regex is valid")
});

/// Errors raised while parsing a repeat expression.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input does not match the grammar
    #[error(
        "Expected expression in form of '_item_ in _collection_[ track by _id_]' but got '{0}'"
    )]
    InvalidSyntax(String),
    /// Loop variable is not a bare identifier
    #[error("Expected loop variable to be a bare identifier but got '{0}'")]
    InvalidItemName(String),
    /// Inner expression rejected by the host compiler
    #[error("Cannot compile inner expression: {0}")]
    Compile(#[from] ExprError),
}

impl ParseError {
    /// Short machine-readable cause code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        "iexp"
    }
}

/// Parse a repeat expression into a [`RepeatDescriptor`].
///
/// ```
/// use pickbox::expr::PathCompiler;
/// use pickbox::repeat::parse;
///
/// let desc = parse("person in people track by person.id", &PathCompiler).unwrap();
/// assert_eq!(desc.item_name(), "person");
/// assert_eq!(desc.track_by().unwrap().raw(), "person.id");
/// ```
///
/// # Errors
/// Fails when the input does not match the grammar, when the loop variable
/// is not a bare identifier, or when the host compiler rejects one of the
/// inner expressions.
pub fn parse(
    expression: &str,
    compiler: &dyn ExpressionCompiler,
) -> Result<RepeatDescriptor, ParseError> {
    let captures = REPEAT_EXPR
        .captures(expression)
        .ok_or_else(|| ParseError::InvalidSyntax(expression.to_string()))?;

    let mapper = captures.get(1).map(|m| m.as_str());
    let item_name = captures
        .get(2)
        .map(|m| m.as_str())
        .ok_or_else(|| ParseError::InvalidSyntax(expression.to_string()))?;
    let source = captures
        .get(3)
        .map(|m| m.as_str())
        .ok_or_else(|| ParseError::InvalidSyntax(expression.to_string()))?;
    let track_by = captures.get(4).map(|m| m.as_str());

    if !is_identifier(item_name) {
        return Err(ParseError::InvalidItemName(item_name.to_string()));
    }

    Ok(RepeatDescriptor {
        item_name: item_name.to_string(),
        source: compiler.compile(source)?,
        track_by: track_by
            .map(|raw| Ok::<_, ExprError>(TrackBy::new(raw, compiler.compile(raw)?)))
            .transpose()?,
        // Without an `as` clause the model value is the item itself.
        model_mapper: compiler.compile(mapper.unwrap_or(item_name))?,
    })
}

/// Repeat expression the template layer uses to iterate groups.
#[must_use]
pub const fn group_repeat_expression() -> &'static str {
    "($group, $items) in $select.groups"
}

/// Reassemble the per-item repeat expression for the template layer.
///
/// Grouped bindings iterate the current group's `$items` instead of the
/// original source.
#[must_use]
pub fn item_repeat_expression(
    item_name: &str,
    source: &str,
    track_by: Option<&str>,
    grouped: bool,
) -> String {
    let collection = if grouped { "$items" } else { source };
    let mut expression = format!("{item_name} in {collection}");
    if let Some(track) = track_by {
        expression.push_str(" track by ");
        expression.push_str(track);
    }
    expression
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Locals, PathCompiler};
    use serde_json::{Value, json};

    #[test]
    fn test_parse_plain() {
        let desc = parse("x in items", &PathCompiler).unwrap();
        assert_eq!(desc.item_name(), "x");
        assert!(desc.track_by().is_none());
        assert_eq!(desc.source().source(), "items");
    }

    #[test]
    fn test_parse_identity_mapper() {
        let desc = parse("x in items", &PathCompiler).unwrap();
        let item = json!({"id": 3});
        assert_eq!(desc.map_model(&Value::Null, &item), item);
    }

    #[test]
    fn test_parse_alias_and_track_by() {
        let desc = parse("y as x in items track by x.id", &PathCompiler).unwrap();
        assert_eq!(desc.item_name(), "x");
        assert_eq!(desc.track_by().unwrap().raw(), "x.id");

        // The mapper evaluates `y` with the loop variable bound.
        let mut locals = Locals::new();
        locals.insert("x".into(), json!({"id": 1}));
        let scope = json!({"y": "mapped"});
        assert_eq!(desc.map_model(&scope, &json!({"id": 1})), json!("mapped"));
    }

    #[test]
    fn test_parse_alias_path_mapper() {
        let desc = parse("x.name as x in people", &PathCompiler).unwrap();
        assert_eq!(
            desc.map_model(&Value::Null, &json!({"name": "ada"})),
            json!("ada")
        );
    }

    #[test]
    fn test_parse_whitespace_flexible() {
        let desc = parse("  x   in   items   track   by   x.id  ", &PathCompiler).unwrap();
        assert_eq!(desc.item_name(), "x");
        assert_eq!(desc.source().source(), "items");
        assert_eq!(desc.track_by().unwrap().raw(), "x.id");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            parse("not a valid expr", &PathCompiler),
            Err(ParseError::InvalidSyntax(_))
        ));
        assert!(matches!(
            parse("items", &PathCompiler),
            Err(ParseError::InvalidSyntax(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_identifier_item() {
        assert!(matches!(
            parse("x.y in items", &PathCompiler),
            Err(ParseError::InvalidItemName(_))
        ));
    }

    #[test]
    fn test_error_code() {
        let err = parse("nope", &PathCompiler).unwrap_err();
        assert_eq!(err.code(), "iexp");
    }

    #[test]
    fn test_group_repeat_expression() {
        assert_eq!(group_repeat_expression(), "($group, $items) in $select.groups");
    }

    #[test]
    fn test_item_repeat_expression_round_trip() {
        assert_eq!(
            item_repeat_expression("x", "coll", Some("x.id"), false),
            "x in coll track by x.id"
        );
        assert_eq!(item_repeat_expression("x", "coll", None, true), "x in $items");
    }
}
