//! Parsed form of a repeat-expression binding.

use crate::expr::{CompiledExpr, Locals};
use serde_json::Value;

/// Item identity defined by a `track by` clause.
///
/// Keeps the raw expression (re-emitted when the binding string is
/// reassembled) alongside its compiled form (used for equality).
#[derive(Debug, Clone)]
pub struct TrackBy {
    raw: String,
    key: CompiledExpr,
}

impl TrackBy {
    pub(crate) fn new(raw: impl Into<String>, key: CompiledExpr) -> Self {
        Self {
            raw: raw.into(),
            key,
        }
    }

    /// The raw `track by` expression string.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Evaluate the track-by key for an item.
    #[must_use]
    pub fn key_of(&self, scope: &Value, locals: &Locals) -> Value {
        self.key.eval(scope, locals)
    }
}

/// Immutable descriptor produced by parsing a repeat expression.
///
/// `model_mapper` maps an item to the external model value; without an
/// `as` clause it compiles the loop variable itself, i.e. identity.
#[derive(Debug, Clone)]
pub struct RepeatDescriptor {
    pub(crate) item_name: String,
    pub(crate) source: CompiledExpr,
    pub(crate) track_by: Option<TrackBy>,
    pub(crate) model_mapper: CompiledExpr,
}

impl RepeatDescriptor {
    /// The loop variable name.
    #[must_use]
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    /// The compiled source-collection expression.
    #[must_use]
    pub const fn source(&self) -> &CompiledExpr {
        &self.source
    }

    /// The `track by` clause, if one was supplied.
    #[must_use]
    pub const fn track_by(&self) -> Option<&TrackBy> {
        self.track_by.as_ref()
    }

    /// Locals binding the loop variable to `item`.
    #[must_use]
    pub fn locals_for(&self, item: &Value) -> Locals {
        let mut locals = Locals::new();
        locals.insert(self.item_name.clone(), item.clone());
        locals
    }

    /// Map an item to its external model value.
    #[must_use]
    pub fn map_model(&self, scope: &Value, item: &Value) -> Value {
        self.model_mapper.eval(scope, &self.locals_for(item))
    }

    /// Whether two items are the same choice.
    ///
    /// Value equality, unless a `track by` clause defines identity by key.
    #[must_use]
    pub fn items_equal(&self, scope: &Value, a: &Value, b: &Value) -> bool {
        match &self.track_by {
            Some(track) => {
                track.key_of(scope, &self.locals_for(a)) == track.key_of(scope, &self.locals_for(b))
            }
            None => a == b,
        }
    }

    /// Position of `item` in `items` under this descriptor's equality rule.
    #[must_use]
    pub fn item_index(&self, scope: &Value, items: &[Value], item: &Value) -> Option<usize> {
        items
            .iter()
            .position(|candidate| self.items_equal(scope, candidate, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{ExpressionCompiler, PathCompiler};
    use serde_json::json;

    fn descriptor(track_by: Option<&str>) -> RepeatDescriptor {
        let compiler = PathCompiler;
        RepeatDescriptor {
            item_name: "x".into(),
            source: compiler.compile("items").unwrap(),
            track_by: track_by
                .map(|raw| TrackBy::new(raw, compiler.compile(raw).unwrap())),
            model_mapper: compiler.compile("x").unwrap(),
        }
    }

    #[test]
    fn test_map_model_identity() {
        let desc = descriptor(None);
        let item = json!({"id": 7});
        assert_eq!(desc.map_model(&Value::Null, &item), item);
    }

    #[test]
    fn test_items_equal_by_value() {
        let desc = descriptor(None);
        assert!(desc.items_equal(&Value::Null, &json!({"id": 1}), &json!({"id": 1})));
        assert!(!desc.items_equal(&Value::Null, &json!({"id": 1}), &json!({"id": 2})));
    }

    #[test]
    fn test_items_equal_by_track_key() {
        let desc = descriptor(Some("x.id"));
        // Same key, different payload: still the same choice.
        assert!(desc.items_equal(
            &Value::Null,
            &json!({"id": 1, "rev": 1}),
            &json!({"id": 1, "rev": 2})
        ));
    }

    #[test]
    fn test_item_index_with_track_by() {
        let desc = descriptor(Some("x.id"));
        let items = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];
        assert_eq!(
            desc.item_index(&Value::Null, &items, &json!({"id": 2, "stale": true})),
            Some(1)
        );
        assert_eq!(desc.item_index(&Value::Null, &items, &json!({"id": 9})), None);
    }
}
