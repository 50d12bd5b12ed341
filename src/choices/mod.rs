//! Choices projection
//!
//! Turns a raw source-collection snapshot into the list the dropdown
//! displays. The host re-invokes [`project`] on every collection change;
//! projection is a pure function of the snapshot, so re-running it for the
//! same input always yields the same output.

use crate::expr::GroupKey;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while projecting a source collection.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Source collection is not an ordered sequence
    #[error("Expected an array of choices but got '{0}'")]
    NotAnArray(String),
}

impl ProjectionError {
    /// Short machine-readable cause code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        "items"
    }
}

/// Flat or grouped view of the source collection.
///
/// Groups are keyed lexicographically (`BTreeMap` order); `items` is the
/// concatenation of the groups in key order, or the source verbatim when
/// grouping is off. Item order inside a group preserves source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// Flat choices list, post-grouping flatten.
    pub items: Vec<Value>,
    /// Grouped view, present iff grouping is enabled.
    pub groups: Option<BTreeMap<String, Vec<Value>>>,
}

impl Projection {
    /// Whether grouping is enabled for this projection.
    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        self.groups.is_some()
    }

    /// Number of selectable choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no choices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Project a raw source snapshot into the choices list.
///
/// A missing (`None`) or `null` snapshot means the host has not initialized
/// the collection yet and projects to an empty list rather than an error.
///
/// # Errors
/// Fails when the snapshot is present but not an array.
pub fn project(raw: Option<&Value>, group_by: Option<&GroupKey>) -> Result<Projection, ProjectionError> {
    let source = match raw {
        None | Some(Value::Null) => {
            return Ok(Projection {
                items: Vec::new(),
                groups: group_by.map(|_| BTreeMap::new()),
            });
        }
        Some(Value::Array(items)) => items,
        Some(other) => return Err(ProjectionError::NotAnArray(other.to_string())),
    };

    let Some(group_by) = group_by else {
        return Ok(Projection {
            items: source.clone(),
            groups: None,
        });
    };

    let mut groups: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for item in source {
        groups
            .entry(group_by.key_of(item))
            .or_default()
            .push(item.clone());
    }
    let items = groups.values().flatten().cloned().collect();

    Ok(Projection {
        items,
        groups: Some(groups),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_missing_collection_is_empty() {
        let projection = project(None, None).unwrap();
        assert!(projection.is_empty());
        assert!(!projection.is_grouped());

        let projection = project(Some(&Value::Null), None).unwrap();
        assert!(projection.is_empty());
    }

    #[test]
    fn test_project_empty_array() {
        let raw = json!([]);
        let projection = project(Some(&raw), None).unwrap();
        assert!(projection.is_empty());
    }

    #[test]
    fn test_project_preserves_order() {
        let raw = json!([1, 2, 3]);
        let projection = project(Some(&raw), None).unwrap();
        assert_eq!(projection.items, vec![json!(1), json!(2), json!(3)]);
        assert_eq!(projection.len(), 3);
        assert!(!projection.is_grouped());
    }

    #[test]
    fn test_project_rejects_non_array() {
        let raw = json!({"not": "an array"});
        let err = project(Some(&raw), None).unwrap_err();
        assert!(matches!(err, ProjectionError::NotAnArray(_)));
        assert_eq!(err.code(), "items");
    }

    #[test]
    fn test_project_groups_sorted_by_key() {
        let raw = json!([
            {"v": 1, "g": "b"},
            {"v": 2, "g": "a"},
            {"v": 3, "g": "a"},
        ]);
        let group_by = GroupKey::property("g");
        let projection = project(Some(&raw), Some(&group_by)).unwrap();

        let groups = projection.groups.as_ref().unwrap();
        assert_eq!(groups["a"], vec![json!({"v": 2, "g": "a"}), json!({"v": 3, "g": "a"})]);
        assert_eq!(groups["b"], vec![json!({"v": 1, "g": "b"})]);

        // Flattened order: group "a" before "b", source order inside groups.
        assert_eq!(
            projection.items,
            vec![
                json!({"v": 2, "g": "a"}),
                json!({"v": 3, "g": "a"}),
                json!({"v": 1, "g": "b"}),
            ]
        );
    }

    #[test]
    fn test_project_is_idempotent() {
        let raw = json!([{"g": "x"}, {"g": "y"}, {"g": "x"}]);
        let group_by = GroupKey::property("g");
        let first = project(Some(&raw), Some(&group_by)).unwrap();
        let second = project(Some(&raw), Some(&group_by)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_project_group_by_key_fn() {
        let raw = json!([{"n": 5}, {"n": 15}]);
        let group_by = GroupKey::key_fn(|item| {
            json!(if item["n"].as_i64().unwrap_or(0) >= 10 { "big" } else { "small" })
        });
        let projection = project(Some(&raw), Some(&group_by)).unwrap();
        assert_eq!(
            projection.items,
            vec![json!({"n": 15}), json!({"n": 5})] // "big" sorts before "small"
        );
    }
}
