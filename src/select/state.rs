//! Observable state of a select widget instance.

use serde_json::Value;
use std::collections::BTreeMap;

/// Derived interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Dropdown closed
    #[default]
    Closed,
    /// Dropdown open, search box empty
    OpenIdle,
    /// Dropdown open, search text entered
    OpenSearching,
}

/// Mutable widget state, exclusively owned by the controller.
///
/// The host renders these fields reactively; it never writes them directly.
/// Invariant: `active_index < items.len()` whenever `items` is non-empty.
/// With an empty list the index is never dereferenced (navigation and
/// selection are no-ops).
#[derive(Debug, Default)]
pub struct SelectionState {
    /// Flat choices list, post-grouping flatten.
    pub items: Vec<Value>,
    /// Grouped choices, present iff grouping is enabled.
    pub groups: Option<BTreeMap<String, Vec<Value>>>,
    /// Whether the binding groups its choices.
    pub is_grouped: bool,
    /// Index of the highlighted choice.
    pub active_index: usize,
    /// Current search text.
    pub search: String,
    /// The selected choice, if any.
    pub selected: Option<Value>,
    /// Whether the dropdown is open.
    pub open: bool,
    /// Whether the widget holds keyboard focus.
    pub focus: bool,
    /// Whether the widget ignores activation.
    pub disabled: bool,
}

impl SelectionState {
    /// Current derived mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if !self.open {
            Mode::Closed
        } else if self.search.is_empty() {
            Mode::OpenIdle
        } else {
            Mode::OpenSearching
        }
    }

    /// Whether nothing meaningful is selected.
    ///
    /// A `null` or empty-string selection counts as empty, matching the
    /// behavior of an unset model value.
    #[must_use]
    pub fn is_empty_selection(&self) -> bool {
        match &self.selected {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        }
    }
}
