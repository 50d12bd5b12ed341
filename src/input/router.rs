//! Routing tables for the focus proxy and the search input.

use crate::input::keys::Key;
use crate::schedule::Scheduler;
use crate::select::{Deferred, SelectController};
use crossterm::event::KeyEvent;
use serde_json::Value;

/// What a key on the off-screen focus proxy resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyAction {
    /// Clear the current selection (Backspace).
    ClearSelection,
    /// Leave the event to the host's default handling.
    PassThrough,
    /// Open the dropdown without seeding the search.
    Activate,
    /// Open the dropdown seeding the search from the proxy's text buffer,
    /// then clear the buffer.
    ActivateWithBuffer,
}

/// Classify a key arriving on the focus proxy.
#[must_use]
pub const fn route_proxy_key(key: Key) -> ProxyAction {
    match key {
        Key::Backspace => ProxyAction::ClearSelection,
        Key::Tab | Key::Escape | Key::Modifier | Key::Function(_) | Key::Other => {
            ProxyAction::PassThrough
        }
        Key::Down | Key::Up | Key::Enter | Key::Space => ProxyAction::Activate,
        Key::Char(_) => ProxyAction::ActivateWithBuffer,
    }
}

/// Route a focus-proxy key event into the controller.
///
/// `buffer` is the proxy's text buffer; a printable key opens the dropdown
/// seeded with whatever the user already typed there, and the buffer is
/// cleared. Returns whether the event was consumed (i.e. the host should
/// suppress its default handling).
pub fn handle_proxy_key<S: Scheduler<Deferred>>(
    controller: &mut SelectController<S>,
    event: &KeyEvent,
    buffer: &mut String,
) -> bool {
    match route_proxy_key(Key::from(event)) {
        ProxyAction::ClearSelection => {
            controller.select(None);
            true
        }
        ProxyAction::PassThrough => false,
        ProxyAction::Activate => {
            controller.activate(None);
            true
        }
        ProxyAction::ActivateWithBuffer => {
            controller.activate(Some(buffer.as_str()));
            buffer.clear();
            true
        }
    }
}

/// Result of routing a key on the main search input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchKeyOutcome {
    /// Whether the key was consumed by the state machine.
    pub consumed: bool,
    /// Whether the host should suppress its default handling. Tab is
    /// consumed (it selects) but keeps its default focus-move behavior.
    pub suppress_default: bool,
    /// Whether the host should re-run the scroll reconciliation to keep
    /// the highlight visible (after Up/Down).
    pub reconcile_scroll: bool,
}

/// Route a search-input key event into the controller.
pub fn handle_search_key<S: Scheduler<Deferred>>(
    controller: &mut SelectController<S>,
    event: &KeyEvent,
) -> SearchKeyOutcome {
    let key = Key::from(event);
    let consumed = controller.key_navigate(key);
    SearchKeyOutcome {
        consumed,
        suppress_default: consumed && !matches!(key, Key::Tab),
        reconcile_scroll: consumed && matches!(key, Key::Down | Key::Up),
    }
}

/// Mouse hover over a choice row highlights it.
pub fn handle_choice_hover<S: Scheduler<Deferred>>(
    controller: &mut SelectController<S>,
    item: &Value,
) {
    controller.set_active_item(item);
}

/// Mouse click on a choice row selects it.
pub fn handle_choice_click<S: Scheduler<Deferred>>(
    controller: &mut SelectController<S>,
    item: &Value,
) {
    controller.select(Some(item));
}

/// A click anywhere outside the widget closes the dropdown.
pub fn handle_outside_click<S: Scheduler<Deferred>>(controller: &mut SelectController<S>) {
    controller.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectConfig;
    use crate::expr::PathCompiler;
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn controller() -> SelectController {
        let mut ctrl = SelectController::new(SelectConfig::default());
        ctrl.bind_repeat("x in items", None, &PathCompiler).unwrap();
        ctrl.set_source_items(Some(&json!(["a", "b", "c"]))).unwrap();
        ctrl
    }

    fn event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_proxy_routing_table() {
        assert_eq!(route_proxy_key(Key::Backspace), ProxyAction::ClearSelection);
        assert_eq!(route_proxy_key(Key::Tab), ProxyAction::PassThrough);
        assert_eq!(route_proxy_key(Key::Escape), ProxyAction::PassThrough);
        assert_eq!(route_proxy_key(Key::Modifier), ProxyAction::PassThrough);
        assert_eq!(route_proxy_key(Key::Function(7)), ProxyAction::PassThrough);
        assert_eq!(route_proxy_key(Key::Other), ProxyAction::PassThrough);
        assert_eq!(route_proxy_key(Key::Down), ProxyAction::Activate);
        assert_eq!(route_proxy_key(Key::Up), ProxyAction::Activate);
        assert_eq!(route_proxy_key(Key::Enter), ProxyAction::Activate);
        assert_eq!(route_proxy_key(Key::Space), ProxyAction::Activate);
        assert_eq!(route_proxy_key(Key::Char('q')), ProxyAction::ActivateWithBuffer);
    }

    #[test]
    fn test_proxy_backspace_clears_selection() {
        let mut ctrl = controller();
        ctrl.select(Some(&json!("b")));
        assert!(!ctrl.is_empty());

        let mut buffer = String::new();
        assert!(handle_proxy_key(&mut ctrl, &event(KeyCode::Backspace), &mut buffer));
        assert!(ctrl.is_empty());
    }

    #[test]
    fn test_proxy_enter_opens_without_seed() {
        let mut ctrl = controller();
        let mut buffer = String::new();
        assert!(handle_proxy_key(&mut ctrl, &event(KeyCode::Enter), &mut buffer));
        assert!(ctrl.state().open);
        ctrl.tick(std::time::Duration::ZERO);
        assert_eq!(ctrl.state().search, "");
    }

    #[test]
    fn test_proxy_printable_opens_seeded_and_clears_buffer() {
        let mut ctrl = controller();
        let mut buffer = String::from("qu");
        assert!(handle_proxy_key(&mut ctrl, &event(KeyCode::Char('u')), &mut buffer));
        assert!(ctrl.state().open);
        assert!(buffer.is_empty());

        ctrl.tick(std::time::Duration::ZERO);
        assert_eq!(ctrl.state().search, "qu");
    }

    #[test]
    fn test_proxy_modifier_chord_passes_through() {
        let mut ctrl = controller();
        let mut buffer = String::new();
        let chord = KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL);
        assert!(!handle_proxy_key(&mut ctrl, &chord, &mut buffer));
        assert!(!ctrl.state().open);
    }

    #[test]
    fn test_search_down_navigates_and_reconciles() {
        let mut ctrl = controller();
        let outcome = handle_search_key(&mut ctrl, &event(KeyCode::Down));
        assert!(outcome.consumed);
        assert!(outcome.suppress_default);
        assert!(outcome.reconcile_scroll);
        assert_eq!(ctrl.state().active_index, 1);
    }

    #[test]
    fn test_search_tab_selects_without_suppressing_default() {
        let mut ctrl = controller();
        ctrl.activate(None);
        let outcome = handle_search_key(&mut ctrl, &event(KeyCode::Tab));
        assert!(outcome.consumed);
        assert!(!outcome.suppress_default);
        assert!(!outcome.reconcile_scroll);
        assert_eq!(ctrl.state().selected, Some(json!("a")));
    }

    #[test]
    fn test_search_printable_not_consumed() {
        let mut ctrl = controller();
        let outcome = handle_search_key(&mut ctrl, &event(KeyCode::Char('x')));
        assert!(!outcome.consumed);
        assert!(!outcome.suppress_default);
    }

    #[test]
    fn test_mouse_hover_and_click() {
        let mut ctrl = controller();
        handle_choice_hover(&mut ctrl, &json!("c"));
        assert_eq!(ctrl.state().active_index, 2);

        handle_choice_click(&mut ctrl, &json!("c"));
        assert_eq!(ctrl.state().selected, Some(json!("c")));
        assert!(!ctrl.state().open);
    }

    #[test]
    fn test_outside_click_closes() {
        let mut ctrl = controller();
        ctrl.activate(None);
        handle_outside_click(&mut ctrl);
        assert!(!ctrl.state().open);
    }
}
