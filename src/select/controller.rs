//! The selection controller.
//!
//! Every user interaction and collection change resolves here,
//! synchronously and atomically. The two deferred side effects (focus
//! transfer, refresh debounce) go through the injected scheduler and are
//! delivered back on the host's next `tick`.

use crate::choices::{self, ProjectionError};
use crate::config::SelectConfig;
use crate::expr::{ExpressionCompiler, GroupKey};
use crate::input::Key;
use crate::repeat::{self, ParseError, RepeatDescriptor};
use crate::schedule::{ManualScheduler, Scheduler, TaskHandle};
use crate::select::state::{Mode, SelectionState};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// Work the controller defers to the host's next scheduling turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// Focus the search input after the dropdown has had a chance to
    /// render, optionally seeding the search text first.
    FocusSearch {
        /// Search text to seed before focusing.
        seed: Option<String>,
    },
    /// Return keyboard focus to the off-screen focus proxy.
    FocusProxy,
    /// Evaluate the debounced refresh trigger.
    Refresh,
}

/// Host callbacks. Absent hooks make the corresponding operation a no-op.
#[derive(Default)]
pub struct SelectHooks {
    /// Fired on every selection with the item and its mapped model value.
    pub on_select: Option<Box<dyn FnMut(Option<&Value>, &Value)>>,
    /// Moves keyboard focus into the search input.
    pub focus_search: Option<Box<dyn FnMut()>>,
    /// Moves keyboard focus back to the focus proxy.
    pub focus_proxy: Option<Box<dyn FnMut()>>,
    /// The refresh trigger for typeahead/remote search.
    pub refresh: Option<Box<dyn FnMut()>>,
}

/// Owns and mutates [`SelectionState`]; the behavioral core of the widget.
pub struct SelectController<S: Scheduler<Deferred> = ManualScheduler<Deferred>> {
    state: SelectionState,
    config: SelectConfig,
    hooks: SelectHooks,
    scheduler: S,
    descriptor: Option<RepeatDescriptor>,
    group_by: Option<GroupKey>,
    scope: Value,
    pending_refresh: Option<TaskHandle>,
}

impl SelectController<ManualScheduler<Deferred>> {
    /// Create a controller with the default manual scheduler.
    #[must_use]
    pub fn new(config: SelectConfig) -> Self {
        Self::with_scheduler(config, ManualScheduler::new())
    }
}

impl<S: Scheduler<Deferred>> SelectController<S> {
    /// Create a controller driven by a host-supplied scheduler.
    pub fn with_scheduler(config: SelectConfig, scheduler: S) -> Self {
        Self {
            state: SelectionState::default(),
            config,
            hooks: SelectHooks::default(),
            scheduler,
            descriptor: None,
            group_by: None,
            scope: Value::Null,
            pending_refresh: None,
        }
    }

    /// Install host callbacks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: SelectHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Current widget state, for reactive rendering.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Widget configuration.
    #[must_use]
    pub const fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Current derived mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// The parsed repeat binding, once bound.
    #[must_use]
    pub const fn descriptor(&self) -> Option<&RepeatDescriptor> {
        self.descriptor.as_ref()
    }

    /// Mutable access to the host callbacks.
    pub const fn hooks_mut(&mut self) -> &mut SelectHooks {
        &mut self.hooks
    }

    /// Set the scope expressions evaluate against.
    pub fn set_scope(&mut self, scope: Value) {
        self.scope = scope;
    }

    /// Enable or disable the widget. Disabled widgets ignore activation.
    pub const fn set_disabled(&mut self, disabled: bool) {
        self.state.disabled = disabled;
    }

    /// Record whether the widget holds keyboard focus (host-observed).
    pub const fn set_focus(&mut self, focus: bool) {
        self.state.focus = focus;
    }

    /// Parse and install the repeat binding. Called once per binding.
    ///
    /// # Errors
    /// Fails when the expression does not match the repeat grammar.
    pub fn bind_repeat(
        &mut self,
        expression: &str,
        group_by: Option<GroupKey>,
        compiler: &dyn ExpressionCompiler,
    ) -> Result<(), ParseError> {
        self.descriptor = Some(repeat::parse(expression, compiler)?);
        self.state.is_grouped = group_by.is_some();
        self.group_by = group_by;
        Ok(())
    }

    /// Re-project a fresh source-collection snapshot into the choices list.
    ///
    /// The host calls this on every collection change; the controller never
    /// diffs, it recomputes. The active index is clamped to the new list.
    ///
    /// # Errors
    /// Fails when the snapshot is present but not an array.
    pub fn set_source_items(&mut self, raw: Option<&Value>) -> Result<(), ProjectionError> {
        let projection = choices::project(raw, self.group_by.as_ref())?;
        self.state.items = projection.items;
        self.state.groups = projection.groups;
        if self.state.active_index >= self.state.items.len() {
            self.state.active_index = self.state.items.len().saturating_sub(1);
        }
        trace!(choices = self.state.items.len(), "source collection projected");
        Ok(())
    }

    /// Open the dropdown, optionally seeding the search text.
    ///
    /// The transition to open is synchronous; focusing the search input
    /// (and applying the seed) is deferred to the next scheduling turn so
    /// the dropdown has a rendering opportunity first. An empty seed counts
    /// as absent.
    pub fn activate(&mut self, initial_search: Option<&str>) {
        if self.state.disabled {
            return;
        }
        self.reset_search_input();
        self.state.open = true;
        debug!("dropdown opened");

        let seed = initial_search
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        self.scheduler
            .schedule(Duration::ZERO, Deferred::FocusSearch { seed });
    }

    /// Close the dropdown. No-op when already closed.
    pub fn close(&mut self) {
        if !self.state.open {
            return;
        }
        self.reset_search_input();
        self.state.open = false;
        debug!("dropdown closed");

        self.scheduler.schedule(Duration::ZERO, Deferred::FocusProxy);
    }

    /// Select a choice (or clear the selection with `None`).
    ///
    /// Fires the on-select hook with the item and its mapped model value,
    /// records the selection, and closes the dropdown. Propagating the new
    /// selection into the external model belongs to the binding layer.
    pub fn select(&mut self, item: Option<&Value>) {
        let model = match (item, &self.descriptor) {
            (Some(item), Some(descriptor)) => descriptor.map_model(&self.scope, item),
            (Some(item), None) => item.clone(),
            (None, _) => Value::Null,
        };
        if let Some(on_select) = self.hooks.on_select.as_mut() {
            on_select(item, &model);
        }
        self.state.selected = item.cloned();
        debug!(model = %model, "choice selected");
        self.close();
    }

    /// Highlight `item` (mouse hover). An item absent from the choices
    /// list leaves the highlight unchanged.
    pub fn set_active_item(&mut self, item: &Value) {
        if let Some(index) = self.item_index(item) {
            self.state.active_index = index;
        }
    }

    /// Whether `item` is the highlighted choice.
    #[must_use]
    pub fn is_active(&self, item: &Value) -> bool {
        self.item_index(item) == Some(self.state.active_index)
    }

    /// Whether nothing meaningful is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty_selection()
    }

    /// Replace the search text: resets the highlight to the top and
    /// debounces the refresh trigger.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.search = text.into();
        self.state.active_index = 0;
        self.refresh();
    }

    /// Debounce the refresh trigger for typeahead/remote search.
    ///
    /// Cancels any pending evaluation and schedules a new one after the
    /// configured delay; only the last call within the window fires. No-op
    /// when no refresh hook is configured.
    pub fn refresh(&mut self) {
        if self.hooks.refresh.is_none() {
            return;
        }
        if let Some(handle) = self.pending_refresh.take() {
            self.scheduler.cancel(handle);
        }
        let delay = self.config.refresh_delay();
        self.pending_refresh = Some(self.scheduler.schedule(delay, Deferred::Refresh));
        trace!(delay_ms = self.config.refresh_delay_ms, "refresh debounced");
    }

    /// Resolve a navigation key into a state transition.
    ///
    /// Returns whether the key was consumed, so the caller can decide
    /// whether to suppress the host's default handling.
    pub fn key_navigate(&mut self, key: Key) -> bool {
        match key {
            Key::Down => {
                if self.state.active_index + 1 < self.state.items.len() {
                    self.state.active_index += 1;
                }
                true
            }
            Key::Up => {
                if self.state.active_index > 0 {
                    self.state.active_index -= 1;
                }
                true
            }
            Key::Tab | Key::Enter => {
                let current = self.state.items.get(self.state.active_index).cloned();
                self.select(current.as_ref());
                true
            }
            Key::Escape => {
                self.close();
                true
            }
            _ => false,
        }
    }

    /// Pump the scheduler: deliver the deferred work that came due.
    pub fn tick(&mut self, elapsed: Duration) {
        let due = self.scheduler.advance(elapsed);
        for task in due {
            self.run_deferred(task);
        }
    }

    /// Whether deferred work is still pending.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Detach the widget: cancels pending deferred work and drops all host
    /// callbacks so nothing fires after teardown.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending_refresh.take() {
            self.scheduler.cancel(handle);
        }
        self.hooks = SelectHooks::default();
        debug!("controller torn down");
    }

    fn run_deferred(&mut self, task: Deferred) {
        match task {
            Deferred::FocusSearch { seed } => {
                if let Some(seed) = seed {
                    self.set_search(seed);
                }
                if let Some(focus_search) = self.hooks.focus_search.as_mut() {
                    focus_search();
                }
            }
            Deferred::FocusProxy => {
                if let Some(focus_proxy) = self.hooks.focus_proxy.as_mut() {
                    focus_proxy();
                }
            }
            Deferred::Refresh => {
                self.pending_refresh = None;
                if let Some(refresh) = self.hooks.refresh.as_mut() {
                    refresh();
                }
            }
        }
    }

    /// Search-reset policy applied on open and close: clears the search
    /// and re-seeds the highlight from the current selection's position.
    fn reset_search_input(&mut self) {
        if !self.config.reset_search_input {
            return;
        }
        self.state.search.clear();
        if let Some(selected) = self.state.selected.clone()
            && !self.state.items.is_empty()
            && let Some(index) = self.item_index(&selected)
        {
            self.state.active_index = index;
        }
    }

    fn item_index(&self, item: &Value) -> Option<usize> {
        match &self.descriptor {
            Some(descriptor) => descriptor.item_index(&self.scope, &self.state.items, item),
            None => self.state.items.iter().position(|candidate| candidate == item),
        }
    }
}
