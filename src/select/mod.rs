//! Selection state machine
//!
//! The behavioral core of the widget: one controller owns the selection
//! state and is the only thing that mutates it. Hosts feed it parsed
//! bindings, collection snapshots, and routed input, and observe the state
//! reactively.

pub mod controller;
pub mod state;

pub use controller::{Deferred, SelectController, SelectHooks};
pub use state::{Mode, SelectionState};
