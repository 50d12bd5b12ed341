//! Input routing
//!
//! Maps raw key events to state-machine operations. One shared [`Key`]
//! table serves both the focus-proxy router and the search-input router;
//! the mapping itself is pure and carries no widget state.

pub mod keys;
pub mod router;

pub use keys::Key;
pub use router::{
    ProxyAction, SearchKeyOutcome, handle_choice_click, handle_choice_hover, handle_outside_click,
    handle_proxy_key, handle_search_key, route_proxy_key,
};
