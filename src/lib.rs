//! Pickbox - an embeddable searchable select/dropdown core
//!
//! This library provides the widget "intelligence" without any rendering:
//! a parser for the `item [as alias] in collection [track by key]` binding
//! language, projection of raw collections into flat or grouped choices,
//! and a selection state machine driven by routed keyboard/mouse input.
//! The host layer renders the state reactively, supplies geometry and raw
//! events, and owns the two-way model binding.

use thiserror::Error;

pub mod binding;
pub mod choices;
pub mod config;
pub mod expr;
pub mod input;
pub mod matcher;
pub mod repeat;
pub mod schedule;
pub mod scroll;
pub mod select;

pub use config::SelectConfig;
pub use input::Key;
pub use select::{Mode, SelectController, SelectHooks, SelectionState};

/// Error enum, contains all failure states of the widget core
#[derive(Debug, Error)]
pub enum SelectWidgetError {
    /// Malformed repeat-binding expression
    #[error("Repeat expression error: {0}")]
    Repeat(#[from] repeat::ParseError),
    /// Source collection could not be projected
    #[error("Choices error: {0}")]
    Choices(#[from] choices::ProjectionError),
    /// Inner expression rejected by the host compiler
    #[error("Expression error: {0}")]
    Expr(#[from] expr::ExprError),
    /// Malformed configuration value
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SelectWidgetError {
    /// Short machine-readable cause code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Repeat(err) => err.code(),
            Self::Choices(err) => err.code(),
            Self::Expr(err) => err.code(),
            Self::Config(err) => err.code(),
        }
    }
}
