//! Repeat-expression binding
//!
//! The choices list is bound with a small declarative language:
//!
//! ```text
//! [mapped as] item in collection [track by key]
//! ```
//!
//! e.g. `person.name as person in people track by person.id`. Parsing
//! happens once per binding and yields an immutable [`RepeatDescriptor`];
//! the inner expressions are compiled by the host's
//! [`ExpressionCompiler`](crate::expr::ExpressionCompiler).

pub mod parser;
pub mod types;

pub use parser::{ParseError, group_repeat_expression, item_repeat_expression, parse};
pub use types::{RepeatDescriptor, TrackBy};
