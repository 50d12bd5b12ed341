//! Expression evaluation interface
//!
//! The widget never evaluates binding expressions itself; the host supplies
//! a compiler that turns expression strings into callables evaluated against
//! a scope value and a set of loop-variable locals. This module defines that
//! contract plus a small dotted-path compiler usable by simple hosts and by
//! the test suite.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Loop-variable bindings passed to compiled expressions next to the scope.
pub type Locals = HashMap<String, Value>;

/// Errors raised when compiling an expression string.
#[derive(Debug, Error)]
pub enum ExprError {
    /// Empty expression source
    #[error("Expected a non-empty expression")]
    Empty,
    /// Expression the compiler cannot handle
    #[error("Cannot compile '{0}': not a dotted property path")]
    NotAPath(String),
}

impl ExprError {
    /// Short machine-readable cause code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        "expr"
    }
}

/// A compiled expression: the callable plus the source it came from.
///
/// Cloning is cheap; the evaluation closure is shared.
#[derive(Clone)]
pub struct CompiledExpr {
    source: String,
    eval: Arc<dyn Fn(&Value, &Locals) -> Value + Send + Sync>,
}

impl CompiledExpr {
    /// Wrap a host-provided evaluation function.
    pub fn new(
        source: impl Into<String>,
        eval: impl Fn(&Value, &Locals) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: source.into(),
            eval: Arc::new(eval),
        }
    }

    /// The expression source this was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a scope and loop-variable locals.
    #[must_use]
    pub fn eval(&self, scope: &Value, locals: &Locals) -> Value {
        (self.eval)(scope, locals)
    }
}

impl fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledExpr").field(&self.source).finish()
    }
}

/// Host-supplied expression compiler.
///
/// `compile` is called eagerly at bind time; evaluation happens on every
/// projection, selection, and model-sync pass.
pub trait ExpressionCompiler {
    /// Compile an expression string into a callable.
    ///
    /// # Errors
    /// Returns an error if the source is not an expression this compiler
    /// understands. Compilation failures surface at bind time, never later.
    fn compile(&self, source: &str) -> Result<CompiledExpr, ExprError>;
}

/// Reference compiler for dotted property paths (`user.address.city`).
///
/// Looks the first segment up in the locals, falling back to the scope, and
/// walks the remaining segments through objects and array indices. Missing
/// segments evaluate to `Null`. Hosts with a real expression language plug
/// in their own [`ExpressionCompiler`] instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathCompiler;

impl ExpressionCompiler for PathCompiler {
    fn compile(&self, source: &str) -> Result<CompiledExpr, ExprError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(ExprError::Empty);
        }
        let mut segments: Vec<String> = trimmed.split('.').map(str::to_owned).collect();
        // Segments are identifiers or numeric array indices.
        if !segments.iter().all(|s| is_identifier(s) || is_index(s)) {
            return Err(ExprError::NotAPath(source.to_string()));
        }
        let head = segments.remove(0);
        let rest = segments;

        Ok(CompiledExpr::new(trimmed, move |scope, locals| {
            let root = match locals.get(head.as_str()) {
                Some(local) => local.clone(),
                None => walk(scope, std::slice::from_ref(&head)),
            };
            walk(&root, &rest)
        }))
    }
}

/// Whether `s` is a bare identifier token (`$` and `_` allowed, as in the
/// binding language).
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn is_index(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn walk(value: &Value, segments: &[String]) -> Value {
    let mut current = value;
    for segment in segments {
        current = match current {
            Value::Object(map) => match map.get(segment.as_str()) {
                Some(v) => v,
                None => return Value::Null,
            },
            Value::Array(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                Some(v) => v,
                None => return Value::Null,
            },
            _ => return Value::Null,
        };
    }
    current.clone()
}

/// How to derive a group key from an item.
///
/// The group-by binding either evaluates to a key function or names a
/// property on each item; the decision is made once when the binding is
/// established, not re-inspected per item.
#[derive(Clone)]
pub enum GroupKey {
    /// Host-provided function mapping an item to its key.
    KeyFn(Arc<dyn Fn(&Value) -> Value + Send + Sync>),
    /// Property name read off each item.
    Property(String),
}

impl GroupKey {
    /// Group by a host-provided key function.
    pub fn key_fn(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self::KeyFn(Arc::new(f))
    }

    /// Group by a property of each item.
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(name.into())
    }

    /// Resolve a group-by expression evaluated against the scope.
    ///
    /// A string result names the property to read off each item; anything
    /// else is coerced to a property name the same way.
    #[must_use]
    pub fn from_scope_expr(expr: &CompiledExpr, scope: &Value) -> Self {
        let resolved = expr.eval(scope, &Locals::new());
        Self::Property(coerce_key(&resolved))
    }

    /// The group key for `item`, as a string.
    #[must_use]
    pub fn key_of(&self, item: &Value) -> String {
        match self {
            Self::KeyFn(f) => coerce_key(&f(item)),
            Self::Property(name) => match item {
                Value::Object(map) => coerce_key(map.get(name.as_str()).unwrap_or(&Value::Null)),
                _ => coerce_key(&Value::Null),
            },
        }
    }
}

impl fmt::Debug for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyFn(_) => f.write_str("GroupKey::KeyFn"),
            Self::Property(name) => f.debug_tuple("GroupKey::Property").field(name).finish(),
        }
    }
}

fn coerce_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
