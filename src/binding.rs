//! Two-way model sync helpers
//!
//! The external binding layer owns watch/observe wiring; these are the two
//! pure conversions it installs. View → model maps the displayed item
//! through the binding's mapper expression; model → view finds the source
//! item whose mapped value matches the model, scanning from the end of the
//! collection (last match wins).

use crate::expr::Locals;
use crate::repeat::RepeatDescriptor;
use serde_json::Value;

/// Map a displayed item to its external model value.
#[must_use]
pub fn view_to_model(descriptor: &RepeatDescriptor, scope: &Value, item: &Value) -> Value {
    descriptor.map_model(scope, item)
}

/// Resolve an external model value back to a source item.
///
/// Evaluates the binding's source collection against the scope and returns
/// the last item whose mapped model value equals `model`. When nothing
/// matches (or the source is not a collection) the model value passes
/// through unchanged, mirroring an unresolvable formatter input.
#[must_use]
pub fn model_to_view(descriptor: &RepeatDescriptor, scope: &Value, model: &Value) -> Value {
    if let Value::Array(data) = descriptor.source().eval(scope, &Locals::new()) {
        for item in data.iter().rev() {
            if descriptor.map_model(scope, item) == *model {
                return item.clone();
            }
        }
    }
    model.clone()
}
