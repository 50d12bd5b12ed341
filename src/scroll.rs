//! Highlight visibility
//!
//! Pure geometry: given the viewport and the active row's measurements,
//! compute the scroll offset that keeps the highlight visible. The host
//! measures and applies the returned offset; nothing here touches state.

/// Measurements of the choices viewport and the active row, supplied by the
/// host layer. All values are in the host's pixel/cell unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightGeometry {
    /// Current scroll offset of the choices container.
    pub scroll_top: f32,
    /// Visible height of the choices container.
    pub viewport_height: f32,
    /// Offset of the active row from the top of the scrolled content.
    pub item_top: f32,
    /// Height of the active row.
    pub item_height: f32,
}

/// New scroll offset that keeps the active row visible.
///
/// Scrolls down just enough when the row sits below the viewport, up just
/// enough when it sits above. Going all the way up in a grouped list snaps
/// to zero so the first group's header stays visible.
#[must_use]
pub fn reconcile(geometry: HighlightGeometry, grouped: bool, active_index: usize) -> f32 {
    let pos_y = geometry.item_top + geometry.item_height - geometry.scroll_top;

    if pos_y > geometry.viewport_height {
        geometry.scroll_top + (pos_y - geometry.viewport_height)
    } else if pos_y < geometry.item_height {
        if grouped && active_index == 0 {
            0.0
        } else {
            geometry.scroll_top - (geometry.item_height - pos_y)
        }
    } else {
        geometry.scroll_top
    }
}
