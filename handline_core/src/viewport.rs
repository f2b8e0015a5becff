// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical visibility test used to start drawings on scroll.
//!
//! Only the vertical axis is considered. Both rectangles are in document
//! coordinates: the viewport spans `scroll_y..scroll_y + viewport_height`.

use kurbo::Rect;

/// Portion of the element that must be scrolled past the viewport's bottom
/// edge before a scroll-started drawing begins.
pub const SCROLL_START_VISIBLE: f64 = 1.0;

/// Whether `element` counts as inside `viewport`.
///
/// `visible` is the fraction of the element's height that must be above the
/// viewport's bottom edge: `0.0` accepts an element as soon as its top
/// enters, `1.0` only once it is fully shown. Values outside `[0, 1]` are
/// clamped. An element entirely above the viewport is never inside.
#[must_use]
pub fn is_in_viewport(element: Rect, viewport: Rect, visible: f64) -> bool {
    let element = element.abs();
    let viewport = viewport.abs();
    let visible = if visible.is_nan() {
        0.0
    } else {
        visible.clamp(0.0, 1.0)
    };
    element.y0 + element.height() * visible <= viewport.y1 && element.y1 >= viewport.y0
}

/// The document-space viewport for a window scrolled by `scroll_y`.
///
/// The horizontal extent is irrelevant to [`is_in_viewport`] and spans
/// `0..width`.
#[must_use]
pub fn document_viewport(scroll_y: f64, width: f64, height: f64) -> Rect {
    Rect::new(0.0, scroll_y, width, scroll_y + height)
}
