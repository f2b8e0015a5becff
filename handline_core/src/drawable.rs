// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for the shapes being drawn.
//!
//! The core never owns shapes. A host provides two capabilities:
//!
//! - **[`Drawable`]**: implemented by the element handle itself. The
//!   [mapper](crate::mapper::map) uses it to measure the stroke length and to
//!   read per-element scheduling overrides (`data-start`, `data-duration`,
//!   `data-delay`, `data-async`).
//!
//! - **[`RevealSurface`]**: the write side. The
//!   [`DrawDriver`](crate::driver::DrawDriver) calls it to show a fraction of
//!   each element's stroke, only when that fraction changed since the last
//!   write.
//!
//! In a browser both are backed by SVG path elements and their
//! `stroke-dasharray`/`stroke-dashoffset` styles; in tests they are plain
//! structs recording every call.

use alloc::string::String;

use crate::mapper::TimedElement;

/// Per-element override attribute names.
pub mod attr {
    /// Start frame of the element (`scenario`).
    pub const START: &str = "data-start";
    /// Duration of the element in frames (`scenario`, `scenario-sync`).
    pub const DURATION: &str = "data-duration";
    /// Delay after the previous element (`scenario-sync`).
    pub const DELAY: &str = "data-delay";
    /// Marks an element as running in parallel with the next one
    /// (`scenario-sync`). Only its presence matters.
    pub const ASYNC: &str = "data-async";
}

/// A shape whose stroke can be traced.
pub trait Drawable {
    /// Total length of the stroke, in user units.
    ///
    /// `None` (or a non-finite value) means the length cannot be determined;
    /// such an element is left out of the schedule.
    fn total_length(&self) -> Option<f64>;

    /// Reads a per-element scheduling override.
    ///
    /// Returns `None` when the attribute is absent. The default
    /// implementation carries no overrides.
    fn override_attribute(&self, name: &str) -> Option<String> {
        _ = name;
        None
    }
}

/// Applies reveal fractions to the shapes of a [`Schedule`](crate::mapper::Schedule).
pub trait RevealSurface {
    /// The element handle type, as stored in [`TimedElement::element`].
    type Element;

    /// Called once per element when the driver is created, before any
    /// fraction is written. Hosts set up whatever presentation state the
    /// reveal needs (for SVG, the dash pattern) and hide the stroke.
    fn prepare(&mut self, element: &TimedElement<Self::Element>) {
        _ = element;
    }

    /// Shows `fraction` of the element's stroke. `fraction` is always in
    /// `[0, 1]`.
    fn set_reveal_fraction(&mut self, element: &TimedElement<Self::Element>, fraction: f64);

    /// Removes all reveal-related presentation state from the element.
    fn clear_reveal(&mut self, element: &TimedElement<Self::Element>);
}
