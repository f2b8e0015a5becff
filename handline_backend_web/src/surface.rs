// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG stroke-dash reveal.
//!
//! A stroke of length `L` gets the dash pattern `L (L + gap)`: one dash as
//! long as the whole path followed by a slightly longer gap. Shifting the
//! pattern with `stroke-dashoffset` from `L` (hidden) down to `0` (fully
//! drawn) makes the stroke appear to be traced.

use alloc::format;
use alloc::string::String;

use handline_core::drawable::{Drawable, RevealSurface};
use handline_core::mapper::TimedElement;
use web_sys::SvgGeometryElement;

/// Extra space after the dash so no second dash peeks through.
pub const DASH_GAP: u32 = 10;

/// A `<path>` (or other geometry) element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgPath(SvgGeometryElement);

impl SvgPath {
    /// Wraps an SVG geometry element.
    #[must_use]
    pub fn new(element: SvgGeometryElement) -> Self {
        Self(element)
    }

    /// The wrapped element.
    #[must_use]
    pub fn element(&self) -> &SvgGeometryElement {
        &self.0
    }
}

impl Drawable for SvgPath {
    fn total_length(&self) -> Option<f64> {
        Some(f64::from(self.0.get_total_length()))
    }

    fn override_attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }
}

/// Writes reveal fractions as inline `stroke-dasharray` and
/// `stroke-dashoffset` styles.
#[derive(Clone, Copy, Debug, Default)]
pub struct DashSurface;

impl RevealSurface for DashSurface {
    type Element = SvgPath;

    fn prepare(&mut self, timed: &TimedElement<SvgPath>) {
        let style = timed.element.0.style();
        let _ = style.set_property("stroke-dasharray", &dash_array(timed.length));
        let _ = style.set_property("stroke-dashoffset", &format!("{}", timed.length));
    }

    fn set_reveal_fraction(&mut self, timed: &TimedElement<SvgPath>, fraction: f64) {
        let offset = dash_offset(timed.length, fraction);
        let _ = timed
            .element
            .0
            .style()
            .set_property("stroke-dashoffset", &format!("{offset}"));
    }

    fn clear_reveal(&mut self, timed: &TimedElement<SvgPath>) {
        let style = timed.element.0.style();
        let _ = style.remove_property("stroke-dashoffset");
        let _ = style.remove_property("stroke-dasharray");
    }
}

/// `stroke-dasharray` value for a stroke of `length`.
#[must_use]
pub fn dash_array(length: u32) -> String {
    format!("{length} {}", length.saturating_add(DASH_GAP))
}

/// `stroke-dashoffset` that shows `fraction` of a stroke of `length`,
/// rounded down to a whole unit.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "non-negative and at most `length`; truncation is the floor"
)]
pub fn dash_offset(length: u32, fraction: f64) -> u32 {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    (f64::from(length) * (1.0 - fraction)) as u32
}
