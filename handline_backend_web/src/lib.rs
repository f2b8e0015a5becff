// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for handline.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafScheduler`]: `requestAnimationFrame` frame scheduler
//! - [`SvgPath`] and [`DashSurface`]: SVG geometry measured through
//!   `getTotalLength()` and revealed through `stroke-dasharray` /
//!   `stroke-dashoffset`
//! - [`LiveDrawing`]: maps the paths of an `<svg>` and starts the drawing
//!   manually, immediately or once scrolled into view
//!
//! ```rust,ignore
//! use handline_backend_web::LiveDrawing;
//! use handline_core::{DrawOptions, Policy, ScheduleConfig, StartMode};
//!
//! let options = DrawOptions::new(ScheduleConfig::new(Policy::OneByOne).with_duration(200))
//!     .with_start(StartMode::Autostart);
//! let drawing = LiveDrawing::from_id("logo", &options, None)?;
//! ```

#![no_std]

extern crate alloc;

mod drawing;
mod raf;
mod surface;

pub use drawing::{DrawingError, LiveDrawing, WebDriver};
pub use raf::{RafHandle, RafScheduler};
pub use surface::{DASH_GAP, DashSurface, SvgPath, dash_array, dash_offset};
