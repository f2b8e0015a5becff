// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scheduling policies and frame clock for progressive stroke reveal.
//!
//! `handline_core` turns a set of path-like elements into a "hand-drawn"
//! animation: every element gets a window of frames during which its stroke
//! goes from hidden to fully visible. The crate owns the timing only; the
//! shapes themselves live on an external surface that reports lengths and
//! accepts reveal fractions. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Drawables ──► mapper::map() ──► Schedule
//!                                      │
//!                 ┌────────────────────┘
//!                 ▼
//!   DrawDriver::play() ──► FrameScheduler::request_frame()
//!        ▲                              │
//!        └──────── DrawDriver::tick() ◄─┘
//!                      │
//!                      ▼
//!   RevealSurface::set_reveal_fraction()   (only on change)
//! ```
//!
//! **[`config`]**: Policy, start mode and the validated schedule
//! configuration.
//!
//! **[`drawable`]**: The [`Drawable`](drawable::Drawable) and
//! [`RevealSurface`](drawable::RevealSurface) capabilities a host implements.
//!
//! **[`mapper`]**: Assigns a `(start_at, duration)` window to every element
//! according to the configured [`Policy`](config::Policy).
//!
//! **[`scheduler`]**: The injected [`FrameScheduler`](scheduler::FrameScheduler)
//! and a [`ManualScheduler`](scheduler::ManualScheduler) stepper.
//!
//! **[`driver`]**: The frame clock: play, stop, reset, destroy and the
//! per-tick progress pass.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! mapping and frame-loop instrumentation.
//!
//! **[`viewport`]**: Geometric visibility predicate used to trigger
//! autoplay.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod drawable;
pub mod driver;
pub mod error;
pub mod mapper;
pub mod parse;
pub mod scheduler;
pub mod trace;
pub mod viewport;

pub use config::{DrawOptions, Policy, ScheduleConfig, StartMode};
pub use driver::{AnimationStatus, DrawDriver, TickOutcome};
pub use error::ConfigError;
pub use mapper::{Schedule, TimedElement, map};
