// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for mapping and the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! mapper and the driver call at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! These events are for tooling (recording, Chrome trace export). Log-style
//! diagnostics go through `tracing` regardless of this feature.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use crate::config::Policy;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which end of the clock was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// The frame counter fell to zero or below (reverse playback).
    Start,
    /// The frame counter reached the terminal frame length.
    End,
}

/// Which control operation was invoked on the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// `play` was called while idle.
    Play,
    /// A held frame registration was cancelled.
    Stop,
    /// The clock was rewound to zero.
    Reset,
    /// Reveal styling was removed.
    Destroy,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once when mapping completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleEvent {
    /// Policy used for the mapping.
    pub policy: Policy,
    /// Number of elements in the schedule.
    pub mapped: u32,
    /// Number of elements left out because their length was unknown.
    pub skipped: u32,
    /// Terminal frame length of the clock.
    pub frame_length: f64,
    /// Frames between consecutive element starts.
    pub delay_unit: f64,
}

/// Emitted for every element placed in the schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementMappedEvent {
    /// Position in the schedule.
    pub index: u32,
    /// Position in the input sequence.
    pub source_index: u32,
    /// Stroke length, rounded up.
    pub length: u32,
    /// First frame of the reveal.
    pub start_at: f64,
    /// Number of frames the reveal lasts.
    pub duration: f64,
}

/// Emitted for every element left out of the schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementSkippedEvent {
    /// Position in the input sequence.
    pub source_index: u32,
}

/// Emitted after each progress pass of the driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEvent {
    /// Number of progress passes since the driver was created.
    pub step: u64,
    /// Clock value the fractions were derived from.
    pub current_frame: f64,
    /// Speed at the time of the pass.
    pub speed: f64,
    /// Number of surface writes the pass issued.
    pub writes: u32,
}

/// Emitted when the clock hits one of its ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryEvent {
    /// Which end.
    pub boundary: Boundary,
    /// Clock value after clamping.
    pub current_frame: f64,
}

/// Emitted for control operations on the driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlEvent {
    /// Which operation.
    pub control: Control,
    /// Clock value when the operation ran.
    pub current_frame: f64,
    /// Speed when the operation ran.
    pub speed: f64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the mapper and the driver.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called once mapping has finished.
    fn on_schedule(&mut self, e: &ScheduleEvent) {
        _ = e;
    }

    /// Called for every element placed in the schedule.
    fn on_element_mapped(&mut self, e: &ElementMappedEvent) {
        _ = e;
    }

    /// Called for every element whose length could not be determined.
    fn on_element_skipped(&mut self, e: &ElementSkippedEvent) {
        _ = e;
    }

    /// Called after each progress pass.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when the clock reaches its start or end.
    fn on_boundary(&mut self, e: &BoundaryEvent) {
        _ = e;
    }

    /// Called for play, stop, reset and destroy.
    fn on_control(&mut self, e: &ControlEvent) {
        _ = e;
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn on_schedule(&mut self, e: &ScheduleEvent) {
        (**self).on_schedule(e);
    }
    fn on_element_mapped(&mut self, e: &ElementMappedEvent) {
        (**self).on_element_mapped(e);
    }
    fn on_element_skipped(&mut self, e: &ElementSkippedEvent) {
        (**self).on_element_skipped(e);
    }
    fn on_frame(&mut self, e: &FrameEvent) {
        (**self).on_frame(e);
    }
    fn on_boundary(&mut self, e: &BoundaryEvent) {
        (**self).on_boundary(e);
    }
    fn on_control(&mut self, e: &ControlEvent) {
        (**self).on_control(e);
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn on_schedule(&mut self, e: &ScheduleEvent) {
        (**self).on_schedule(e);
    }
    fn on_element_mapped(&mut self, e: &ElementMappedEvent) {
        (**self).on_element_mapped(e);
    }
    fn on_element_skipped(&mut self, e: &ElementSkippedEvent) {
        (**self).on_element_skipped(e);
    }
    fn on_frame(&mut self, e: &FrameEvent) {
        (**self).on_frame(e);
    }
    fn on_boundary(&mut self, e: &BoundaryEvent) {
        (**self).on_boundary(e);
    }
    fn on_control(&mut self, e: &ControlEvent) {
        (**self).on_control(e);
    }
}

/// Shared sinks, so a host can keep reading a sink the driver owns a handle
/// to.
impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn on_schedule(&mut self, e: &ScheduleEvent) {
        self.borrow_mut().on_schedule(e);
    }
    fn on_element_mapped(&mut self, e: &ElementMappedEvent) {
        self.borrow_mut().on_element_mapped(e);
    }
    fn on_element_skipped(&mut self, e: &ElementSkippedEvent) {
        self.borrow_mut().on_element_skipped(e);
    }
    fn on_frame(&mut self, e: &FrameEvent) {
        self.borrow_mut().on_frame(e);
    }
    fn on_boundary(&mut self, e: &BoundaryEvent) {
        self.borrow_mut().on_boundary(e);
    }
    fn on_control(&mut self, e: &ControlEvent) {
        self.borrow_mut().on_control(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer for an optional owned sink.
    #[inline]
    #[must_use]
    pub fn from_option(sink: Option<&'a mut (dyn TraceSink + 'static)>) -> Self {
        match sink {
            Some(sink) => Self::new(sink),
            None => Self::none(),
        }
    }

    /// Emits a [`ScheduleEvent`].
    #[inline]
    pub fn schedule(&mut self, e: &ScheduleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_schedule(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ElementMappedEvent`].
    #[inline]
    pub fn element_mapped(&mut self, e: &ElementMappedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_element_mapped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ElementSkippedEvent`].
    #[inline]
    pub fn element_skipped(&mut self, e: &ElementSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_element_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BoundaryEvent`].
    #[inline]
    pub fn boundary(&mut self, e: &BoundaryEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_boundary(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ControlEvent`].
    #[inline]
    pub fn control(&mut self, e: &ControlEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_control(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

/// Saturating `usize` to `u32` conversion for event counters.
pub(crate) fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
