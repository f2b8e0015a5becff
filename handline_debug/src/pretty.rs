// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use handline_core::trace::{
    Boundary, BoundaryEvent, Control, ControlEvent, ElementMappedEvent, ElementSkippedEvent,
    FrameEvent, ScheduleEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    /// Skip frame passes that wrote nothing.
    quiet_frames: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("quiet_frames", &self.quiet_frames)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            quiet_frames: false,
        }
    }

    /// Omits `[frame]` lines for passes that issued no surface writes.
    #[must_use]
    pub fn quiet_frames(mut self, quiet: bool) -> Self {
        self.quiet_frames = quiet;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn boundary_name(boundary: Boundary) -> &'static str {
    match boundary {
        Boundary::Start => "start",
        Boundary::End => "end",
    }
}

fn control_name(control: Control) -> &'static str {
    match control {
        Control::Play => "play",
        Control::Stop => "stop",
        Control::Reset => "reset",
        Control::Destroy => "destroy",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_schedule(&mut self, e: &ScheduleEvent) {
        let _ = writeln!(
            self.writer,
            "[schedule] policy={} mapped={} skipped={} frames={:.1} delay_unit={:.2}",
            e.policy, e.mapped, e.skipped, e.frame_length, e.delay_unit,
        );
    }

    fn on_element_mapped(&mut self, e: &ElementMappedEvent) {
        let _ = writeln!(
            self.writer,
            "[map] #{} src={} len={} start={:.1} dur={:.1}",
            e.index, e.source_index, e.length, e.start_at, e.duration,
        );
    }

    fn on_element_skipped(&mut self, e: &ElementSkippedEvent) {
        let _ = writeln!(self.writer, "[skip] src={} (no length)", e.source_index);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        if self.quiet_frames && e.writes == 0 {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[frame] step={} frame={:.1} speed={} writes={}",
            e.step, e.current_frame, e.speed, e.writes,
        );
    }

    fn on_boundary(&mut self, e: &BoundaryEvent) {
        let _ = writeln!(
            self.writer,
            "[boundary] {} at frame {:.1}",
            boundary_name(e.boundary),
            e.current_frame,
        );
    }

    fn on_control(&mut self, e: &ControlEvent) {
        let _ = writeln!(
            self.writer,
            "[control] {} at frame {:.1} speed={}",
            control_name(e.control),
            e.current_frame,
            e.speed,
        );
    }
}
