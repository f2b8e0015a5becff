// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! The drawing clock counts frames, not time, so timestamps are synthesized:
//! frame `n` is placed at `n × frame_us` microseconds. Mapped elements become
//! complete (`X`) events on their own track, showing the schedule as a Gantt
//! chart. Progress passes become counter (`C`) events placed by step, so
//! reverse playback still reads left to right.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// One frame at 60 Hz, in microseconds.
pub const FRAME_US_60HZ: f64 = 1_000_000.0 / 60.0;

/// Track of the schedule summary and playback events.
const PLAYBACK_TID: u32 = 0;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// `frame_us` is the duration assigned to one frame (or one progress step).
pub fn export(bytes: &[u8], frame_us: f64, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Playback events carry no step; they are placed at the last seen one.
    let mut last_step = 0_u64;
    let steps_to_us = |step: u64| step as f64 * frame_us;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Schedule(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Schedule",
                    "cat": "Mapping",
                    "ts": 0,
                    "pid": 0,
                    "tid": PLAYBACK_TID,
                    "s": "g",
                    "args": {
                        "policy": e.policy.as_str(),
                        "mapped": e.mapped,
                        "skipped": e.skipped,
                        "frame_length": e.frame_length,
                        "delay_unit": e.delay_unit,
                    }
                }));
            }
            RecordedEvent::ElementMapped(e) => {
                events.push(json!({
                    "ph": "X",
                    "name": format!("element {}", e.source_index),
                    "cat": "Mapping",
                    "ts": e.start_at * frame_us,
                    "dur": e.duration * frame_us,
                    "pid": 0,
                    "tid": e.index.saturating_add(1),
                    "args": {
                        "length": e.length,
                        "start_at": e.start_at,
                        "duration": e.duration,
                    }
                }));
            }
            RecordedEvent::ElementSkipped(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ElementSkipped",
                    "cat": "Mapping",
                    "ts": 0,
                    "pid": 0,
                    "tid": PLAYBACK_TID,
                    "s": "t",
                    "args": {
                        "source_index": e.source_index,
                    }
                }));
            }
            RecordedEvent::Frame(e) => {
                last_step = e.step;
                events.push(json!({
                    "ph": "C",
                    "name": "Clock",
                    "cat": "Playback",
                    "ts": steps_to_us(e.step),
                    "pid": 1,
                    "tid": PLAYBACK_TID,
                    "args": {
                        "frame": e.current_frame,
                        "writes": e.writes,
                    }
                }));
            }
            RecordedEvent::Boundary(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.boundary),
                    "cat": "Playback",
                    "ts": steps_to_us(last_step),
                    "pid": 1,
                    "tid": PLAYBACK_TID,
                    "s": "p",
                    "args": {
                        "frame": e.current_frame,
                    }
                }));
            }
            RecordedEvent::Control(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.control),
                    "cat": "Control",
                    "ts": steps_to_us(last_step),
                    "pid": 1,
                    "tid": PLAYBACK_TID,
                    "s": "t",
                    "args": {
                        "frame": e.current_frame,
                        "speed": e.speed,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}
