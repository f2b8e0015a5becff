// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records (floats as their IEEE 754
//! bits). [`decode`] reads them back as an iterator of [`RecordedEvent`].

use handline_core::Policy;
use handline_core::trace::{
    Boundary, BoundaryEvent, Control, ControlEvent, ElementMappedEvent, ElementSkippedEvent,
    FrameEvent, ScheduleEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SCHEDULE: u8 = 1;
const TAG_ELEMENT_MAPPED: u8 = 2;
const TAG_ELEMENT_SKIPPED: u8 = 3;
const TAG_FRAME: u8 = 4;
const TAG_BOUNDARY: u8 = 5;
const TAG_CONTROL: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_policy(&mut self, p: Policy) {
        self.write_u8(match p {
            Policy::Delayed => 0,
            Policy::Async => 1,
            Policy::OneByOne => 2,
            Policy::Scenario => 3,
            Policy::ScenarioSync => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_schedule(&mut self, e: &ScheduleEvent) {
        self.write_u8(TAG_SCHEDULE);
        self.write_policy(e.policy);
        self.write_u32(e.mapped);
        self.write_u32(e.skipped);
        self.write_f64(e.frame_length);
        self.write_f64(e.delay_unit);
    }

    fn on_element_mapped(&mut self, e: &ElementMappedEvent) {
        self.write_u8(TAG_ELEMENT_MAPPED);
        self.write_u32(e.index);
        self.write_u32(e.source_index);
        self.write_u32(e.length);
        self.write_f64(e.start_at);
        self.write_f64(e.duration);
    }

    fn on_element_skipped(&mut self, e: &ElementSkippedEvent) {
        self.write_u8(TAG_ELEMENT_SKIPPED);
        self.write_u32(e.source_index);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.step);
        self.write_f64(e.current_frame);
        self.write_f64(e.speed);
        self.write_u32(e.writes);
    }

    fn on_boundary(&mut self, e: &BoundaryEvent) {
        self.write_u8(TAG_BOUNDARY);
        self.write_u8(match e.boundary {
            Boundary::Start => 0,
            Boundary::End => 1,
        });
        self.write_f64(e.current_frame);
    }

    fn on_control(&mut self, e: &ControlEvent) {
        self.write_u8(TAG_CONTROL);
        self.write_u8(match e.control {
            Control::Play => 0,
            Control::Stop => 1,
            Control::Reset => 2,
            Control::Destroy => 3,
        });
        self.write_f64(e.current_frame);
        self.write_f64(e.speed);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`ScheduleEvent`].
    Schedule(ScheduleEvent),
    /// An [`ElementMappedEvent`].
    ElementMapped(ElementMappedEvent),
    /// An [`ElementSkippedEvent`].
    ElementSkipped(ElementSkippedEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`BoundaryEvent`].
    Boundary(BoundaryEvent),
    /// A [`ControlEvent`].
    Control(ControlEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first truncated record or unknown tag.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_policy(&mut self) -> Option<Policy> {
        Policy::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn decode_schedule(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Schedule(ScheduleEvent {
            policy: self.read_policy()?,
            mapped: self.read_u32()?,
            skipped: self.read_u32()?,
            frame_length: self.read_f64()?,
            delay_unit: self.read_f64()?,
        }))
    }

    fn decode_element_mapped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ElementMapped(ElementMappedEvent {
            index: self.read_u32()?,
            source_index: self.read_u32()?,
            length: self.read_u32()?,
            start_at: self.read_f64()?,
            duration: self.read_f64()?,
        }))
    }

    fn decode_element_skipped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ElementSkipped(ElementSkippedEvent {
            source_index: self.read_u32()?,
        }))
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            step: self.read_u64()?,
            current_frame: self.read_f64()?,
            speed: self.read_f64()?,
            writes: self.read_u32()?,
        }))
    }

    fn decode_boundary(&mut self) -> Option<RecordedEvent> {
        let boundary = match self.read_u8()? {
            0 => Boundary::Start,
            _ => Boundary::End,
        };
        Some(RecordedEvent::Boundary(BoundaryEvent {
            boundary,
            current_frame: self.read_f64()?,
        }))
    }

    fn decode_control(&mut self) -> Option<RecordedEvent> {
        let control = match self.read_u8()? {
            0 => Control::Play,
            1 => Control::Stop,
            2 => Control::Reset,
            _ => Control::Destroy,
        };
        Some(RecordedEvent::Control(ControlEvent {
            control,
            current_frame: self.read_f64()?,
            speed: self.read_f64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_SCHEDULE => self.decode_schedule(),
            TAG_ELEMENT_MAPPED => self.decode_element_mapped(),
            TAG_ELEMENT_SKIPPED => self.decode_element_skipped(),
            TAG_FRAME => self.decode_frame(),
            TAG_BOUNDARY => self.decode_boundary(),
            TAG_CONTROL => self.decode_control(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use handline_core::drawable::{Drawable, RevealSurface};
    use handline_core::mapper::{TimedElement, map_traced};
    use handline_core::scheduler::ManualScheduler;
    use handline_core::trace::Tracer;
    use handline_core::{DrawDriver, ScheduleConfig, map};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Stroke(Option<f64>);

    impl Drawable for Stroke {
        fn total_length(&self) -> Option<f64> {
            self.0
        }
    }

    struct NullSurface;

    impl RevealSurface for NullSurface {
        type Element = Stroke;

        fn set_reveal_fraction(&mut self, _: &TimedElement<Stroke>, _: f64) {}

        fn clear_reveal(&mut self, _: &TimedElement<Stroke>) {}
    }

    #[test]
    fn mapping_is_recorded_in_order() {
        let mut rec = RecorderSink::new();
        let config = ScheduleConfig::new(Policy::ScenarioSync).with_duration(30);
        let strokes = vec![Stroke(Some(4.5)), Stroke(None), Stroke(Some(2.0))];
        map_traced(strokes, &config, &mut Tracer::new(&mut rec)).unwrap();

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            RecordedEvent::ElementSkipped(ElementSkippedEvent { source_index: 1 })
        );
        match &events[1] {
            RecordedEvent::ElementMapped(e) => {
                assert_eq!(e.index, 0);
                assert_eq!(e.length, 5);
                assert_eq!(e.start_at, 5.0);
                assert_eq!(e.duration, 30.0);
            }
            other => panic!("expected ElementMapped, got {other:?}"),
        }
        match &events[3] {
            RecordedEvent::Schedule(e) => {
                assert_eq!(e.policy, Policy::ScenarioSync);
                assert_eq!((e.mapped, e.skipped), (2, 1));
                assert_eq!(e.frame_length, 70.0);
            }
            other => panic!("expected Schedule, got {other:?}"),
        }
    }

    #[test]
    fn driver_run_round_trips() {
        let rec = Rc::new(RefCell::new(RecorderSink::new()));
        let config = ScheduleConfig::new(Policy::Async).with_duration(2);
        let schedule = map(vec![Stroke(Some(1.0))], &config).unwrap();
        let mut driver = DrawDriver::new(schedule, NullSurface, ManualScheduler::new());
        driver.set_trace_sink(Box::new(Rc::clone(&rec)));

        driver.play();
        driver.scheduler_mut().fire();
        driver.tick();
        driver.destroy();

        let events: Vec<_> = decode(rec.borrow().as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::Control(ControlEvent {
                    control: Control::Play,
                    current_frame: 0.0,
                    speed: 1.0,
                }),
                RecordedEvent::Frame(FrameEvent {
                    step: 1,
                    current_frame: 1.0,
                    speed: 1.0,
                    writes: 1,
                }),
                RecordedEvent::Frame(FrameEvent {
                    step: 2,
                    current_frame: 2.0,
                    speed: 1.0,
                    writes: 1,
                }),
                RecordedEvent::Boundary(BoundaryEvent {
                    boundary: Boundary::End,
                    current_frame: 2.0,
                }),
                RecordedEvent::Control(ControlEvent {
                    control: Control::Destroy,
                    current_frame: 2.0,
                    speed: 1.0,
                }),
            ]
        );
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_element_skipped(&ElementSkippedEvent { source_index: 3 });
        rec.on_frame(&FrameEvent {
            step: 9,
            current_frame: 4.0,
            speed: 1.0,
            writes: 0,
        });
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(
            events,
            [RecordedEvent::ElementSkipped(ElementSkippedEvent {
                source_index: 3
            })]
        );
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let events: Vec<_> = decode(&[0xff, TAG_ELEMENT_SKIPPED, 0, 0, 0, 0]).collect();
        assert!(events.is_empty());
    }
}
