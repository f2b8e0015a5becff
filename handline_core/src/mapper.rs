// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Assigning frame windows to elements.
//!
//! [`map`] measures every [`Drawable`], drops the ones without a usable
//! length, and gives each remaining element a `(start_at, duration)` window
//! according to the configured [`Policy`]:
//!
//! | Policy          | `start_at`                          | `duration`                       | frame length        |
//! |-----------------|-------------------------------------|----------------------------------|---------------------|
//! | `delayed`       | `delay_unit * index`                | `duration - delay`               | `duration`          |
//! | `async`         | `0`                                 | `duration`                       | `duration`          |
//! | `oneByOne`      | length before / total × `duration`  | length / total × `duration`      | `duration`          |
//! | `scenario`      | `data-start`, else `delay_unit`     | `data-duration`, else `duration` | max window end      |
//! | `scenario-sync` | time point + `data-delay`           | `data-duration`, else `duration` | max window end      |
//!
//! `delay_unit` is the delay spread over the gaps between the input elements:
//! `delay / max(count - 1, 1)`, where `count` includes elements that were
//! later skipped.
//!
//! In `scenario-sync` the time point moves to the end of each element, so
//! elements are chained; an element carrying `data-async` leaves the time
//! point at its own start, so the next element runs in parallel with it.

use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::{Policy, ScheduleConfig};
use crate::drawable::{Drawable, attr};
use crate::error::ConfigError;
use crate::parse::parse_positive_int_or;
use crate::trace::{
    ElementMappedEvent, ElementSkippedEvent, ScheduleEvent, Tracer, count_u32,
};

/// One element of a [`Schedule`], with its reveal window.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedElement<E> {
    /// The host's element handle.
    pub element: E,
    /// Position of the element in the sequence handed to [`map`].
    pub source_index: usize,
    /// Stroke length, rounded up.
    pub length: u32,
    /// First frame of the reveal.
    pub start_at: f64,
    /// Number of frames over which the reveal goes from 0 to 1.
    pub duration: f64,
}

/// Smallest window handed to a measured element. A zero-length stroke under
/// [`Policy::OneByOne`] gets this, so it appears as soon as the clock moves
/// past its start.
const MIN_WINDOW: f64 = f64::MIN_POSITIVE;

impl<E> TimedElement<E> {
    /// Frame at which the element is fully revealed.
    #[must_use]
    pub fn end_at(&self) -> f64 {
        self.start_at + self.duration
    }

    /// Reveal fraction at `frame`, clamped to `[0, 1]`.
    ///
    /// A zero-length window reveals the whole stroke as soon as `frame`
    /// reaches `start_at`.
    #[must_use]
    pub fn fraction_at(&self, frame: f64) -> f64 {
        if self.duration <= 0.0 {
            return if frame >= self.start_at { 1.0 } else { 0.0 };
        }
        ((frame - self.start_at) / self.duration).clamp(0.0, 1.0)
    }
}

/// The output of [`map`]: timed elements plus the clock's terminal value.
#[derive(Clone, Debug, PartialEq)]
pub struct Schedule<E> {
    /// Policy the schedule was computed with.
    pub policy: Policy,
    /// Timed elements, in input order.
    pub elements: Vec<TimedElement<E>>,
    /// Terminal frame length of the clock.
    pub frame_length: f64,
    /// Frames between consecutive element starts.
    pub delay_unit: f64,
    /// Input positions of the elements left out because their length was
    /// unknown.
    pub skipped: Vec<usize>,
}

impl<E> Schedule<E> {
    /// Number of timed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element could be scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the timed elements.
    pub fn iter(&self) -> core::slice::Iter<'_, TimedElement<E>> {
        self.elements.iter()
    }
}

/// Maps `elements` to a [`Schedule`].
///
/// The configuration is validated before any element is measured.
pub fn map<E: Drawable>(
    elements: impl IntoIterator<Item = E>,
    config: &ScheduleConfig,
) -> Result<Schedule<E>, ConfigError> {
    map_traced(elements, config, &mut Tracer::none())
}

/// Like [`map`], reporting every mapped and skipped element to `tracer`.
pub fn map_traced<E: Drawable>(
    elements: impl IntoIterator<Item = E>,
    config: &ScheduleConfig,
    tracer: &mut Tracer<'_>,
) -> Result<Schedule<E>, ConfigError> {
    config.validate()?;

    let mut measured = Vec::new();
    let mut skipped = Vec::new();
    let mut input_count = 0_usize;
    for (source_index, element) in elements.into_iter().enumerate() {
        input_count += 1;
        match element.total_length().and_then(round_length) {
            Some(length) => measured.push((source_index, element, length)),
            None => {
                tracing::warn!(source_index, "cannot retrieve a path element length");
                tracer.element_skipped(&ElementSkippedEvent {
                    source_index: count_u32(source_index),
                });
                skipped.push(source_index);
            }
        }
    }

    let total_length: f64 = measured.iter().map(|(_, _, len)| f64::from(*len)).sum();
    let total_length = if total_length > 0.0 { total_length } else { 1.0 };
    let duration = f64::from(config.duration);
    let delay = config.resolved_delay();
    let delay_unit = delay / input_count.saturating_sub(1).max(1) as f64;

    let mut timed = Vec::with_capacity(measured.len());
    let mut length_meter = 0.0;
    let mut time_point = 0.0;
    let mut window_end = 0.0_f64;

    for (index, (source_index, element, length)) in measured.into_iter().enumerate() {
        let (start_at, element_duration) = match config.policy {
            Policy::Delayed => (delay_unit * index as f64, duration - delay),
            Policy::Async => (0.0, duration),
            Policy::OneByOne => (
                length_meter / total_length * duration,
                (f64::from(length) / total_length * duration).max(MIN_WINDOW),
            ),
            Policy::Scenario => {
                let start = override_or(&element, attr::START, delay_unit);
                let dur = override_or(&element, attr::DURATION, duration);
                (start, dur)
            }
            Policy::ScenarioSync => {
                let start = time_point + override_or(&element, attr::DELAY, delay_unit);
                let dur = override_or(&element, attr::DURATION, duration);
                time_point = if element.override_attribute(attr::ASYNC).is_some() {
                    start
                } else {
                    start + dur
                };
                (start, dur)
            }
        };
        window_end = window_end.max(start_at + element_duration);
        length_meter += f64::from(length);

        tracer.element_mapped(&ElementMappedEvent {
            index: count_u32(index),
            source_index: count_u32(source_index),
            length,
            start_at,
            duration: element_duration,
        });
        timed.push(TimedElement {
            element,
            source_index,
            length,
            start_at,
            duration: element_duration,
        });
    }

    let frame_length = if config.policy.derives_frame_length() && window_end > 0.0 {
        window_end
    } else {
        duration
    };

    tracing::trace!(
        policy = config.policy.as_str(),
        mapped = timed.len(),
        skipped = skipped.len(),
        frame_length,
        "schedule mapped"
    );
    tracer.schedule(&ScheduleEvent {
        policy: config.policy,
        mapped: count_u32(timed.len()),
        skipped: count_u32(skipped.len()),
        frame_length,
        delay_unit,
    });

    Ok(Schedule {
        policy: config.policy,
        elements: timed,
        frame_length,
        delay_unit,
        skipped,
    })
}

/// Rounds a measured length up, rejecting lengths that cannot be drawn.
fn round_length(length: f64) -> Option<u32> {
    if !length.is_finite() || length < 0.0 {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "finite, non-negative; `as` saturates above u32::MAX"
    )]
    let rounded = length.ceil() as u32;
    Some(rounded)
}

fn override_or<E: Drawable>(element: &E, name: &str, default: f64) -> f64 {
    parse_positive_int_or(element.override_attribute(name).as_deref(), default)
}
