// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame clock.
//!
//! [`DrawDriver`] owns a [`Schedule`], a logical frame counter and the last
//! reveal fraction written for every element. Each step adds the signed
//! speed to the counter, recomputes every element's fraction and writes the
//! ones that changed to the [`RevealSurface`].
//!
//! # States
//!
//! The driver is either idle or running. Running means it holds exactly one
//! pending [`FrameScheduler`] registration; when that frame fires the host
//! calls [`tick`](DrawDriver::tick), which releases the handle, steps the
//! clock and, unless a boundary was hit, requests the next frame.
//!
//! # Boundaries
//!
//! - Counter at or below zero (reverse playback): the driver stops and
//!   resets to frame zero. The completion callback is **not** invoked.
//! - Counter at or above the frame length: the driver stops, clamps the
//!   counter, applies the final fractions, removes the styling when
//!   self-destroy is set, then invokes the completion callback once.
//!
//! # Frame loop
//!
//! ```rust,ignore
//! let mut driver = DrawDriver::new(schedule, surface, ManualScheduler::new());
//! driver.play();
//! while driver.scheduler_mut().fire().is_some() {
//!     driver.tick();
//! }
//! ```

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::mem;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::{DrawOptions, validate_speed};
use crate::drawable::RevealSurface;
use crate::error::ConfigError;
use crate::mapper::Schedule;
use crate::scheduler::FrameScheduler;
use crate::trace::{
    Boundary, BoundaryEvent, Control, ControlEvent, FrameEvent, TraceSink, Tracer, count_u32,
};

/// Callback invoked when the clock reaches the end of the schedule.
pub type FinishCallback<S, F> = Box<dyn FnMut(&mut DrawDriver<S, F>)>;

/// Whether a frame registration is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState<H> {
    Idle,
    Running(H),
}

/// What a single clock step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// The driver was idle; a stale frame callback was ignored.
    Idle,
    /// Fractions were applied and the next frame was requested.
    Continue,
    /// The counter fell to zero; the driver stopped and reset.
    ReachedStart,
    /// The counter reached the frame length; the driver stopped and the
    /// completion callback ran.
    ReachedEnd,
}

/// Where the clock currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationStatus {
    /// Frame zero (or below): nothing drawn.
    Start,
    /// Somewhere between the two ends.
    Progress,
    /// At the frame length: everything drawn.
    End,
}

/// Drives the reveal of a [`Schedule`] over a [`RevealSurface`].
pub struct DrawDriver<S: RevealSurface, F: FrameScheduler> {
    schedule: Schedule<S::Element>,
    /// Last fraction written per element, indexed like `schedule.elements`.
    progress: Vec<Option<f64>>,
    surface: S,
    scheduler: F,
    state: RunState<F::Handle>,
    current_frame: f64,
    speed: f64,
    self_destroy: bool,
    on_finish: Option<FinishCallback<S, F>>,
    sink: Option<Box<dyn TraceSink>>,
    step: u64,
}

impl<S: RevealSurface, F: FrameScheduler> core::fmt::Debug for DrawDriver<S, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrawDriver")
            .field("elements", &self.schedule.len())
            .field("frame_length", &self.schedule.frame_length)
            .field("current_frame", &self.current_frame)
            .field("speed", &self.speed)
            .field("running", &self.is_running())
            .field("self_destroy", &self.self_destroy)
            .finish_non_exhaustive()
    }
}

impl<S: RevealSurface, F: FrameScheduler> DrawDriver<S, F> {
    /// Creates an idle driver at frame zero and prepares every element on the
    /// surface.
    pub fn new(schedule: Schedule<S::Element>, mut surface: S, scheduler: F) -> Self {
        for timed in &schedule.elements {
            surface.prepare(timed);
        }
        Self {
            progress: vec![None; schedule.len()],
            schedule,
            surface,
            scheduler,
            state: RunState::Idle,
            current_frame: 0.0,
            speed: 1.0,
            self_destroy: false,
            on_finish: None,
            sink: None,
            step: 0,
        }
    }

    /// Creates a driver configured from the playback part of `options`.
    pub fn with_options(
        schedule: Schedule<S::Element>,
        surface: S,
        scheduler: F,
        options: &DrawOptions,
    ) -> Self {
        Self::new(schedule, surface, scheduler).with_self_destroy(options.self_destroy)
    }

    /// Removes the reveal styling once the end is reached.
    #[must_use]
    pub fn with_self_destroy(mut self, self_destroy: bool) -> Self {
        self.self_destroy = self_destroy;
        self
    }

    /// Sets the callback invoked each time the end is reached.
    #[must_use]
    pub fn with_finish_callback(mut self, callback: impl FnMut(&mut Self) + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    /// Replaces the completion callback.
    pub fn set_finish_callback(&mut self, callback: impl FnMut(&mut Self) + 'static) {
        self.on_finish = Some(Box::new(callback));
    }

    /// Routes trace events to `sink`.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    // -- playback ----------------------------------------------------------

    /// Plays forward at normal speed.
    ///
    /// See [`play_with_speed`](Self::play_with_speed).
    pub fn play(&mut self) {
        self.start(1.0);
    }

    /// Plays at `speed` frames per tick; negative values play in reverse.
    ///
    /// The speed is recorded even when already running, so a running
    /// drawing can change direction. When idle, the first step happens
    /// immediately and the next frame is requested.
    pub fn play_with_speed(&mut self, speed: f64) -> Result<(), ConfigError> {
        let speed = validate_speed(speed)?;
        self.start(speed);
        Ok(())
    }

    fn start(&mut self, speed: f64) {
        self.speed = speed;
        if self.is_running() {
            return;
        }
        tracing::debug!(speed, current_frame = self.current_frame, "play");
        self.trace_control(Control::Play);
        self.advance();
    }

    /// Handles a fired frame registration.
    ///
    /// Meant to be called from the scheduler callback. Returns
    /// [`TickOutcome::Idle`] without touching the clock when no registration
    /// is held, e.g. for a callback that raced with [`stop`](Self::stop).
    /// The held registration is cancelled before the next one is requested,
    /// so a tick from anywhere else still leaves a single pending frame.
    pub fn tick(&mut self) -> TickOutcome {
        match mem::replace(&mut self.state, RunState::Idle) {
            RunState::Idle => TickOutcome::Idle,
            RunState::Running(handle) => {
                // No-op for the registration that just fired.
                self.scheduler.cancel_frame(handle);
                self.advance()
            }
        }
    }

    fn advance(&mut self) -> TickOutcome {
        self.current_frame += self.speed;

        if self.current_frame <= 0.0 {
            self.stop();
            self.reset();
            self.trace_boundary(Boundary::Start);
            TickOutcome::ReachedStart
        } else if self.current_frame >= self.schedule.frame_length {
            self.stop();
            self.current_frame = self.schedule.frame_length;
            self.apply_progress();
            self.trace_boundary(Boundary::End);
            if self.self_destroy {
                self.destroy();
            }
            tracing::debug!(frame_length = self.schedule.frame_length, "drawing finished");
            self.finish();
            TickOutcome::ReachedEnd
        } else {
            self.apply_progress();
            self.state = RunState::Running(self.scheduler.request_frame());
            TickOutcome::Continue
        }
    }

    fn finish(&mut self) {
        if let Some(mut callback) = self.on_finish.take() {
            callback(self);
            // The callback may have installed a replacement.
            if self.on_finish.is_none() {
                self.on_finish = Some(callback);
            }
        }
    }

    /// Cancels the pending frame, if any. Never fails.
    pub fn stop(&mut self) {
        if let RunState::Running(handle) = mem::replace(&mut self.state, RunState::Idle) {
            self.scheduler.cancel_frame(handle);
            tracing::debug!(current_frame = self.current_frame, "stop");
            self.trace_control(Control::Stop);
        }
    }

    /// Rewinds to frame zero and applies the fractions.
    ///
    /// Does not stop a running drawing: it carries on from the start.
    pub fn reset(&mut self) {
        self.current_frame = 0.0;
        self.apply_progress();
        self.trace_control(Control::Reset);
    }

    /// Jumps to `progress` of the frame length and applies the fractions.
    ///
    /// `progress` is clamped to `[0, 1]` and the frame is rounded to a whole
    /// frame. The running state is untouched.
    pub fn set_frame_progress(&mut self, progress: f64) {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.current_frame = (self.schedule.frame_length * progress).round();
        self.apply_progress();
    }

    /// Removes the reveal styling from every element.
    ///
    /// The clock is untouched. The applied fractions are forgotten, so the
    /// next progress pass writes every element again.
    pub fn destroy(&mut self) {
        for timed in &self.schedule.elements {
            self.surface.clear_reveal(timed);
        }
        self.progress.fill(None);
        self.trace_control(Control::Destroy);
    }

    fn apply_progress(&mut self) {
        let frame = self.current_frame;
        let mut writes = 0_usize;
        for (timed, applied) in self.schedule.elements.iter().zip(&mut self.progress) {
            let fraction = timed.fraction_at(frame);
            if *applied != Some(fraction) {
                *applied = Some(fraction);
                self.surface.set_reveal_fraction(timed, fraction);
                writes += 1;
            }
        }
        self.step += 1;
        Tracer::from_option(self.sink.as_deref_mut()).frame(&FrameEvent {
            step: self.step,
            current_frame: frame,
            speed: self.speed,
            writes: count_u32(writes),
        });
    }

    fn trace_control(&mut self, control: Control) {
        Tracer::from_option(self.sink.as_deref_mut()).control(&ControlEvent {
            control,
            current_frame: self.current_frame,
            speed: self.speed,
        });
    }

    fn trace_boundary(&mut self, boundary: Boundary) {
        Tracer::from_option(self.sink.as_deref_mut()).boundary(&BoundaryEvent {
            boundary,
            current_frame: self.current_frame,
        });
    }

    // -- accessors -----------------------------------------------------------

    /// Whether a frame registration is held.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running(_))
    }

    /// Where the clock sits relative to its two ends.
    #[must_use]
    pub fn status(&self) -> AnimationStatus {
        if self.current_frame <= 0.0 {
            AnimationStatus::Start
        } else if self.current_frame >= self.schedule.frame_length {
            AnimationStatus::End
        } else {
            AnimationStatus::Progress
        }
    }

    /// Current value of the frame counter.
    #[must_use]
    pub fn current_frame(&self) -> f64 {
        self.current_frame
    }

    /// Terminal value of the frame counter.
    #[must_use]
    pub fn frame_length(&self) -> f64 {
        self.schedule.frame_length
    }

    /// Frames added per step.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Last fraction written for the element at `index` in the schedule.
    #[must_use]
    pub fn applied_fraction(&self, index: usize) -> Option<f64> {
        self.progress.get(index).copied().flatten()
    }

    /// The schedule being played.
    #[must_use]
    pub fn schedule(&self) -> &Schedule<S::Element> {
        &self.schedule
    }

    /// The surface fractions are written to.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The injected frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// Mutable access to the frame scheduler, e.g. to fire a
    /// [`ManualScheduler`](crate::scheduler::ManualScheduler).
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Policy, ScheduleConfig};
    use crate::drawable::{Drawable, attr};
    use crate::mapper::{TimedElement, map};
    use crate::scheduler::ManualScheduler;
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use core::cell::Cell;

    #[derive(Clone, Debug, PartialEq)]
    struct Path {
        length: f64,
        duration: Option<&'static str>,
    }

    fn path(length: f64) -> Path {
        Path {
            length,
            duration: None,
        }
    }

    impl Drawable for Path {
        fn total_length(&self) -> Option<f64> {
            Some(self.length)
        }

        fn override_attribute(&self, name: &str) -> Option<String> {
            match name {
                attr::DURATION => self.duration.map(ToString::to_string),
                attr::START => Some("5".to_string()),
                _ => None,
            }
        }
    }

    #[derive(Debug, Default)]
    struct RecordingSurface {
        prepared: Vec<usize>,
        writes: Vec<(usize, f64)>,
        cleared: Vec<usize>,
    }

    impl RevealSurface for RecordingSurface {
        type Element = Path;

        fn prepare(&mut self, element: &TimedElement<Path>) {
            self.prepared.push(element.source_index);
        }

        fn set_reveal_fraction(&mut self, element: &TimedElement<Path>, fraction: f64) {
            assert!((0.0..=1.0).contains(&fraction), "fraction {fraction}");
            self.writes.push((element.source_index, fraction));
        }

        fn clear_reveal(&mut self, element: &TimedElement<Path>) {
            self.cleared.push(element.source_index);
        }
    }

    type Driver = DrawDriver<RecordingSurface, ManualScheduler>;

    fn driver(paths: Vec<Path>, config: ScheduleConfig) -> Driver {
        let schedule = map(paths, &config).unwrap();
        DrawDriver::new(schedule, RecordingSurface::default(), ManualScheduler::new())
    }

    /// Fires the pending frame and ticks.
    fn step(driver: &mut Driver) -> TickOutcome {
        assert!(driver.scheduler_mut().fire().is_some(), "no frame pending");
        driver.tick()
    }

    fn last_write(driver: &Driver, source_index: usize) -> Option<f64> {
        driver
            .surface()
            .writes
            .iter()
            .rev()
            .find(|(i, _)| *i == source_index)
            .map(|(_, f)| *f)
    }

    #[test]
    fn new_prepares_every_element_without_writing() {
        let d = driver(
            vec![path(1.0), path(2.0)],
            ScheduleConfig::new(Policy::Async),
        );
        assert_eq!(d.surface().prepared, vec![0, 1]);
        assert!(d.surface().writes.is_empty());
        assert!(!d.is_running());
        assert_eq!(d.current_frame(), 0.0);
        assert_eq!(d.status(), AnimationStatus::Start);
    }

    #[test]
    fn progress_is_linear_under_positive_speed() {
        let mut d = driver(vec![path(50.0)], ScheduleConfig::new(Policy::Async).with_duration(10));

        d.play();
        assert!(d.is_running());
        assert_eq!(d.applied_fraction(0), Some(0.1));

        for k in 2..10 {
            assert_eq!(step(&mut d), TickOutcome::Continue);
            assert_eq!(d.applied_fraction(0), Some(f64::from(k) / 10.0));
            assert_eq!(d.status(), AnimationStatus::Progress);
        }

        assert_eq!(step(&mut d), TickOutcome::ReachedEnd);
        assert_eq!(d.applied_fraction(0), Some(1.0));
        assert_eq!(d.current_frame(), 10.0);
        assert!(!d.is_running());
        assert_eq!(d.scheduler().pending(), None);
        assert_eq!(d.status(), AnimationStatus::End);
    }

    #[test]
    fn end_is_clamped_for_fractional_speed() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(3));
        d.play_with_speed(2.5).unwrap();
        assert_eq!(step(&mut d), TickOutcome::ReachedEnd);
        assert_eq!(d.current_frame(), 3.0);
    }

    #[test]
    fn completion_callback_runs_once_per_run() {
        let finished = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&finished);
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(3))
            .with_finish_callback(move |d| {
                assert_eq!(d.status(), AnimationStatus::End);
                counter.set(counter.get() + 1);
            });

        d.play();
        step(&mut d);
        assert_eq!(finished.get(), 0);
        assert_eq!(step(&mut d), TickOutcome::ReachedEnd);
        assert_eq!(finished.get(), 1);

        // Stale callbacks after the end do nothing.
        assert_eq!(d.tick(), TickOutcome::Idle);
        assert_eq!(finished.get(), 1);
    }

    #[test]
    fn reverse_playback_returns_to_start_without_callback() {
        let finished = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&finished);
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(10))
            .with_finish_callback(move |_| counter.set(counter.get() + 1));

        d.play();
        while d.scheduler().pending().is_some() {
            step(&mut d);
        }
        assert_eq!(d.current_frame(), 10.0);
        assert_eq!(finished.get(), 1);

        // First reverse step happens inside `play_with_speed`.
        d.play_with_speed(-1.0).unwrap();
        assert_eq!(d.current_frame(), 9.0);
        for _ in 0..8 {
            assert_eq!(step(&mut d), TickOutcome::Continue);
        }
        assert_eq!(d.current_frame(), 1.0);
        assert_eq!(step(&mut d), TickOutcome::ReachedStart);

        assert_eq!(d.current_frame(), 0.0);
        assert_eq!(d.applied_fraction(0), Some(0.0));
        assert!(!d.is_running());
        assert_eq!(finished.get(), 1);
    }

    #[test]
    fn callback_can_replay_in_reverse() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(4))
            .with_finish_callback(|d| d.play_with_speed(-2.0).unwrap());

        d.play();
        for _ in 0..3 {
            step(&mut d);
        }
        // The callback already took the first reverse step.
        assert_eq!(d.current_frame(), 2.0);
        assert!(d.is_running());
        assert_eq!(step(&mut d), TickOutcome::ReachedStart);
        assert_eq!(d.status(), AnimationStatus::Start);
    }

    #[test]
    fn reset_twice_writes_once() {
        let mut d = driver(
            vec![path(1.0), path(2.0)],
            ScheduleConfig::new(Policy::Async).with_duration(10),
        );
        d.play();
        step(&mut d);
        d.stop();

        d.reset();
        let after_first = d.surface().writes.len();
        assert_eq!(d.applied_fraction(0), Some(0.0));
        assert_eq!(d.applied_fraction(1), Some(0.0));

        d.reset();
        assert_eq!(d.surface().writes.len(), after_first);
    }

    #[test]
    fn reset_keeps_running_state() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(10));
        d.play();
        step(&mut d);
        d.reset();
        assert!(d.is_running());
        assert_eq!(d.current_frame(), 0.0);
        assert_eq!(step(&mut d), TickOutcome::Continue);
        assert_eq!(d.current_frame(), 1.0);
    }

    #[test]
    fn set_frame_progress_jumps_and_rounds() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(10));
        d.set_frame_progress(0.46);
        assert_eq!(d.current_frame(), 5.0);
        assert_eq!(d.applied_fraction(0), Some(0.5));
        assert!(!d.is_running());

        d.set_frame_progress(3.0);
        assert_eq!(d.status(), AnimationStatus::End);
        assert_eq!(d.applied_fraction(0), Some(1.0));

        d.set_frame_progress(f64::NAN);
        assert_eq!(d.status(), AnimationStatus::Start);
    }

    #[test]
    fn unchanged_fractions_are_not_written() {
        let config = ScheduleConfig::new(Policy::Delayed)
            .with_duration(30)
            .with_delay(10);
        let mut d = driver(vec![path(1.0), path(1.0)], config);

        // Second element starts at frame 10.
        d.play();
        assert_eq!(d.surface().writes, vec![(0, 0.05), (1, 0.0)]);
        for _ in 0..9 {
            step(&mut d);
        }
        assert_eq!(d.current_frame(), 10.0);
        assert_eq!(d.surface().writes.iter().filter(|(i, _)| *i == 1).count(), 1);

        step(&mut d);
        assert_eq!(last_write(&d, 1), Some(0.05));
    }

    #[test]
    fn play_while_running_only_changes_speed() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(10));
        d.play();
        step(&mut d);
        assert_eq!(d.scheduler().requested(), 2);

        d.play();
        assert_eq!(d.scheduler().requested(), 2);
        assert_eq!(d.current_frame(), 2.0);

        d.play_with_speed(-1.0).unwrap();
        assert_eq!(d.current_frame(), 2.0);
        assert_eq!(d.speed(), -1.0);
        assert_eq!(step(&mut d), TickOutcome::Continue);
        assert_eq!(d.current_frame(), 1.0);
        assert_eq!(step(&mut d), TickOutcome::ReachedStart);
    }

    #[test]
    fn invalid_speed_is_rejected_without_side_effects() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async));
        assert_eq!(
            d.play_with_speed(0.0),
            Err(ConfigError::InvalidSpeed(0.0))
        );
        assert!(d.play_with_speed(f64::NAN).is_err());
        assert!(!d.is_running());
        assert_eq!(d.speed(), 1.0);
        assert!(d.surface().writes.is_empty());
    }

    #[test]
    fn stop_cancels_and_is_idempotent() {
        let finished = Rc::new(Cell::new(false));
        let flag = Rc::clone(&finished);
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(10))
            .with_finish_callback(move |_| flag.set(true));

        d.stop();
        d.play();
        d.stop();
        assert!(!d.is_running());
        assert_eq!(d.scheduler().pending(), None);
        assert_eq!(d.scheduler().cancelled(), 1);

        d.stop();
        assert_eq!(d.scheduler().cancelled(), 1);
        assert_eq!(d.tick(), TickOutcome::Idle);
        assert_eq!(d.current_frame(), 1.0);
        assert!(!finished.get());

        // Resumes from where it stopped.
        d.play();
        assert_eq!(d.current_frame(), 2.0);
    }

    #[test]
    fn unprompted_tick_keeps_a_single_registration() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(10));
        d.play();
        let first = d.scheduler().pending();
        assert!(first.is_some());

        // Ticking without the frame having fired replaces the registration.
        assert_eq!(d.tick(), TickOutcome::Continue);
        assert_eq!(d.current_frame(), 2.0);
        assert_eq!(d.scheduler().cancelled(), 1);
        assert_eq!(d.scheduler().requested(), 2);
        assert_ne!(d.scheduler().pending(), first);

        // A regular fired tick cancels nothing.
        assert_eq!(step(&mut d), TickOutcome::Continue);
        assert_eq!(d.scheduler().cancelled(), 1);
        assert_eq!(d.scheduler().requested(), 3);
    }

    #[test]
    fn reverse_from_start_resets_immediately() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(10));
        d.play_with_speed(-1.0).unwrap();
        assert!(!d.is_running());
        assert_eq!(d.current_frame(), 0.0);
        assert_eq!(d.applied_fraction(0), Some(0.0));
        assert_eq!(d.scheduler().requested(), 0);
    }

    #[test]
    fn self_destroy_clears_before_callback() {
        let seen = Rc::new(Cell::new(0_usize));
        let cleared = Rc::clone(&seen);
        let config = ScheduleConfig::new(Policy::Async).with_duration(2);
        let mut d = driver(vec![path(1.0), path(2.0)], config)
            .with_self_destroy(true)
            .with_finish_callback(move |d| cleared.set(d.surface().cleared.len()));

        d.play();
        step(&mut d);
        assert_eq!(seen.get(), 2);
        assert_eq!(d.surface().cleared, vec![0, 1]);
    }

    #[test]
    fn destroy_forgets_applied_fractions() {
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(10));
        d.reset();
        assert_eq!(d.surface().writes.len(), 1);

        d.destroy();
        d.destroy();
        assert_eq!(d.surface().cleared, vec![0, 0]);
        assert_eq!(d.applied_fraction(0), None);
        assert!(!d.is_running());

        d.reset();
        assert_eq!(d.surface().writes.len(), 2);
    }

    #[test]
    fn zero_duration_reveals_instantly() {
        // Both start at frame 5; only the second keeps the full duration.
        let config = ScheduleConfig::new(Policy::Scenario).with_duration(10);
        let instant = Path {
            length: 4.0,
            duration: Some("0"),
        };
        let mut d = driver(vec![instant, path(4.0)], config);
        assert_eq!(d.frame_length(), 15.0);

        d.play();
        for _ in 0..3 {
            step(&mut d);
        }
        assert_eq!(d.current_frame(), 4.0);
        assert_eq!(d.applied_fraction(0), Some(0.0));
        step(&mut d);
        assert_eq!(d.applied_fraction(0), Some(1.0));
        assert_eq!(d.applied_fraction(1), Some(0.0));
    }

    #[test]
    fn empty_schedule_still_runs_to_the_end() {
        let mut d = driver(Vec::new(), ScheduleConfig::new(Policy::Delayed).with_duration(2));
        d.play();
        assert_eq!(step(&mut d), TickOutcome::ReachedEnd);
        assert!(d.surface().writes.is_empty());
    }

    #[test]
    fn with_options_applies_self_destroy() {
        let options = DrawOptions::new(ScheduleConfig::new(Policy::Async).with_duration(1))
            .with_self_destroy(true);
        let schedule = map(vec![path(1.0)], &options.schedule).unwrap();
        let mut d = DrawDriver::with_options(
            schedule,
            RecordingSurface::default(),
            ManualScheduler::new(),
            &options,
        );
        assert_eq!(d.play_with_speed(1.0), Ok(()));
        assert_eq!(d.surface().cleared, vec![0]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_sink_sees_boundaries_and_controls() {
        use core::cell::RefCell;

        #[derive(Default)]
        struct Log {
            boundaries: Vec<Boundary>,
            controls: Vec<Control>,
            writes: u32,
        }
        impl TraceSink for Log {
            fn on_boundary(&mut self, e: &BoundaryEvent) {
                self.boundaries.push(e.boundary);
            }
            fn on_control(&mut self, e: &ControlEvent) {
                self.controls.push(e.control);
            }
            fn on_frame(&mut self, e: &FrameEvent) {
                self.writes += e.writes;
            }
        }

        let log = Rc::new(RefCell::new(Log::default()));
        let mut d = driver(vec![path(1.0)], ScheduleConfig::new(Policy::Async).with_duration(2));
        d.set_trace_sink(Box::new(Rc::clone(&log)));

        d.play();
        step(&mut d);
        d.play_with_speed(-1.0).unwrap();
        step(&mut d);

        let log = log.borrow();
        assert_eq!(log.boundaries, vec![Boundary::End, Boundary::Start]);
        assert_eq!(
            log.controls,
            vec![Control::Play, Control::Play, Control::Reset]
        );
        assert_eq!(log.writes, 4);
    }
}
