// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scheduling and playback configuration.
//!
//! [`ScheduleConfig`] is what the [mapper](crate::mapper) needs: a [`Policy`],
//! the total duration and an optional delay. [`DrawOptions`] adds the
//! playback-side options (start mode, start speed, self-destroy) that a host reads when it
//! wires a [`DrawDriver`](crate::driver::DrawDriver) up.
//!
//! Both are validated once, up front, with [`validate`](ScheduleConfig::validate).

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;

/// How start offsets and durations are assigned to elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Every element draws for `duration - delay` frames, each one starting
    /// a little after the previous one.
    #[default]
    Delayed,
    /// Every element starts and finishes at the same time.
    Async,
    /// One element at a time, each taking a share of the duration
    /// proportional to its length.
    OneByOne,
    /// Start and duration read from per-element `data-start` and
    /// `data-duration` overrides.
    Scenario,
    /// Elements chained one after the other, with `data-delay`,
    /// `data-duration` and `data-async` overrides.
    ScenarioSync,
}

impl Policy {
    /// All policies, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Delayed,
        Self::Async,
        Self::OneByOne,
        Self::Scenario,
        Self::ScenarioSync,
    ];

    /// Returns the canonical option name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delayed => "delayed",
            Self::Async => "async",
            Self::OneByOne => "oneByOne",
            Self::Scenario => "scenario",
            Self::ScenarioSync => "scenario-sync",
        }
    }

    /// Whether the clock's terminal frame is derived from the element windows
    /// rather than the configured duration.
    #[must_use]
    pub const fn derives_frame_length(self) -> bool {
        matches!(self, Self::Scenario | Self::ScenarioSync)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPolicy(s.to_string()))
    }
}

/// When playback begins once the drawing is set up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StartMode {
    /// Start the first time the drawing is fully scrolled into view.
    #[default]
    InViewport,
    /// The host calls `play` itself.
    Manual,
    /// Start immediately.
    Autostart,
}

impl StartMode {
    /// All start modes, in declaration order.
    pub const ALL: [Self; 3] = [Self::InViewport, Self::Manual, Self::Autostart];

    /// Returns the canonical option name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InViewport => "inViewport",
            Self::Manual => "manual",
            Self::Autostart => "autostart",
        }
    }
}

impl fmt::Display for StartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StartMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownStartMode(s.to_string()))
    }
}

/// Configuration for the [mapper](crate::mapper::map).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Scheduling policy.
    pub policy: Policy,
    /// Total animation duration, in frames.
    pub duration: u32,
    /// Frames between the start of the first and the last element.
    ///
    /// `None` resolves to a third of `duration`.
    pub delay: Option<u32>,
}

impl ScheduleConfig {
    /// Default total duration, in frames.
    pub const DEFAULT_DURATION: u32 = 120;

    /// Creates a configuration for `policy` with the default duration and
    /// delay.
    #[must_use]
    pub const fn new(policy: Policy) -> Self {
        Self {
            policy,
            duration: Self::DEFAULT_DURATION,
            delay: None,
        }
    }

    /// Sets the total duration.
    #[must_use]
    pub const fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the delay.
    #[must_use]
    pub const fn with_delay(mut self, delay: u32) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Checks that the duration is positive and the delay fits inside it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        match self.delay {
            Some(delay) if delay >= self.duration => Err(ConfigError::DelayTooLong {
                delay,
                duration: self.duration,
            }),
            _ => Ok(()),
        }
    }

    /// The delay in frames, with the default applied.
    #[must_use]
    pub fn resolved_delay(&self) -> f64 {
        match self.delay {
            Some(delay) => f64::from(delay),
            None => f64::from(self.duration) / 3.0,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

/// Full set of options for one drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawOptions {
    /// How the element windows are computed.
    pub schedule: ScheduleConfig,
    /// When playback begins.
    pub start: StartMode,
    /// Remove the reveal styling once the drawing has finished.
    pub self_destroy: bool,
    /// Speed of the first play triggered by [`start`](Self::start).
    /// Negative values draw in reverse.
    pub speed: f64,
}

impl DrawOptions {
    /// Creates options around a schedule, with default playback settings.
    #[must_use]
    pub const fn new(schedule: ScheduleConfig) -> Self {
        Self {
            schedule,
            start: StartMode::InViewport,
            self_destroy: false,
            speed: 1.0,
        }
    }

    /// Sets the start mode.
    #[must_use]
    pub const fn with_start(mut self, start: StartMode) -> Self {
        self.start = start;
        self
    }

    /// Sets whether the styling is removed after the last frame.
    #[must_use]
    pub const fn with_self_destroy(mut self, self_destroy: bool) -> Self {
        self.self_destroy = self_destroy;
        self
    }

    /// Sets the speed used when the start mode begins playback.
    #[must_use]
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Validates the schedule and the start speed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.schedule.validate()?;
        validate_speed(self.speed)?;
        Ok(())
    }
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}

/// Checks a playback speed: finite and non-zero.
pub fn validate_speed(speed: f64) -> Result<f64, ConfigError> {
    if speed.is_finite() && speed != 0.0 {
        Ok(speed)
    } else {
        Err(ConfigError::InvalidSpeed(speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_names_round_trip() {
        for policy in Policy::ALL {
            assert_eq!(policy.as_str().parse::<Policy>(), Ok(policy));
        }
        assert_eq!("scenario-sync".parse::<Policy>(), Ok(Policy::ScenarioSync));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "sideways".parse::<Policy>(),
            Err(ConfigError::UnknownPolicy("sideways".to_string()))
        );
        assert_eq!(
            "later".parse::<StartMode>(),
            Err(ConfigError::UnknownStartMode("later".to_string()))
        );
        // Names are case sensitive.
        assert!("OneByOne".parse::<Policy>().is_err());
    }

    #[test]
    fn defaults() {
        let options = DrawOptions::default();
        assert_eq!(options.schedule.policy, Policy::Delayed);
        assert_eq!(options.schedule.duration, 120);
        assert_eq!(options.schedule.delay, None);
        assert_eq!(options.start, StartMode::InViewport);
        assert!(!options.self_destroy);
        assert_eq!(options.speed, 1.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn start_speed_is_validated_with_the_options() {
        let options = DrawOptions::default().with_speed(-0.5);
        assert_eq!(options.speed, -0.5);
        assert!(options.validate().is_ok());

        assert_eq!(
            options.with_speed(0.0).validate(),
            Err(ConfigError::InvalidSpeed(0.0))
        );
        assert!(matches!(
            options.with_speed(f64::NAN).validate(),
            Err(ConfigError::InvalidSpeed(s)) if s.is_nan()
        ));
        // Schedule errors are reported first.
        let bad = DrawOptions::new(ScheduleConfig::new(Policy::Async).with_duration(0))
            .with_speed(0.0);
        assert_eq!(bad.validate(), Err(ConfigError::ZeroDuration));
    }

    #[test]
    fn delay_defaults_to_a_third_of_duration() {
        let config = ScheduleConfig::new(Policy::Delayed).with_duration(90);
        assert_eq!(config.resolved_delay(), 30.0);
        assert_eq!(config.with_delay(12).resolved_delay(), 12.0);
    }

    #[test]
    fn delay_must_be_shorter_than_duration() {
        let config = ScheduleConfig::new(Policy::Delayed)
            .with_duration(120)
            .with_delay(120);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DelayTooLong {
                delay: 120,
                duration: 120,
            })
        );
        assert!(config.with_delay(119).validate().is_ok());
        assert!(config.with_delay(0).validate().is_ok());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let config = ScheduleConfig::new(Policy::Async).with_duration(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroDuration));
    }

    #[test]
    fn speed_validation() {
        assert_eq!(validate_speed(0.5), Ok(0.5));
        assert_eq!(validate_speed(-2.0), Ok(-2.0));
        assert_eq!(validate_speed(0.0), Err(ConfigError::InvalidSpeed(0.0)));
        assert!(validate_speed(f64::NAN).is_err());
        assert!(validate_speed(f64::INFINITY).is_err());
    }
}
