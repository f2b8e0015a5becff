// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.
//!
//! Every error here is raised at construction or call time and never
//! deferred. Elements whose length cannot be measured are not errors: the
//! mapper logs them and leaves them out of the schedule.

use alloc::string::String;

/// An invalid option or argument.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The policy name is not one of the known scheduling policies.
    #[error("`{0}` is not an existing animation policy")]
    UnknownPolicy(String),

    /// The start mode name is not one of the known start modes.
    #[error("`{0}` is not an existing start mode")]
    UnknownStartMode(String),

    /// The total duration must be at least one frame.
    #[error("duration must be a positive number of frames")]
    ZeroDuration,

    /// The delay must leave room for drawing inside the total duration.
    #[error("delay ({delay}) must be shorter than duration ({duration})")]
    DelayTooLong {
        /// Configured delay, in frames.
        delay: u32,
        /// Configured duration, in frames.
        duration: u32,
    },

    /// Playback speed must be a finite, non-zero number.
    #[error("invalid playback speed {0}")]
    InvalidSpeed(f64),
}
