// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Injected frame scheduling.
//!
//! The driver never owns a timer. It asks a [`FrameScheduler`] for "one more
//! frame" and keeps the returned handle until that frame fires (the host then
//! calls [`DrawDriver::tick`](crate::driver::DrawDriver::tick)) or until it
//! cancels the registration. At most one handle is held at any time.
//!
//! In a browser the scheduler wraps `requestAnimationFrame`; headless hosts
//! and tests use [`ManualScheduler`] and fire frames themselves.

/// A cancellable, one-shot frame callback registration.
pub trait FrameScheduler {
    /// Identifies a pending registration.
    type Handle;

    /// Requests a callback on the next frame.
    fn request_frame(&mut self) -> Self::Handle;

    /// Cancels a pending registration. Cancelling a registration that already
    /// fired must be harmless.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Handle issued by [`ManualScheduler`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameRequestId(pub u64);

impl core::fmt::Debug for FrameRequestId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FrameRequestId({})", self.0)
    }
}

/// A [`FrameScheduler`] stepped by hand.
///
/// Requests are only recorded; the host decides when a frame "fires" by
/// calling [`fire`](Self::fire) and then ticking the driver.
///
/// ```rust,ignore
/// while scheduler.fire().is_some() {
///     driver.tick();
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameRequestId>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    /// Creates a scheduler with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registration waiting to fire, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameRequestId> {
        self.pending
    }

    /// Consumes the pending registration, as if its frame had arrived.
    pub fn fire(&mut self) -> Option<FrameRequestId> {
        self.pending.take()
    }

    /// Total number of frames requested.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Total number of pending registrations cancelled.
    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = FrameRequestId;

    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        // A new request replaces whatever was pending.
        self.pending = Some(id);
        id
    }

    fn cancel_frame(&mut self, handle: FrameRequestId) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}
