// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame scheduler.
//!
//! [`RafScheduler`] owns a single JS closure and registers it again for every
//! requested frame. The closure ignores the [`DOMHighResTimeStamp`][mdn]: the
//! drawing clock counts frames, not milliseconds.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;

use handline_core::scheduler::FrameScheduler;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings instead of `web_sys::Window` methods, so no Window
// object has to be fetched (and unwrapped) on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// Identifier returned by `requestAnimationFrame`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RafHandle(i32);

impl RafHandle {
    /// The raw request id.
    #[must_use]
    pub fn id(self) -> i32 {
        self.0
    }
}

/// A [`FrameScheduler`] backed by `requestAnimationFrame`.
///
/// `on_frame` runs once per fired request. It is expected to tick the
/// driver that owns this scheduler, usually through a `Weak` handle.
pub struct RafScheduler {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Must outlive every pending request; dropping the scheduler while a
    /// request is pending makes the browser call a dead closure, so owners
    /// stop the driver first.
    closure: RafClosure,
    requested: u64,
}

impl RafScheduler {
    /// Creates a scheduler that calls `on_frame` for every fired request.
    pub fn new(mut on_frame: impl FnMut() + 'static) -> Self {
        let closure =
            Closure::wrap(Box::new(move |_timestamp_ms: f64| on_frame()) as Box<dyn FnMut(f64)>);
        Self {
            closure,
            requested: 0,
        }
    }

    /// Total number of frames requested.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = RafHandle;

    fn request_frame(&mut self) -> RafHandle {
        self.requested += 1;
        RafHandle(request_animation_frame(self.closure.as_ref().unchecked_ref()))
    }

    fn cancel_frame(&mut self, handle: RafHandle) {
        // Cancelling an id that already fired is a no-op in the browser.
        cancel_animation_frame(handle.0);
    }
}

impl core::fmt::Debug for RafScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafScheduler")
            .field("closure", &"Closure<dyn FnMut(f64)>")
            .field("requested", &self.requested)
            .finish()
    }
}
