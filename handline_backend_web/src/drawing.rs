// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<svg>` orchestration.
//!
//! [`LiveDrawing`] maps every `path` inside an SVG root, drives the reveal
//! with [`RafScheduler`] and starts it according to the configured
//! [`StartMode`].

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use handline_core::driver::FinishCallback;
use handline_core::viewport::{SCROLL_START_VISIBLE, document_viewport, is_in_viewport};
use handline_core::{AnimationStatus, ConfigError, DrawDriver, DrawOptions, StartMode, map};
use kurbo::Rect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, SvgGeometryElement, Window};

use crate::raf::RafScheduler;
use crate::surface::{DashSurface, SvgPath};

/// The driver type used in the browser.
pub type WebDriver = DrawDriver<DashSurface, RafScheduler>;

/// Errors raised while setting up a [`LiveDrawing`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DrawingError {
    /// The drawing options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No global `window` (not running in a browser main thread).
    #[error("no global `window` object")]
    NoWindow,
    /// No element carries the requested id.
    #[error("no element with id `{0}`")]
    MissingElement(String),
    /// A DOM call threw.
    #[error("DOM call failed: {0}")]
    Dom(String),
}

fn dom_error(err: JsValue) -> DrawingError {
    DrawingError::Dom(format!("{err:?}"))
}

fn window() -> Result<Window, DrawingError> {
    web_sys::window().ok_or(DrawingError::NoWindow)
}

/// A live drawing bound to an SVG root element.
///
/// The driver lives behind `Rc<RefCell<_>>`: the frame callback only holds a
/// weak handle, so dropping the `LiveDrawing` stops and frees everything.
/// The completion callback receives the driver itself and must not call back
/// into the `LiveDrawing`.
pub struct LiveDrawing {
    driver: Rc<RefCell<WebDriver>>,
    root: Element,
    scroll: Option<ScrollTrigger>,
}

impl core::fmt::Debug for LiveDrawing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LiveDrawing")
            .field("driver", &self.driver)
            .field("root", &"Element")
            .field("scroll", &self.scroll.is_some())
            .finish()
    }
}

impl LiveDrawing {
    /// Maps the paths under `root` and starts according to `options.start`,
    /// at `options.speed`.
    ///
    /// `on_finish` runs every time the drawing reaches its end.
    pub fn new(
        root: Element,
        options: &DrawOptions,
        on_finish: Option<FinishCallback<DashSurface, RafScheduler>>,
    ) -> Result<Self, DrawingError> {
        options.validate()?;
        let paths = collect_paths(&root)?;
        let schedule = map(paths, &options.schedule)?;
        tracing::debug!(
            mapped = schedule.len(),
            skipped = schedule.skipped.len(),
            start = options.start.as_str(),
            "live drawing created"
        );

        let driver = Rc::new_cyclic(|weak: &Weak<RefCell<WebDriver>>| {
            let weak = weak.clone();
            let scheduler = RafScheduler::new(move || {
                let Some(cell) = weak.upgrade() else {
                    return;
                };
                if let Ok(mut driver) = cell.try_borrow_mut() {
                    driver.tick();
                }
            });
            let mut driver =
                DrawDriver::with_options(schedule, DashSurface, scheduler, options);
            if let Some(callback) = on_finish {
                driver.set_finish_callback(callback);
            }
            RefCell::new(driver)
        });

        let scroll = match options.start {
            StartMode::Manual => None,
            StartMode::Autostart => {
                driver.borrow_mut().play_with_speed(options.speed)?;
                None
            }
            StartMode::InViewport => Some(ScrollTrigger::arm(
                window()?,
                root.clone(),
                Rc::downgrade(&driver),
                options.speed,
            )?),
        };

        Ok(Self {
            driver,
            root,
            scroll,
        })
    }

    /// Like [`new`](Self::new), looking the SVG root up by id.
    pub fn from_id(
        id: &str,
        options: &DrawOptions,
        on_finish: Option<FinishCallback<DashSurface, RafScheduler>>,
    ) -> Result<Self, DrawingError> {
        let root = window()?
            .document()
            .and_then(|document| document.get_element_by_id(id))
            .ok_or_else(|| DrawingError::MissingElement(id.to_string()))?;
        Self::new(root, options, on_finish)
    }

    /// The SVG root element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Plays forward at normal speed.
    pub fn play(&self) {
        self.driver.borrow_mut().play();
    }

    /// Plays at `speed` frames per animation frame; negative plays backwards.
    pub fn play_with_speed(&self, speed: f64) -> Result<(), ConfigError> {
        self.driver.borrow_mut().play_with_speed(speed)
    }

    /// Stops at the current frame.
    pub fn stop(&self) {
        self.driver.borrow_mut().stop();
    }

    /// Rewinds to the first frame.
    pub fn reset(&self) {
        self.driver.borrow_mut().reset();
    }

    /// Jumps to `progress` (in `[0, 1]`) of the drawing.
    pub fn set_frame_progress(&self, progress: f64) {
        self.driver.borrow_mut().set_frame_progress(progress);
    }

    /// Removes the dash styling from every path.
    pub fn destroy(&self) {
        self.driver.borrow_mut().destroy();
    }

    /// Where the drawing currently sits.
    #[must_use]
    pub fn status(&self) -> AnimationStatus {
        self.driver.borrow().status()
    }

    /// Whether a frame is pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.driver.borrow().is_running()
    }

    /// Runs `f` with the driver borrowed mutably.
    pub fn with_driver<R>(&self, f: impl FnOnce(&mut WebDriver) -> R) -> R {
        f(&mut self.driver.borrow_mut())
    }
}

impl Drop for LiveDrawing {
    fn drop(&mut self) {
        // A pending frame would call into a freed closure.
        if let Ok(mut driver) = self.driver.try_borrow_mut() {
            driver.stop();
        }
    }
}

fn collect_paths(root: &Element) -> Result<Vec<SvgPath>, DrawingError> {
    let nodes = root.query_selector_all("path").map_err(dom_error)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<SvgGeometryElement>().ok())
        .map(SvgPath::new)
        .collect())
}

/// Whether `root` has been scrolled fully into view.
fn root_in_viewport(window: &Window, root: &Element) -> bool {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let inner_width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let inner_height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let client_height = window
        .document()
        .and_then(|document| document.document_element())
        .map_or(0.0, |element| f64::from(element.client_height()));

    let bounds = root.get_bounding_client_rect();
    let element = Rect::new(
        bounds.left(),
        bounds.top() + scroll_y,
        bounds.right(),
        bounds.bottom() + scroll_y,
    );
    let viewport = document_viewport(scroll_y, inner_width, inner_height.max(client_height));
    is_in_viewport(element, viewport, SCROLL_START_VISIBLE)
}

type ScrollClosure = Closure<dyn FnMut()>;

/// A one-shot `scroll` listener that plays the drawing at the configured
/// speed once its root is fully visible.
struct ScrollTrigger {
    inner: Rc<ScrollInner>,
}

struct ScrollInner {
    window: Window,
    closure: RefCell<Option<ScrollClosure>>,
    armed: Cell<bool>,
}

impl ScrollTrigger {
    fn arm(
        window: Window,
        root: Element,
        weak_driver: Weak<RefCell<WebDriver>>,
        speed: f64,
    ) -> Result<Self, DrawingError> {
        let inner = Rc::new(ScrollInner {
            window,
            closure: RefCell::new(None),
            armed: Cell::new(true),
        });

        let weak_inner = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move || {
            let Some(inner) = weak_inner.upgrade() else {
                return;
            };
            if !inner.armed.get() || !root_in_viewport(&inner.window, &root) {
                return;
            }
            inner.disarm();
            tracing::debug!(speed, "drawing scrolled into view");
            if let Some(cell) = weak_driver.upgrade()
                && let Ok(mut driver) = cell.try_borrow_mut()
            {
                // Checked by `DrawOptions::validate` before arming.
                let _ = driver.play_with_speed(speed);
            }
        }) as Box<dyn FnMut()>);

        inner
            .window
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        *inner.closure.borrow_mut() = Some(closure);
        Ok(Self { inner })
    }
}

impl ScrollInner {
    /// Removes the listener. The closure itself stays alive: this may run
    /// from inside it.
    fn disarm(&self) {
        if !self.armed.replace(false) {
            return;
        }
        if let Some(ref closure) = *self.closure.borrow() {
            let _ = self
                .window
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for ScrollTrigger {
    fn drop(&mut self) {
        self.inner.disarm();
    }
}

impl core::fmt::Debug for ScrollTrigger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollTrigger")
            .field("armed", &self.inner.armed.get())
            .finish_non_exhaustive()
    }
}
