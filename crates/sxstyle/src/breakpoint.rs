//! Breakpoint resolution from viewport measurements.
//!
//! A theme's breakpoints are ascending viewport widths. `n` boundaries split
//! the width axis into `n + 1` tiers, and the active tier's index is the
//! number of boundaries the current width has reached:
//!
//! ```rust
//! use sxstyle::breakpoint_index;
//!
//! let boundaries = [576.0, 768.0, 992.0];
//! assert_eq!(breakpoint_index(320.0, &boundaries), 0);
//! assert_eq!(breakpoint_index(576.0, &boundaries), 1);
//! assert_eq!(breakpoint_index(1440.0, &boundaries), 3);
//! ```
//!
//! [`BreakpointWatcher`] keeps that index current by subscribing to a
//! [`Viewport`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::signal::{Listeners, Subscription};

/// Returns the tier index for `width` given ascending `boundaries`.
///
/// An unmeasurable (`NaN`) width resolves to the narrowest tier; an
/// infinite width reaches every boundary.
pub fn breakpoint_index(width: f64, boundaries: &[f64]) -> usize {
    if width.is_nan() {
        return 0;
    }
    boundaries.iter().take_while(|bp| width >= **bp).count()
}

/// A source of viewport width measurements.
pub trait Viewport {
    /// The current width.
    fn width(&self) -> f64;

    /// Registers a listener called with the new width on every change.
    fn subscribe(&self, listener: Rc<dyn Fn(f64)>) -> Subscription;
}

/// A viewport whose width is set by the host.
///
/// Clones share the same width and listeners.
#[derive(Clone)]
pub struct ManualViewport {
    width: Rc<Cell<f64>>,
    listeners: Listeners<f64>,
}

impl ManualViewport {
    pub fn new(width: f64) -> Self {
        Self {
            width: Rc::new(Cell::new(width)),
            listeners: Listeners::new(),
        }
    }

    /// Updates the width, notifying listeners if it changed.
    pub fn set_width(&self, width: f64) {
        if self.width.get() == width {
            return;
        }
        self.width.set(width);
        self.listeners.notify(&width);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Viewport for ManualViewport {
    fn width(&self) -> f64 {
        self.width.get()
    }

    fn subscribe(&self, listener: Rc<dyn Fn(f64)>) -> Subscription {
        self.listeners
            .subscribe(Rc::new(move |width: &f64| listener(*width)))
    }
}

impl fmt::Debug for ManualViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualViewport")
            .field("width", &self.width.get())
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

struct WatchState {
    width: Cell<f64>,
    index: Cell<usize>,
    boundaries: RefCell<Vec<f64>>,
    on_change: Box<dyn Fn(usize)>,
}

impl WatchState {
    fn recompute(&self) {
        let index = breakpoint_index(self.width.get(), &self.boundaries.borrow());
        if index != self.index.replace(index) {
            (self.on_change)(index);
        }
    }
}

/// Tracks the active breakpoint index of a viewport.
///
/// The watcher holds one viewport subscription, released when it is dropped.
pub struct BreakpointWatcher {
    state: Rc<WatchState>,
    _subscription: Subscription,
}

impl BreakpointWatcher {
    /// Starts watching `viewport` against `boundaries`.
    pub fn new(viewport: &dyn Viewport, boundaries: Vec<f64>) -> Self {
        Self::with_listener(viewport, boundaries, |_| {})
    }

    /// Starts watching, calling `on_change` whenever the tier changes.
    pub fn with_listener(
        viewport: &dyn Viewport,
        boundaries: Vec<f64>,
        on_change: impl Fn(usize) + 'static,
    ) -> Self {
        let width = viewport.width();
        let state = Rc::new(WatchState {
            width: Cell::new(width),
            index: Cell::new(breakpoint_index(width, &boundaries)),
            boundaries: RefCell::new(boundaries),
            on_change: Box::new(on_change),
        });

        let weak = Rc::downgrade(&state);
        let subscription = viewport.subscribe(Rc::new(move |width: f64| {
            if let Some(state) = weak.upgrade() {
                state.width.set(width);
                state.recompute();
            }
        }));

        Self {
            state,
            _subscription: subscription,
        }
    }

    /// The active tier, 0 being the narrowest.
    pub fn index(&self) -> usize {
        self.state.index.get()
    }

    /// The last measured width.
    pub fn width(&self) -> f64 {
        self.state.width.get()
    }

    /// Replaces the boundaries, e.g. after a theme change.
    pub fn set_boundaries(&self, boundaries: Vec<f64>) {
        *self.state.boundaries.borrow_mut() = boundaries;
        self.state.recompute();
    }
}

impl fmt::Debug for BreakpointWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakpointWatcher")
            .field("width", &self.width())
            .field("index", &self.index())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: [f64; 4] = [576.0, 768.0, 992.0, 1200.0];

    #[test]
    fn test_breakpoint_index_tiers() {
        assert_eq!(breakpoint_index(0.0, &BOUNDARIES), 0);
        assert_eq!(breakpoint_index(575.9, &BOUNDARIES), 0);
        assert_eq!(breakpoint_index(576.0, &BOUNDARIES), 1);
        assert_eq!(breakpoint_index(800.0, &BOUNDARIES), 2);
        assert_eq!(breakpoint_index(5000.0, &BOUNDARIES), 4);
    }

    #[test]
    fn test_breakpoint_index_degenerate_inputs() {
        assert_eq!(breakpoint_index(800.0, &[]), 0);
        assert_eq!(breakpoint_index(f64::NAN, &BOUNDARIES), 0);
        assert_eq!(breakpoint_index(f64::INFINITY, &BOUNDARIES), 4);
        assert_eq!(breakpoint_index(f64::NEG_INFINITY, &BOUNDARIES), 0);
    }

    #[test]
    fn test_watcher_follows_viewport() {
        let viewport = ManualViewport::new(320.0);
        let watcher = BreakpointWatcher::new(&viewport, BOUNDARIES.to_vec());
        assert_eq!(watcher.index(), 0);

        viewport.set_width(1000.0);
        assert_eq!(watcher.index(), 3);
        assert_eq!(watcher.width(), 1000.0);
    }

    #[test]
    fn test_watcher_notifies_only_on_tier_change() {
        let viewport = ManualViewport::new(320.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _watcher = BreakpointWatcher::with_listener(&viewport, BOUNDARIES.to_vec(), move |i| {
            sink.borrow_mut().push(i)
        });

        viewport.set_width(400.0);
        viewport.set_width(600.0);
        viewport.set_width(700.0);
        viewport.set_width(100.0);
        assert_eq!(*seen.borrow(), vec![1, 0]);
    }

    #[test]
    fn test_watcher_set_boundaries_recomputes() {
        let viewport = ManualViewport::new(500.0);
        let watcher = BreakpointWatcher::new(&viewport, BOUNDARIES.to_vec());
        assert_eq!(watcher.index(), 0);

        watcher.set_boundaries(vec![400.0]);
        assert_eq!(watcher.index(), 1);
    }

    #[test]
    fn test_watcher_releases_subscription_on_drop() {
        let viewport = ManualViewport::new(320.0);
        for _ in 0..3 {
            let watcher = BreakpointWatcher::new(&viewport, BOUNDARIES.to_vec());
            assert_eq!(viewport.subscriber_count(), 1);
            drop(watcher);
            assert_eq!(viewport.subscriber_count(), 0);
        }
    }
}
