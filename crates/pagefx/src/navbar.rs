//! Navbar elevation and hide-on-scroll.
//!
//! The decision is a pure function of the previous and current scroll offsets
//! ([`derive_navbar_state`]). The controller collapses raw scroll events into
//! at most one computation per animation frame and writes the result to the
//! navbar node in a single [`NavbarVisibilityController::apply`] step.

use std::time::Duration;

use log::{debug, trace};
use pagecss::SelectorList;

use crate::dom::{Document, NodeId};
use crate::events::FrameTask;
use crate::frame::{AnimationFrames, FrameGate};

/// Class carrying the elevated background/blur treatment.
pub const ELEVATED_CLASS: &str = "scrolled";
const HIDDEN_TRANSFORM: &str = "translateY(-100%)";
const SHOWN_TRANSFORM: &str = "translateY(0)";

/// Scroll offsets that drive the navbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavbarThresholds {
    /// Past this offset the navbar is elevated.
    pub elevate: f64,
    /// Scrolling down past this offset hides the navbar.
    pub hide: f64,
}

impl Default for NavbarThresholds {
    fn default() -> Self {
        Self {
            elevate: 50.0,
            hide: 100.0,
        }
    }
}

/// A scroll position observed at some point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub offset: f64,
    pub timestamp: Duration,
}

impl ScrollSample {
    /// Negative offsets (overscroll bounce) are clamped to zero.
    pub fn new(offset: f64, timestamp: Duration) -> Self {
        Self {
            offset: offset.max(0.0),
            timestamp,
        }
    }
}

/// Coarse classification of [`NavbarVisualState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarStateKind {
    Static,
    Elevated,
    Hidden,
}

/// What the navbar should look like.
///
/// Elevation and hiding are independent: a navbar scrolled far down is
/// both elevated and hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavbarVisualState {
    pub elevated: bool,
    pub hidden: bool,
}

impl NavbarVisualState {
    pub fn kind(&self) -> NavbarStateKind {
        if self.hidden {
            NavbarStateKind::Hidden
        } else if self.elevated {
            NavbarStateKind::Elevated
        } else {
            NavbarStateKind::Static
        }
    }
}

/// Derives the next state from the previous offset, the current offset and
/// whether the navbar was hidden. An unchanged offset keeps the hidden flag.
pub fn derive_navbar_state(
    previous: f64,
    current: f64,
    was_hidden: bool,
    thresholds: &NavbarThresholds,
) -> NavbarVisualState {
    let elevated = current > thresholds.elevate;
    let hidden = if current == previous {
        was_hidden
    } else {
        current > previous && current > thresholds.hide
    };
    NavbarVisualState { elevated, hidden }
}

#[derive(Debug)]
pub struct NavbarVisibilityController {
    navbar: Option<NodeId>,
    thresholds: NavbarThresholds,
    previous: f64,
    latest: Option<ScrollSample>,
    state: NavbarVisualState,
    gate: FrameGate,
    computations: usize,
    disposed: bool,
}

impl NavbarVisibilityController {
    /// Controller for an explicit navbar node. `None` yields a controller
    /// that never does anything.
    pub fn new(navbar: Option<NodeId>, thresholds: NavbarThresholds) -> Self {
        Self {
            navbar,
            thresholds,
            previous: 0.0,
            latest: None,
            state: NavbarVisualState::default(),
            gate: FrameGate::default(),
            computations: 0,
            disposed: false,
        }
    }

    /// Locates the navbar with `selectors`. A missing navbar is not an error.
    pub fn attach(
        document: &Document,
        selectors: &SelectorList,
        thresholds: NavbarThresholds,
    ) -> Self {
        let navbar = document.query(selectors);
        if navbar.is_none() {
            debug!("no navbar matches `{selectors}`, navbar effects disabled");
        }
        Self::new(navbar, thresholds)
    }

    pub fn navbar(&self) -> Option<NodeId> {
        self.navbar
    }

    fn is_live(&self) -> bool {
        self.navbar.is_some() && !self.disposed
    }

    /// Records a raw scroll event and requests a frame unless one is pending.
    /// Returns true when a frame was requested.
    pub fn on_raw_scroll(
        &mut self,
        sample: ScrollSample,
        frames: &mut AnimationFrames<FrameTask>,
    ) -> bool {
        if !self.is_live() {
            return false;
        }
        self.latest = Some(sample);
        self.gate.schedule(frames, FrameTask::NavbarUpdate)
    }

    /// The frame callback: clears the pending flag and runs one computation
    /// with the most recent sample.
    pub fn on_frame(&mut self, document: &mut Document) -> Option<NavbarVisualState> {
        self.gate.release();
        let sample = self.latest?;
        self.on_scroll(document, sample)
    }

    /// Computes and applies the state for `sample`.
    pub fn on_scroll(
        &mut self,
        document: &mut Document,
        sample: ScrollSample,
    ) -> Option<NavbarVisualState> {
        if !self.is_live() {
            return None;
        }
        let state = derive_navbar_state(
            self.previous,
            sample.offset,
            self.state.hidden,
            &self.thresholds,
        );
        self.computations += 1;
        trace!(
            "navbar {:?} -> {:?} at offset {}",
            self.state.kind(),
            state.kind(),
            sample.offset
        );
        self.previous = sample.offset;
        self.state = state;
        self.apply(document, state);
        Some(state)
    }

    /// Writes `state` to the navbar node.
    pub fn apply(&self, document: &mut Document, state: NavbarVisualState) {
        let Some(navbar) = self.navbar else {
            return;
        };
        document.set_class(navbar, ELEVATED_CLASS, state.elevated);
        let transform = if state.hidden {
            HIDDEN_TRANSFORM
        } else {
            SHOWN_TRANSFORM
        };
        document.set_style(navbar, "transform", transform);
    }

    /// Pins the navbar to the top of the viewport and pads the body so
    /// content starts below it.
    pub fn pin(&self, document: &mut Document) {
        let Some(navbar) = self.navbar else {
            return;
        };
        document.set_style(navbar, "position", "fixed");
        document.set_style(navbar, "top", "0");
        document.set_style(navbar, "width", "100%");
        document.set_style(navbar, "z-index", "1030");
        let height = document.rect(navbar).height;
        let body = document.body();
        document.set_style(body, "padding-top", &format!("{height}px"));
    }

    pub fn state(&self) -> NavbarVisualState {
        self.state
    }

    /// Number of state computations performed.
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    /// Detaches from scroll input and drops the navbar reference.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.navbar = None;
        self.latest = None;
        self.gate.release();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
