//! What the hosting page tells us about the viewport and user preferences.

use crate::geometry::Rect;

/// Widths at or below this many CSS pixels are treated as mobile.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Vertical scroll offset, never negative.
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    pub fn with_scroll(mut self, scroll_y: f64) -> Self {
        self.scroll_y = scroll_y.max(0.0);
        self
    }

    /// The viewport as a rectangle in document coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.width, self.height)
    }

    pub fn is_mobile(&self, breakpoint: f64) -> bool {
        self.width <= breakpoint
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Host capabilities and user preferences sampled at start-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub viewport: Viewport,
    /// The user asked for reduced motion (`prefers-reduced-motion: reduce`).
    pub reduced_motion: bool,
    /// The host can report element visibility.
    pub supports_intersection: bool,
}

impl Environment {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            reduced_motion: false,
            supports_intersection: true,
        }
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    pub fn with_intersection_support(mut self, supported: bool) -> Self {
        self.supports_intersection = supported;
        self
    }

    /// Motion enhancements are skipped on small screens and when the user
    /// prefers reduced motion.
    pub fn allows_motion(&self, mobile_breakpoint: f64) -> bool {
        !self.reduced_motion && !self.viewport.is_mobile(mobile_breakpoint)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}
