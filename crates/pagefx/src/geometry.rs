//! Rectangles and intersection arithmetic in CSS pixels.

/// An axis-aligned rectangle in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// The overlapping region, or `None` when the rectangles are disjoint.
    ///
    /// Rectangles that only share an edge intersect with zero area.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Grows (positive) or shrinks (negative) each edge independently.
    pub fn expand(&self, margin: &RootMargin) -> Rect {
        Rect::new(
            self.x - margin.left,
            self.y - margin.top,
            self.width + margin.left + margin.right,
            self.height + margin.top + margin.bottom,
        )
    }

    /// Fraction of `self` that lies inside `root`, in `0.0..=1.0`.
    ///
    /// A zero-area rectangle counts as fully visible when it touches `root`.
    pub fn intersection_ratio(&self, root: &Rect) -> f64 {
        match self.intersection(root) {
            None => 0.0,
            Some(overlap) => {
                let area = self.area();
                if area == 0.0 {
                    1.0
                } else {
                    (overlap.area() / area).clamp(0.0, 1.0)
                }
            }
        }
    }
}

/// Per-edge adjustment of the intersection root, like CSS `rootMargin`.
///
/// Negative values pull the edge inward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Only the bottom edge is adjusted, e.g. `RootMargin::bottom(-50.0)`.
    pub fn bottom(bottom: f64) -> Self {
        Self {
            bottom,
            ..Self::default()
        }
    }
}
