//! Axis-aligned rectangles in widget-local coordinates.

/// A rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f64,
    /// Y position (top edge).
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle centred on the origin with the given half extents.
    #[must_use]
    pub fn centered(hw: f64, hh: f64) -> Self {
        Self::new(-hw, -hh, 2.0 * hw, 2.0 * hh)
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns true if the point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if the point is inside the rectangle with rounded corners.
    #[must_use]
    pub fn contains_rounded(&self, x: f64, y: f64, radius: f64) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let r = radius.min(self.width * 0.5).min(self.height * 0.5).max(0.0);
        if r == 0.0 {
            return true;
        }
        // Distance from the inner rectangle the corner arcs are centred on.
        let cx = x.clamp(self.x + r, self.right() - r);
        let cy = y.clamp(self.y + r, self.bottom() - r);
        (x - cx).powi(2) + (y - cy).powi(2) <= r * r
    }

    /// Shrinks the rectangle by `amount` on every side.
    #[must_use]
    pub fn shrink(&self, amount: f64) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }
}
