//! Geometry types for framing: rectangles, sizes, padding and crop.
//!
//! Rectangles are expressed in source-video pixel coordinates.

use serde::{Deserialize, Serialize};

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height <= 0.0 {
            return 1.0;
        }
        self.width / self.height
    }
}

/// An axis-aligned rectangle in source-video pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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

    /// Rectangle covering the whole frame.
    pub fn full(frame: Size) -> Self {
        Self::new(0.0, 0.0, frame.width, frame.height)
    }

    /// Create a rectangle centered at `(cx, cy)`, shifted to stay inside `frame`.
    pub fn centered_in(cx: f64, cy: f64, width: f64, height: f64, frame: Size) -> Self {
        let width = width.clamp(1.0, frame.width.max(1.0));
        let height = height.clamp(1.0, frame.height.max(1.0));

        let x = (cx - width / 2.0).clamp(0.0, (frame.width - width).max(0.0));
        let y = (cy - height / 2.0).clamp(0.0, (frame.height - height).max(0.0));

        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Magnification this rectangle represents when scaled up to fill `frame`.
    pub fn zoom_factor(&self, frame: Size) -> f64 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 1.0;
        }
        (frame.width / self.width).min(frame.height / self.height)
    }

    /// Linearly interpolate between two rectangles.
    pub fn lerp(a: &Rect, b: &Rect, t: f64) -> Rect {
        let t = t.clamp(0.0, 1.0);
        Rect {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            width: a.width + (b.width - a.width) * t,
            height: a.height + (b.height - a.height) * t,
        }
    }

    /// Intersection with another rectangle, if they overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Per-corner radii in output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    pub fn uniform(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }
}
