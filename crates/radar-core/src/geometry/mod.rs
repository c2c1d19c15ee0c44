pub mod enclosing;

pub use enclosing::min_enclosing_circle;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `2 * radius` centered on `circle`, using truncated
    /// integer coordinates for both the center and the radius.
    pub fn around_circle(circle: &Circle) -> Self {
        let radius = circle.radius as i32;
        Self::new(
            circle.x as i32 - radius,
            circle.y as i32 - radius,
            radius * 2,
            radius * 2,
        )
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// True when the rectangle has a non-negative origin and its far edges stay
    /// strictly below `width` and `height`.
    pub fn lies_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 0
            && self.height >= 0
            && (self.right() as i64) < width as i64
            && (self.bottom() as i64) < height as i64
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Circle with a floating-point center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn contains(&self, point: (f64, f64)) -> bool {
        let dx = point.0 - self.x;
        let dy = point.1 - self.y;
        (dx * dx + dy * dy).sqrt() <= self.radius + enclosing::CONTAINMENT_EPS * self.radius.max(1.0)
    }
}
