//! Layout-space geometry. Everything is `f64` logical units; the engine
//! reinterprets the axes itself when the taskbar runs vertically.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

impl core::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point { Point::new(self.x - rhs.x, self.y - rhs.y) }
}

impl core::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point { Point::new(self.x + rhs.x, self.y + rhs.y) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self { Self { width, height } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn left(&self) -> f64 { self.origin.x }

    pub fn top(&self) -> f64 { self.origin.y }

    pub fn right(&self) -> f64 { self.origin.x + self.size.width }

    pub fn bottom(&self) -> f64 { self.origin.y + self.size.height }

    pub fn width(&self) -> f64 { self.size.width }

    pub fn height(&self) -> f64 { self.size.height }

    pub fn top_left(&self) -> Point { self.origin }

    pub fn move_to(&mut self, pos: Point) { self.origin = pos; }

    pub fn move_left(&mut self, x: f64) { self.origin.x = x; }

    pub fn move_top(&mut self, y: f64) { self.origin.y = y; }

    /// Shrinks the rect by per-edge margins, clamping the size at zero.
    pub fn adjusted(&self, left: f64, top: f64, right: f64, bottom: f64) -> Rect {
        Rect {
            origin: Point::new(self.origin.x + left, self.origin.y + top),
            size: Size::new(
                (self.size.width - left - right).max(0.0),
                (self.size.height - top - bottom).max(0.0),
            ),
        }
    }

    pub fn contains(&self, pos: Point) -> bool {
        pos.x >= self.left() && pos.x < self.right() && pos.y >= self.top() && pos.y < self.bottom()
    }
}

/// Content margins handed down by the host container.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Margins {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_vertical(self) -> bool { self == Orientation::Vertical }
}

/// Traversal direction of the host UI. Right-to-left mirrors rows
/// (or columns, in vertical orientation) and swaps the margin axes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl LayoutDirection {
    pub fn is_rtl(self) -> bool { self == LayoutDirection::RightToLeft }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusted_clamps_at_zero() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let shrunk = rect.adjusted(8.0, 8.0, 8.0, 8.0);
        assert_eq!(shrunk.size, Size::new(0.0, 0.0));
        assert_eq!(shrunk.origin, Point::new(8.0, 8.0));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(1.0, 1.0, 4.0, 4.0);
        assert!(rect.contains(Point::new(1.0, 1.0)));
        assert!(rect.contains(Point::new(4.9, 4.9)));
        assert!(!rect.contains(Point::new(5.0, 3.0)));
        assert!(!rect.contains(Point::new(3.0, 5.0)));
    }
}
