//! Geometric primitives for page layout.
//!
//! Coordinates follow the convention of span-level layout providers: the
//! origin is the top-left corner of the page, x grows to the right and y
//! grows downwards. A fragment's `y0` is therefore its top edge.

use serde::{Deserialize, Serialize};

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate (top-down)
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    ///
    /// # Examples
    ///
    /// ```
    /// use drawing_oxide::geometry::Point;
    ///
    /// let a = Point::new(0.0, 0.0);
    /// let b = Point::new(3.0, 4.0);
    /// assert_eq!(a.distance_to(&b), 5.0);
    /// ```
    pub fn distance_to(&self, other: &Point) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// An axis-aligned bounding box in page space.
///
/// Stored as its two corners, matching the `(x0, y0, x1, y1)` tuples emitted
/// by layout providers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from its corners.
    ///
    /// Corners given in the wrong order are swapped so that `x0 <= x1` and
    /// `y0 <= y1` always hold.
    ///
    /// # Examples
    ///
    /// ```
    /// use drawing_oxide::geometry::Rect;
    ///
    /// let rect = Rect::from_points(110.0, 70.0, 10.0, 20.0);
    /// assert_eq!(rect.x0, 10.0);
    /// assert_eq!(rect.y0, 20.0);
    /// assert_eq!(rect.width(), 100.0);
    /// assert_eq!(rect.height(), 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Vertical center, used for line grouping.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Smallest rectangle containing both rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// use drawing_oxide::geometry::Rect;
    ///
    /// let a = Rect::from_points(0.0, 0.0, 50.0, 50.0);
    /// let b = Rect::from_points(25.0, 25.0, 75.0, 75.0);
    /// let u = a.union(&b);
    /// assert_eq!((u.x0, u.y0, u.x1, u.y1), (0.0, 0.0, 75.0, 75.0));
    /// ```
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Width of the horizontal overlap with another rectangle (0 when disjoint).
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Vertical distance from the bottom of `self` to the top of `other`.
    ///
    /// Negative when `other` starts above the bottom edge of `self`.
    pub fn gap_below(&self, other: &Rect) -> f32 {
        other.y0 - self.y1
    }
}

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
}

impl PageSize {
    /// Create a page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_normalizes_corners() {
        let r = Rect::from_points(110.0, 70.0, 10.0, 20.0);
        assert_eq!(r.x0, 10.0);
        assert_eq!(r.y0, 20.0);
        assert_eq!(r.x1, 110.0);
        assert_eq!(r.y1, 70.0);
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::from_points(0.0, 0.0, 100.0, 50.0);
        let center = r.center();
        assert_eq!(center.x, 50.0);
        assert_eq!(center.y, 25.0);
        assert_eq!(r.center_y(), 25.0);
    }

    #[test]
    fn test_horizontal_overlap() {
        let a = Rect::from_points(0.0, 0.0, 100.0, 10.0);
        let b = Rect::from_points(60.0, 20.0, 200.0, 30.0);
        let c = Rect::from_points(300.0, 0.0, 400.0, 10.0);
        assert_eq!(a.horizontal_overlap(&b), 40.0);
        assert_eq!(a.horizontal_overlap(&c), 0.0);
    }

    #[test]
    fn test_gap_below() {
        let upper = Rect::from_points(0.0, 0.0, 100.0, 12.0);
        let lower = Rect::from_points(0.0, 16.0, 100.0, 28.0);
        assert_eq!(upper.gap_below(&lower), 4.0);
        assert!(lower.gap_below(&upper) < 0.0);
    }

    #[test]
    fn test_distance() {
        let p1 = Point::new(1.0, 1.0);
        let p2 = Point::new(1.0, 1.0);
        assert_eq!(p1.distance_to(&p2), 0.0);
    }

    #[test]
    fn test_page_size_validity() {
        assert!(PageSize::new(841.0, 594.0).is_valid());
        assert!(!PageSize::new(0.0, 594.0).is_valid());
        assert!(!PageSize::new(f32::NAN, 594.0).is_valid());
    }
}
