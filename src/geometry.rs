//! Pixel-space points, rectangles and overlap metrics.

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box given by its top-left corner and size.
///
/// Degenerate boxes (zero or negative width/height) are valid values and
/// contribute zero area to overlap computations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a rect spanning `top_left` to `bottom_right`.
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self {
            x: top_left.x,
            y: top_left.y,
            width: bottom_right.x.saturating_sub(top_left.x),
            height: bottom_right.y.saturating_sub(top_left.y),
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }

    /// Area in square pixels; zero for degenerate rects.
    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }

    /// Area shared with `other`.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let left = i64::from(self.x.max(other.x));
        let top = i64::from(self.y.max(other.y));
        let right = (i64::from(self.x) + i64::from(self.width))
            .min(i64::from(other.x) + i64::from(other.width));
        let bottom = (i64::from(self.y) + i64::from(self.height))
            .min(i64::from(other.y) + i64::from(other.height));
        (right - left).max(0) * (bottom - top).max(0)
    }

    /// Combined area covered by both rects.
    pub fn union_area(&self, other: &Rect) -> i64 {
        self.area() + other.area() - self.intersection_area(other)
    }

    /// Intersection over union with `other`; see [`iou`].
    pub fn iou(&self, other: &Rect) -> f32 {
        iou(self, other)
    }
}

/// Intersection over union of two rects in the same coordinate space.
///
/// Returns `0.0` when the union is empty, so two degenerate boxes never
/// divide by zero.
pub fn iou(a: &Rect, b: &Rect) -> f32 {
    let inter = a.intersection_area(b);
    let union = a.union_area(b);
    if union <= 0 {
        return 0.0;
    }
    (inter as f64 / union as f64) as f32
}
