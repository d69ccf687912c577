//! Core value types shared across the pipeline.
//!
//! Everything here is an immutable value: stages build fresh instances and
//! consumers read them; nothing outlives a single page's processing pass.

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Which table-line family a merging pass targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineOrientation {
    Horizontal,
    Vertical,
}

impl LineOrientation {
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, LineOrientation::Horizontal)
    }
}

/// Line segment with fixed start/end points. Undirected for geometric
/// purposes; a raw detection fragment or a finished table line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        let dx = (self.end.x - self.start.x) as f32;
        let dy = (self.end.y - self.start.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Mean position along the axis perpendicular to the line's family:
    /// the y-midpoint for horizontal lines, the x-midpoint for vertical.
    pub fn mean_coordinate(&self, orientation: LineOrientation) -> i32 {
        match orientation {
            LineOrientation::Horizontal => (self.start.y + self.end.y) / 2,
            LineOrientation::Vertical => (self.start.x + self.end.x) / 2,
        }
    }
}

/// Axis-aligned rectangle stored as top-left and bottom-right corners,
/// satisfying `x1 <= x2` and `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Rect {
    /// Build from any two opposite corners, normalizing the corner order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            top_left: Point::new(a.x.min(b.x), a.y.min(b.y)),
            bottom_right: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Horizontal extent `|x2 - x1|`.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bottom_right.x - self.top_left.x
    }

    /// Vertical extent `|y2 - y1|`.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom_right.y - self.top_left.y
    }

    /// Center point with integer truncation, matching the grid lookup
    /// convention used for cell assignment.
    pub fn center(&self) -> Point {
        Point::new(
            (self.top_left.x + self.bottom_right.x) / 2,
            (self.top_left.y + self.bottom_right.y) / 2,
        )
    }

    /// Grow the rectangle by per-side extra lengths, then clamp to the image
    /// bounds `[0, width-1] x [0, height-1]`.
    pub fn extended_clamped(
        &self,
        left: i32,
        right: i32,
        top: i32,
        bottom: i32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let x1 = (self.top_left.x - left).max(0);
        let y1 = (self.top_left.y - top).max(0);
        let x2 = (self.bottom_right.x + right).min(image_width as i32 - 1);
        let y2 = (self.bottom_right.y + bottom).min(image_height as i32 - 1);
        Self {
            top_left: Point::new(x1, y1),
            bottom_right: Point::new(x2, y2),
        }
    }
}

/// Full table-line set plus detected element rectangles for one page.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TableDescription {
    pub horizontal_lines: Vec<Segment>,
    pub vertical_lines: Vec<Segment>,
    /// Concatenation of horizontal then vertical lines.
    pub all_lines: Vec<Segment>,
    /// Minimal bounding rectangles of the detected content blobs.
    pub elements: Vec<Rect>,
}

impl TableDescription {
    pub fn from_lines(horizontal: Vec<Segment>, vertical: Vec<Segment>) -> Self {
        let mut all_lines = Vec::with_capacity(horizontal.len() + vertical.len());
        all_lines.extend_from_slice(&horizontal);
        all_lines.extend_from_slice(&vertical);
        Self {
            horizontal_lines: horizontal,
            vertical_lines: vertical,
            all_lines,
            elements: Vec::new(),
        }
    }
}
