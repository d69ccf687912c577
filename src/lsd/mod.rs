//! Raw line-segment detection seam.
//!
//! The merging stage only needs a bag of raw segments with endpoints, angle
//! and length; where they come from is a collaborator concern behind the
//! [`SegmentDetector`] trait. [`GradientSegmentDetector`] is the built-in
//! implementation: Sobel gradients plus orientation region growing.

mod extractor;
mod grad;

pub use extractor::{GradientSegmentDetector, LsdOptions};

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Raw line-segment detection, one fragment of a possibly longer line.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RawSegment {
    pub p0: [f32; 2],
    pub p1: [f32; 2],
    /// Direction angle `atan2(dy, dx)` in `[-pi, pi]`.
    pub angle: f32,
    pub length: f32,
}

impl RawSegment {
    pub fn new(p0: [f32; 2], p1: [f32; 2]) -> Self {
        let dx = p1[0] - p0[0];
        let dy = p1[1] - p0[1];
        Self {
            p0,
            p1,
            angle: dy.atan2(dx),
            length: (dx * dx + dy * dy).sqrt(),
        }
    }
}

/// Source of raw segments for one page.
pub trait SegmentDetector {
    /// Detect raw line segments in `image`. Pixels where `mask` is zero are
    /// ignored; `None` means the whole image participates.
    fn detect(&self, image: &GrayImage, mask: Option<&GrayImage>) -> Vec<RawSegment>;
}

/// Optional pruning bounds applied to raw segments before merging.
///
/// The main pipeline uses `length_min` together with `sin_max` (horizontal
/// passes) or `cos_max` (vertical passes); the remaining bounds cover the
/// symmetric cases.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct RawSegmentFilter {
    pub length_min: Option<f32>,
    pub length_max: Option<f32>,
    /// Upper bound on `|cos(angle)|`; prunes segments that are too far from
    /// vertical.
    pub cos_max: Option<f32>,
    pub cos_min: Option<f32>,
    /// Upper bound on `|sin(angle)|`; prunes segments that are too far from
    /// horizontal.
    pub sin_max: Option<f32>,
    pub sin_min: Option<f32>,
}

impl RawSegmentFilter {
    fn accepts(&self, segment: &RawSegment) -> bool {
        if self.length_min.is_some_and(|b| segment.length < b) {
            return false;
        }
        if self.length_max.is_some_and(|b| segment.length > b) {
            return false;
        }
        let cos = segment.angle.cos().abs();
        if self.cos_max.is_some_and(|b| cos > b) {
            return false;
        }
        if self.cos_min.is_some_and(|b| cos < b) {
            return false;
        }
        let sin = segment.angle.sin().abs();
        if self.sin_max.is_some_and(|b| sin > b) {
            return false;
        }
        if self.sin_min.is_some_and(|b| sin < b) {
            return false;
        }
        true
    }
}

/// Apply `filter` to `segments`, preserving order.
pub fn filter_raw_segments(segments: &[RawSegment], filter: &RawSegmentFilter) -> Vec<RawSegment> {
    segments
        .iter()
        .copied()
        .filter(|s| filter.accepts(s))
        .collect()
}
