//! Table-line reconstruction: collapse noisy raw segment fragments into a
//! small set of long, accurate table lines of one orientation.
//!
//! One parametrized pass serves both orientations; only the pruning axis,
//! the extension direction and the span axis differ. The pipeline is
//!
//! 1. prune raw segments by length and off-axis angle,
//! 2. rasterize the survivors with a thick stroke so close fragments touch,
//! 3. label the raster and extend each component's bounding rectangle along
//!    the orientation so collinear groups separated by gaps coalesce,
//! 4. rasterize the extended rectangles and label again, giving one
//!    component per candidate table line,
//! 5. discard candidates whose span along the orientation is too short,
//! 6. fit a least-squares line through the original stroke pixels inside
//!    each surviving rectangle and emit its endpoint segment.

use crate::error::{DetectError, Result};
use crate::geometry::{self, RectBounds};
use crate::lsd::{filter_raw_segments, RawSegment, RawSegmentFilter};
use crate::raster;
use crate::types::{LineOrientation, Point, Rect, Segment};
use image::GrayImage;
use log::debug;
use serde::{Deserialize, Serialize};

/// Thresholds for one merging pass. Horizontal and vertical passes carry
/// independent instances.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LineMergeOptions {
    /// Prune raw segments shorter than this many pixels.
    pub min_segment_length: Option<f32>,
    /// Prune raw segments whose `|sin(angle)|` (horizontal pass) or
    /// `|cos(angle)|` (vertical pass) exceeds this bound.
    pub max_off_axis: Option<f32>,
    /// Extra length added to each cluster rectangle along the orientation
    /// (rightward for horizontal, downward for vertical). Governs the gap
    /// size across which collinear fragments still merge.
    pub extension_px: i32,
    /// Minimum extent of a merged cluster along the orientation axis;
    /// shorter clusters are treated as noise.
    pub min_span_px: i32,
    /// Stroke thickness used when rasterizing raw segments.
    pub stroke_thickness: i32,
}

impl Default for LineMergeOptions {
    fn default() -> Self {
        Self {
            min_segment_length: Some(50.0),
            max_off_axis: Some(0.1),
            extension_px: 150,
            min_span_px: 750,
            stroke_thickness: 5,
        }
    }
}

impl LineMergeOptions {
    pub fn validate(&self) -> Result<()> {
        if self.min_segment_length.is_some_and(|v| v <= 0.0) {
            return Err(DetectError::config("min_segment_length must be positive"));
        }
        if self.max_off_axis.is_some_and(|v| v <= 0.0) {
            return Err(DetectError::config("max_off_axis must be positive"));
        }
        if self.extension_px < 0 {
            return Err(DetectError::config("extension_px must be non-negative"));
        }
        if self.min_span_px < 0 {
            return Err(DetectError::config("min_span_px must be non-negative"));
        }
        if self.stroke_thickness < 1 {
            return Err(DetectError::config("stroke_thickness must be at least 1"));
        }
        Ok(())
    }
}

/// Merge raw segment detections into table lines of the given orientation,
/// expressed in the coordinate frame of the original `width x height` page.
pub fn merge_segments(
    width: u32,
    height: u32,
    raw_segments: &[RawSegment],
    orientation: LineOrientation,
    options: &LineMergeOptions,
) -> Result<Vec<Segment>> {
    options.validate()?;

    // 1) Prune by length and off-axis angle.
    let filter = match orientation {
        LineOrientation::Horizontal => RawSegmentFilter {
            length_min: options.min_segment_length,
            sin_max: options.max_off_axis,
            ..RawSegmentFilter::default()
        },
        LineOrientation::Vertical => RawSegmentFilter {
            length_min: options.min_segment_length,
            cos_max: options.max_off_axis,
            ..RawSegmentFilter::default()
        },
    };
    let kept = filter_raw_segments(raw_segments, &filter);
    debug!(
        "{orientation:?} merge: {} of {} raw segments kept",
        kept.len(),
        raw_segments.len()
    );

    // 2) Rasterize the survivors with a thick stroke.
    let mut stroke_raster = GrayImage::new(width, height);
    for segment in &kept {
        let rounded = Segment::new(
            Point::new(segment.p0[0] as i32, segment.p0[1] as i32),
            Point::new(segment.p1[0] as i32, segment.p1[1] as i32),
        );
        raster::draw_segment(
            &mut stroke_raster,
            &rounded,
            raster::FOREGROUND,
            options.stroke_thickness,
        );
    }

    // 3) First cluster pass: component rectangles, extended along the
    // orientation so collinear fragments across gaps become overlapping.
    let (right_extra, bottom_extra) = match orientation {
        LineOrientation::Horizontal => (options.extension_px, 0),
        LineOrientation::Vertical => (0, options.extension_px),
    };
    let components = raster::label_components(&stroke_raster);
    let extended_rects = components.rectangles(width, height, 0, right_extra, 0, bottom_extra);

    // 4) Second cluster pass over the extended rectangle outlines.
    let mut rect_raster = GrayImage::new(width, height);
    raster::draw_rect_outlines(&mut rect_raster, &extended_rects, raster::FOREGROUND, 1);
    let rect_components = raster::label_components(&rect_raster);
    let cluster_rects = rect_components.rectangles(width, height, 0, 0, 0, 0);

    // 5) Span filter along the orientation axis.
    let bounds = match orientation {
        LineOrientation::Horizontal => RectBounds::horizontal_min(options.min_span_px),
        LineOrientation::Vertical => RectBounds::vertical_min(options.min_span_px),
    };
    let surviving = geometry::filter_rectangles(&cluster_rects, &bounds);
    debug!(
        "{orientation:?} merge: {} clusters, {} past the span filter",
        cluster_rects.len(),
        surviving.len()
    );

    // 6) One least-squares line per surviving cluster.
    let mut lines = Vec::with_capacity(surviving.len());
    for rect in &surviving {
        lines.push(fit_cluster_line(&stroke_raster, rect, orientation)?);
    }
    Ok(lines)
}

/// Fit a single line to the stroke pixels inside `rect` and return its
/// endpoint segment in full-image coordinates.
///
/// An empty crop is a hard error: it means the span filter passed a cluster
/// the stroke raster cannot support, and silently skipping it would yield an
/// incomplete table structure indistinguishable from a correct one.
fn fit_cluster_line(
    stroke_raster: &GrayImage,
    rect: &Rect,
    orientation: LineOrientation,
) -> Result<Segment> {
    let points = raster::foreground_points_in(stroke_raster, rect);
    if points.is_empty() {
        return Err(DetectError::DegenerateCluster {
            orientation,
            rect: *rect,
        });
    }

    let line = geometry::fit_line(&points)?;

    let (x1, y1, x2, y2);
    match orientation {
        LineOrientation::Horizontal => {
            let min_x = points.iter().map(|p| p[0]).fold(f32::INFINITY, f32::min);
            let max_x = points.iter().map(|p| p[0]).fold(f32::NEG_INFINITY, f32::max);
            x1 = min_x;
            x2 = max_x;
            if line.dy == 0.0 {
                // perfectly horizontal fit: the anchor y holds everywhere
                y1 = line.y0;
                y2 = line.y0;
            } else {
                y1 = line.point_at_x(min_x);
                y2 = line.point_at_x(max_x);
            }
        }
        LineOrientation::Vertical => {
            let min_y = points.iter().map(|p| p[1]).fold(f32::INFINITY, f32::min);
            let max_y = points.iter().map(|p| p[1]).fold(f32::NEG_INFINITY, f32::max);
            y1 = min_y;
            y2 = max_y;
            if line.dx == 0.0 {
                x1 = line.x0;
                x2 = line.x0;
            } else {
                x1 = line.point_at_y(min_y);
                x2 = line.point_at_y(max_y);
            }
        }
    }

    // back from the cropped rectangle's local frame into page coordinates
    Ok(Segment::new(
        Point::new(x1 as i32 + rect.top_left.x, y1 as i32 + rect.top_left.y),
        Point::new(x2 as i32 + rect.top_left.x, y2 as i32 + rect.top_left.y),
    ))
}
