//! Computer-vision primitives over 8-bit grayscale rasters.
//!
//! Thin, owned-buffer wrappers around `image`/`imageproc`: inverted Otsu
//! binarization, thick-stroke drawing, contour extraction and 8-connectivity
//! component labeling with per-component statistics. Every raster produced
//! here is privately owned by the stage that requested it; nothing is shared
//! between stages.

use crate::types::{Point, Rect, Segment};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::contours::{find_contours, Contour};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point as RasterPoint;
use imageproc::rect::Rect as RasterRect;
use imageproc::region_labelling::{connected_components, Connectivity};

/// Foreground color used when rasterizing geometry into scratch buffers.
pub const FOREGROUND: u8 = 255;
/// Background color, also used to erase geometry from a binarized raster.
pub const BACKGROUND: u8 = 0;

/// Zero-initialized raster with the same dimensions as `image`.
pub fn blank_like(image: &GrayImage) -> GrayImage {
    GrayImage::new(image.width(), image.height())
}

/// Binarize with a parameter-free global Otsu threshold, inverted so that
/// dark page content (ink) becomes foreground-high.
pub fn binarize_otsu(image: &GrayImage) -> GrayImage {
    let level = otsu_level(image);
    threshold(image, level, ThresholdType::BinaryInverted)
}

/// Draw a segment with a centered stroke of the given thickness and round
/// end caps. A thickness of one falls back to a plain one-pixel line.
pub fn draw_segment(canvas: &mut GrayImage, segment: &Segment, color: u8, thickness: i32) {
    let (x0, y0) = (segment.start.x as f32, segment.start.y as f32);
    let (x1, y1) = (segment.end.x as f32, segment.end.y as f32);
    if thickness <= 1 {
        draw_line_segment_mut(canvas, (x0, y0), (x1, y1), Luma([color]));
        return;
    }

    let half = thickness as f32 * 0.5;
    let radius = (half.round() as i32).max(1);
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len = (dx * dx + dy * dy).sqrt();
    if len > 0.5 {
        let nx = -dy / len * half;
        let ny = dx / len * half;
        let quad = [
            RasterPoint::new((x0 + nx).round() as i32, (y0 + ny).round() as i32),
            RasterPoint::new((x1 + nx).round() as i32, (y1 + ny).round() as i32),
            RasterPoint::new((x1 - nx).round() as i32, (y1 - ny).round() as i32),
            RasterPoint::new((x0 - nx).round() as i32, (y0 - ny).round() as i32),
        ];
        // draw_polygon_mut rejects a closed ring; skip the quad when rounding
        // collapses it and let the end caps cover the stroke.
        if quad.first() != quad.last() {
            draw_polygon_mut(canvas, &quad, Luma([color]));
        }
    }
    draw_filled_circle_mut(canvas, (x0 as i32, y0 as i32), radius, Luma([color]));
    draw_filled_circle_mut(canvas, (x1 as i32, y1 as i32), radius, Luma([color]));
}

/// Draw every segment of `segments` into `canvas` with one stroke setting.
pub fn draw_segments(canvas: &mut GrayImage, segments: &[Segment], color: u8, thickness: i32) {
    for segment in segments {
        draw_segment(canvas, segment, color, thickness);
    }
}

/// Draw a rectangle outline, thickening inward for `thickness > 1`.
pub fn draw_rect_outline(canvas: &mut GrayImage, rect: &Rect, color: u8, thickness: i32) {
    for i in 0..thickness.max(1) {
        let x = rect.top_left.x + i;
        let y = rect.top_left.y + i;
        let w = rect.width() + 1 - 2 * i;
        let h = rect.height() + 1 - 2 * i;
        if w <= 0 || h <= 0 {
            break;
        }
        draw_hollow_rect_mut(
            canvas,
            RasterRect::at(x, y).of_size(w as u32, h as u32),
            Luma([color]),
        );
    }
}

pub fn draw_rect_outlines(canvas: &mut GrayImage, rects: &[Rect], color: u8, thickness: i32) {
    for rect in rects {
        draw_rect_outline(canvas, rect, color, thickness);
    }
}

/// Extract all outline contours of the foreground, full hierarchy, every
/// boundary pixel retained.
pub fn extract_contours(image: &GrayImage) -> Vec<Contour<i32>> {
    find_contours::<i32>(image)
}

/// Stamp a contour into `canvas` with a thick round brush so that contours
/// belonging to the same content blob touch and merge.
pub fn draw_contour(canvas: &mut GrayImage, contour: &Contour<i32>, color: u8, thickness: i32) {
    if thickness <= 1 {
        for p in &contour.points {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height()
            {
                canvas.put_pixel(p.x as u32, p.y as u32, Luma([color]));
            }
        }
        return;
    }
    let radius = ((thickness as f32 * 0.5).round() as i32).max(1);
    for p in &contour.points {
        draw_filled_circle_mut(canvas, (p.x, p.y), radius, Luma([color]));
    }
}

pub fn draw_contours(canvas: &mut GrayImage, contours: &[Contour<i32>], color: u8, thickness: i32) {
    for contour in contours {
        draw_contour(canvas, contour, color, thickness);
    }
}

/// Area enclosed by a contour ring (shoelace over the boundary pixels).
pub fn contour_area(contour: &Contour<i32>) -> f64 {
    let pts = &contour.points;
    if pts.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    (twice_area.abs() as f64) * 0.5
}

/// Keep contours whose enclosed area falls within the optional bounds.
pub fn filter_contours(
    contours: Vec<Contour<i32>>,
    area_min: Option<f64>,
    area_max: Option<f64>,
) -> Vec<Contour<i32>> {
    contours
        .into_iter()
        .filter(|c| {
            let area = contour_area(c);
            area_min.is_none_or(|min| area >= min) && area_max.is_none_or(|max| area <= max)
        })
        .collect()
}

/// Statistics of one labeled component: pixel count, minimal bounding box
/// (inclusive corners) and centroid.
#[derive(Clone, Debug)]
pub struct ComponentStats {
    pub area: u32,
    pub bounding_box: Rect,
    pub centroid: [f32; 2],
}

/// Result of 8-connectivity component labeling. Entry 0 of `stats` always
/// describes the background.
pub struct Components {
    pub count: usize,
    pub labels: ImageBuffer<Luma<u32>, Vec<u32>>,
    pub stats: Vec<ComponentStats>,
}

/// Label the foreground of a binary raster with 8-connectivity and collect
/// per-component statistics, background included at index 0.
pub fn label_components(image: &GrayImage) -> Components {
    let labels = connected_components(image, Connectivity::Eight, Luma([BACKGROUND]));

    let mut max_label = 0u32;
    for Luma([label]) in labels.pixels() {
        max_label = max_label.max(*label);
    }
    let count = max_label as usize + 1;

    struct Acc {
        area: u64,
        sum_x: u64,
        sum_y: u64,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    }
    let mut accs: Vec<Acc> = (0..count)
        .map(|_| Acc {
            area: 0,
            sum_x: 0,
            sum_y: 0,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        })
        .collect();

    for (x, y, Luma([label])) in labels.enumerate_pixels() {
        let acc = &mut accs[*label as usize];
        acc.area += 1;
        acc.sum_x += x as u64;
        acc.sum_y += y as u64;
        acc.min_x = acc.min_x.min(x as i32);
        acc.min_y = acc.min_y.min(y as i32);
        acc.max_x = acc.max_x.max(x as i32);
        acc.max_y = acc.max_y.max(y as i32);
    }

    let stats = accs
        .into_iter()
        .map(|acc| {
            if acc.area == 0 {
                ComponentStats {
                    area: 0,
                    bounding_box: Rect::from_corners(Point::new(0, 0), Point::new(0, 0)),
                    centroid: [0.0, 0.0],
                }
            } else {
                ComponentStats {
                    area: acc.area as u32,
                    bounding_box: Rect::from_corners(
                        Point::new(acc.min_x, acc.min_y),
                        Point::new(acc.max_x, acc.max_y),
                    ),
                    centroid: [
                        acc.sum_x as f32 / acc.area as f32,
                        acc.sum_y as f32 / acc.area as f32,
                    ],
                }
            }
        })
        .collect();

    Components {
        count,
        labels,
        stats,
    }
}

impl Components {
    /// Bounding rectangles of every component except the background, each
    /// optionally stretched per side and clamped to the image bounds. The
    /// bottom-right corner follows the exclusive `min + extent` convention
    /// of the labeling statistics before clamping.
    pub fn rectangles(
        &self,
        image_width: u32,
        image_height: u32,
        left_extra: i32,
        right_extra: i32,
        top_extra: i32,
        bottom_extra: i32,
    ) -> Vec<Rect> {
        self.stats
            .iter()
            .skip(1)
            .map(|stat| {
                let base = Rect::from_corners(
                    stat.bounding_box.top_left,
                    Point::new(
                        stat.bounding_box.bottom_right.x + 1,
                        stat.bounding_box.bottom_right.y + 1,
                    ),
                );
                base.extended_clamped(
                    left_extra,
                    right_extra,
                    top_extra,
                    bottom_extra,
                    image_width,
                    image_height,
                )
            })
            .collect()
    }
}

/// Coordinates of all foreground pixels inside `rect`, expressed in the
/// cropped rectangle's local frame.
pub fn foreground_points_in(image: &GrayImage, rect: &Rect) -> Vec<[f32; 2]> {
    let x1 = rect.top_left.x.max(0) as u32;
    let y1 = rect.top_left.y.max(0) as u32;
    let x2 = (rect.bottom_right.x.max(0) as u32).min(image.width().saturating_sub(1));
    let y2 = (rect.bottom_right.y.max(0) as u32).min(image.height().saturating_sub(1));

    let mut points = Vec::new();
    for y in y1..=y2 {
        for x in x1..=x2 {
            if image.get_pixel(x, y).0[0] != BACKGROUND {
                points.push([(x - x1) as f32, (y - y1) as f32]);
            }
        }
    }
    points
}
