//! Synthetic pages and stubbed raw-segment input for integration tests.

use image::{GrayImage, Luma};
use table_detector::lsd::{RawSegment, SegmentDetector};

pub const PAPER: u8 = 230;
pub const INK: u8 = 20;

/// Blank page filled with paper-colored pixels.
pub fn blank_page(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([PAPER]))
}

/// Paint a horizontal ruling of the given ink thickness.
pub fn draw_horizontal_ruling(page: &mut GrayImage, y: u32, x0: u32, x1: u32, thickness: u32) {
    for yy in y.saturating_sub(thickness / 2)..=(y + thickness / 2).min(page.height() - 1) {
        for x in x0..=x1.min(page.width() - 1) {
            page.put_pixel(x, yy, Luma([INK]));
        }
    }
}

/// Paint a vertical ruling of the given ink thickness.
pub fn draw_vertical_ruling(page: &mut GrayImage, x: u32, y0: u32, y1: u32, thickness: u32) {
    for xx in x.saturating_sub(thickness / 2)..=(x + thickness / 2).min(page.width() - 1) {
        for y in y0..=y1.min(page.height() - 1) {
            page.put_pixel(xx, y, Luma([INK]));
        }
    }
}

/// Paint a filled ink block (a content blob standing in for a word).
pub fn draw_blob(page: &mut GrayImage, cx: u32, cy: u32, half: u32) {
    for y in cy.saturating_sub(half)..=(cy + half).min(page.height() - 1) {
        for x in cx.saturating_sub(half)..=(cx + half).min(page.width() - 1) {
            page.put_pixel(x, y, Luma([INK]));
        }
    }
}

/// Segment detector returning a fixed set of raw segments, standing in for
/// the external line-segment detector collaborator.
pub struct StubDetector {
    pub segments: Vec<RawSegment>,
}

impl SegmentDetector for StubDetector {
    fn detect(&self, _image: &GrayImage, _mask: Option<&GrayImage>) -> Vec<RawSegment> {
        self.segments.clone()
    }
}

/// Fragment one horizontal line at `y` into collinear raw segments with the
/// given gaps.
pub fn fragmented_horizontal(y: f32, spans: &[(f32, f32)]) -> Vec<RawSegment> {
    spans
        .iter()
        .map(|&(x0, x1)| RawSegment::new([x0, y], [x1, y]))
        .collect()
}

/// Fragment one vertical line at `x` into collinear raw segments.
pub fn fragmented_vertical(x: f32, spans: &[(f32, f32)]) -> Vec<RawSegment> {
    spans
        .iter()
        .map(|&(y0, y1)| RawSegment::new([x, y0], [x, y1]))
        .collect()
}
