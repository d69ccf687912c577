use crate::diagnostics::{DetectionReport, ElementStageReport, LineStageReport};
use crate::error::Result;
use crate::lsd::{GradientSegmentDetector, RawSegment, SegmentDetector};
use crate::merge::merge_segments;
use crate::raster;
use crate::types::{LineOrientation, Rect, Segment, TableDescription};
use image::GrayImage;
use log::{debug, warn};
use std::time::Instant;

use super::params::TableParams;

/// Orchestrates the full pipeline for one page: raw segment detection, the
/// two line-merging passes, and the element-blob pass. Lines are always
/// produced before elements because element segmentation needs the lines
/// erased from the page first.
pub struct TableDetector {
    params: TableParams,
    segment_detector: Box<dyn SegmentDetector>,
}

impl TableDetector {
    /// Detector with validated parameters and the built-in gradient
    /// segment extractor.
    pub fn new(params: TableParams) -> Result<Self> {
        let lsd = params.lsd;
        Self::with_segment_detector(params, Box::new(GradientSegmentDetector::new(lsd)))
    }

    /// Detector backed by an external raw segment source.
    pub fn with_segment_detector(
        params: TableParams,
        segment_detector: Box<dyn SegmentDetector>,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            segment_detector,
        })
    }

    pub fn params(&self) -> &TableParams {
        &self.params
    }

    /// Reconstruct the table lines of `image`. The returned description has
    /// no elements.
    pub fn detect_structure(&self, image: &GrayImage) -> Result<TableDescription> {
        let raw = self.segment_detector.detect(image, None);
        let (description, _, _) = self.structure_from_raw(image, &raw)?;
        Ok(description)
    }

    /// Segment the non-line content of `image` into element rectangles,
    /// given the already reconstructed table lines.
    pub fn detect_elements(&self, image: &GrayImage, table_lines: &[Segment]) -> Result<Vec<Rect>> {
        let (elements, _) = self.elements_from_lines(image, table_lines);
        Ok(elements)
    }

    /// Composed entry point: lines, then elements.
    pub fn detect(&self, image: &GrayImage) -> Result<TableDescription> {
        Ok(self.process(image)?.description)
    }

    /// Composed entry point with per-stage statistics.
    pub fn process(&self, image: &GrayImage) -> Result<DetectionReport> {
        let start = Instant::now();
        let raw = self.segment_detector.detect(image, None);
        debug!("raw segment detection: {} segments", raw.len());

        let (mut description, horizontal, vertical) = self.structure_from_raw(image, &raw)?;
        let (elements, element_report) = self.elements_from_lines(image, &description.all_lines);
        description.elements = elements;

        Ok(DetectionReport {
            description,
            horizontal,
            vertical,
            elements: element_report,
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    fn structure_from_raw(
        &self,
        image: &GrayImage,
        raw: &[RawSegment],
    ) -> Result<(TableDescription, LineStageReport, LineStageReport)> {
        let (width, height) = image.dimensions();

        let h_start = Instant::now();
        let horizontal_lines = merge_segments(
            width,
            height,
            raw,
            LineOrientation::Horizontal,
            &self.params.structure.horizontal,
        )?;
        let horizontal = LineStageReport {
            raw_segments: raw.len(),
            lines: horizontal_lines.len(),
            elapsed_ms: h_start.elapsed().as_secs_f64() * 1000.0,
        };

        let v_start = Instant::now();
        let vertical_lines = merge_segments(
            width,
            height,
            raw,
            LineOrientation::Vertical,
            &self.params.structure.vertical,
        )?;
        let vertical = LineStageReport {
            raw_segments: raw.len(),
            lines: vertical_lines.len(),
            elapsed_ms: v_start.elapsed().as_secs_f64() * 1000.0,
        };

        if horizontal_lines.is_empty() {
            warn!("no horizontal table lines detected");
        }
        if vertical_lines.is_empty() {
            warn!("no vertical table lines detected");
        }

        Ok((
            TableDescription::from_lines(horizontal_lines, vertical_lines),
            horizontal,
            vertical,
        ))
    }

    fn elements_from_lines(
        &self,
        image: &GrayImage,
        table_lines: &[Segment],
    ) -> (Vec<Rect>, ElementStageReport) {
        let start = Instant::now();
        let (width, height) = image.dimensions();

        // binarize, then erase the known table lines so only content remains
        let mut binary = raster::binarize_otsu(image);
        raster::draw_segments(
            &mut binary,
            table_lines,
            raster::BACKGROUND,
            self.params.elements.erase_thickness,
        );

        // stamp contours thickly so fragments of one blob become connected
        let contours = raster::extract_contours(&binary);
        let mut blob_raster = raster::blank_like(image);
        raster::draw_contours(
            &mut blob_raster,
            &contours,
            raster::FOREGROUND,
            self.params.elements.contour_thickness,
        );

        let components = raster::label_components(&blob_raster);
        let elements = components.rectangles(width, height, 0, 0, 0, 0);
        if elements.is_empty() {
            warn!("no table elements detected");
        }

        let report = ElementStageReport {
            contours: contours.len(),
            elements: elements.len(),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        (elements, report)
    }
}
