//! Parameter types configuring the detection stages.
//!
//! Defaults mirror the tuning used on scanned logbook pages at roughly
//! 2500x3500 px: permissive raw-segment pruning, generous extension lengths
//! so fragmented rulings still coalesce, and erase/stamp thicknesses thick
//! enough to swallow line-detection imprecision without eating content.

use crate::error::{DetectError, Result};
use crate::lsd::LsdOptions;
use crate::merge::LineMergeOptions;
use serde::{Deserialize, Serialize};

/// Thresholds for the two line-merging passes. Each orientation carries an
/// independent set.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StructureParams {
    pub horizontal: LineMergeOptions,
    pub vertical: LineMergeOptions,
}

impl Default for StructureParams {
    fn default() -> Self {
        Self {
            horizontal: LineMergeOptions {
                min_segment_length: Some(50.0),
                max_off_axis: Some(0.1),
                extension_px: 150,
                min_span_px: 750,
                stroke_thickness: 5,
            },
            vertical: LineMergeOptions {
                min_segment_length: Some(50.0),
                max_off_axis: Some(0.1),
                extension_px: 300,
                min_span_px: 1500,
                stroke_thickness: 5,
            },
        }
    }
}

impl StructureParams {
    pub fn validate(&self) -> Result<()> {
        self.horizontal.validate()?;
        self.vertical.validate()
    }
}

/// Thresholds for the element-blob pass.
///
/// `erase_thickness` must be generous enough to fully remove imprecisely
/// fitted table lines from the binarized page, yet not so thick that real
/// content around the rulings disappears. It is a tuned constant, not
/// derivable from image properties.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ElementParams {
    /// Stroke used to paint table lines in the background color.
    pub erase_thickness: i32,
    /// Stroke used to stamp contours so fragments of one semantic blob
    /// (word, drawing, stain) merge into a single component.
    pub contour_thickness: i32,
}

impl Default for ElementParams {
    fn default() -> Self {
        Self {
            erase_thickness: 20,
            contour_thickness: 20,
        }
    }
}

impl ElementParams {
    pub fn validate(&self) -> Result<()> {
        if self.erase_thickness < 1 {
            return Err(DetectError::config("erase_thickness must be at least 1"));
        }
        if self.contour_thickness < 1 {
            return Err(DetectError::config("contour_thickness must be at least 1"));
        }
        Ok(())
    }
}

/// Detector-wide parameters.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct TableParams {
    pub structure: StructureParams,
    pub elements: ElementParams,
    /// Options for the built-in raw segment extractor. Ignored when an
    /// external [`crate::lsd::SegmentDetector`] is plugged in.
    pub lsd: LsdOptions,
}

impl TableParams {
    pub fn validate(&self) -> Result<()> {
        self.structure.validate()?;
        self.elements.validate()
    }
}
