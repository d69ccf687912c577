//! Per-stage reports returned by the composed pipeline entry point.
//!
//! Counts and wall-clock timings only; rendering diagnostic overlays is a
//! caller concern.

use crate::types::TableDescription;
use serde::Serialize;

/// Outcome of one line-merging pass.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct LineStageReport {
    /// Raw segments fed into the pass (before pruning).
    pub raw_segments: usize,
    /// Table lines emitted.
    pub lines: usize,
    pub elapsed_ms: f64,
}

/// Outcome of the element-blob pass.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ElementStageReport {
    /// Contours extracted from the line-erased binary page.
    pub contours: usize,
    /// Element rectangles emitted.
    pub elements: usize,
    pub elapsed_ms: f64,
}

/// Full result of processing one page: the table description plus stage
/// statistics.
#[derive(Clone, Debug, Serialize)]
pub struct DetectionReport {
    pub description: TableDescription,
    pub horizontal: LineStageReport,
    pub vertical: LineStageReport,
    pub elements: ElementStageReport,
    /// End-to-end wall-clock time, including raw segment detection.
    pub latency_ms: f64,
}
