#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod io;
pub mod types;

// Lower-level building blocks, public for tools and external detectors.
pub mod geometry;
pub mod lsd;
pub mod merge;
pub mod raster;

// --- High-level re-exports -------------------------------------------------

pub use crate::detector::{ElementParams, StructureParams, TableDetector, TableParams};
pub use crate::diagnostics::DetectionReport;
pub use crate::error::{DetectError, Result};
pub use crate::grid::{assign_cells, CellIndex, CellMap, GridCoordinates};
pub use crate::types::{LineOrientation, Point, Rect, Segment, TableDescription};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use table_detector::prelude::*;
///
/// # fn main() -> table_detector::Result<()> {
/// let page = image::GrayImage::new(640, 480);
/// let detector = TableDetector::new(TableParams::default())?;
/// let report = detector.process(&page)?;
/// let cells = CellMap::from_description(&report.description);
/// println!(
///     "lines={} elements={} cells={} latency_ms={:.3}",
///     report.description.all_lines.len(),
///     report.description.elements.len(),
///     cells.len(),
///     report.latency_ms
/// );
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::detector::{TableDetector, TableParams};
    pub use crate::grid::{CellIndex, CellMap, GridCoordinates};
    pub use crate::lsd::{GradientSegmentDetector, SegmentDetector};
    pub use crate::types::{LineOrientation, Point, Rect, Segment, TableDescription};
}
