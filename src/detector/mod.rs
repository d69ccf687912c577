//! Table detector orchestrating the line and element pipelines.
//!
//! Overview
//! - Runs a raw line-segment detector over the page (the built-in gradient
//!   extractor by default, or any [`crate::lsd::SegmentDetector`]).
//! - Merges the raw segments into horizontal and vertical table lines with
//!   independent threshold sets per orientation.
//! - Binarizes the page, erases the reconstructed lines and segments the
//!   remaining content into element rectangles via thick contour stamping
//!   and component labeling.
//!
//! Lines are strictly built before elements: the element pass needs the
//! final table lines so it can mask them out.
//!
//! Modules
//! - [`params`] holds the parameter types and their validation.
//! - `pipeline` holds the [`TableDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::{ElementParams, StructureParams, TableParams};
pub use pipeline::TableDetector;
