//! Labelbox to YOLO format converter
//!
//! This library converts Labelbox NDJSON annotation exports to YOLO format
//! for object detection and segmentation training. The segmentation path
//! turns per-instance raster masks into simplified, normalized polygons; the
//! bounding-box path converts inline box geometry.

pub mod config;
pub mod contour;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod io;
pub mod mask;
pub mod simplify;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, Format};
pub use dataset::{process_export, read_export};
pub use error::ConvertError;
pub use fetch::{fetch_image_bytes, HttpMaskSource, MaskSource};
pub use io::setup_output_directories;
pub use types::{ClassIndex, ExportRecord, ObjectOutcome, OutputDirs, ProcessingStats, Segment};
