use clap::{Parser, ValueEnum};
use std::str::FromStr;

/// Command-line arguments parser for converting Labelbox exports to YOLO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Path to the Labelbox NDJSON export file
    #[arg(short = 'e', long = "export")]
    pub export: String,

    /// Output dataset directory (defaults to the export file stem)
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: Option<String>,

    /// Output format for YOLO labels: 'polygon' or 'bbox'
    #[arg(
        long = "output_format",
        visible_alias = "format",
        value_enum,
        default_value = "polygon"
    )]
    pub output_format: Format,

    /// Restrict conversion to one Labelbox project id
    #[arg(long = "project_id")]
    pub project_id: Option<String>,

    /// Authorization header value for mask downloads (include the "Bearer " prefix)
    #[arg(long = "api_key")]
    pub api_key: Option<String>,

    /// Minimum contour area in px^2; smaller regions are treated as noise
    #[arg(long = "min_area", default_value_t = 10.0)]
    pub min_area: f64,

    /// Polygon simplification tolerance as a fraction of contour perimeter
    #[arg(long = "epsilon", default_value_t = 0.002, value_parser = validate_epsilon)]
    pub epsilon: f64,

    /// Ordered list of class names; required for the polygon format
    #[arg(use_value_delimiter = true)]
    pub label_list: Vec<String>,
}

// Enumeration for the YOLO output format
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Format {
    Polygon,
    Bbox,
}

// Validate that the tolerance fraction is between 0.0 and 1.0
fn validate_epsilon(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if (0.0..=1.0).contains(&val) => Ok(val),
        _ => Err("EPSILON must be between 0.0 and 1.0".to_string()),
    }
}
