use std::path::PathBuf;

/// Errors produced while converting a Labelbox export to YOLO format.
///
/// Per-object and per-image variants (`Decode`, `Fetch`) are recovered
/// locally: the offending unit of work is skipped with a diagnostic and the
/// run continues. `Json` and `ExportRead` on the export file itself are
/// fatal. `MalformedSegment` signals an upstream invariant violation rather
/// than bad input.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Mask or image bytes could not be decoded.
    #[error("failed to decode image data: {0}")]
    Decode(#[from] image::ImageError),

    /// A blocking HTTP fetch of an image or mask failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Invalid configuration or export metadata (zero dimension, missing
    /// label list, unresolved project id).
    #[error("{0}")]
    Config(String),

    /// A segment reached the label writer with fewer than 3 points.
    /// Upstream filtering should make this impossible.
    #[error("segment has {points} point(s), polygon rows require at least 3")]
    MalformedSegment { points: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The export file itself could not be parsed. Always fatal.
    #[error("malformed export record on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The export file could not be read. Always fatal.
    #[error("failed to read export file {}: {source}", path.display())]
    ExportRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
