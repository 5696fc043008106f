use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

// One line of a Labelbox NDJSON export: a single data row (image) together
// with the annotations made on it in each project.
#[derive(Debug, Deserialize, Clone)]
pub struct ExportRecord {
    pub data_row: DataRow,
    pub media_attributes: MediaAttributes,
    // BTreeMap rather than HashMap so iteration order is stable across runs
    // when no project filter is given.
    #[serde(default)]
    pub projects: BTreeMap<String, Project>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataRow {
    /// Image source locator: local path or HTTP URL.
    pub row_data: String,
    /// External image identifier, used as the output file name.
    pub external_id: String,
}

// Declared media resolution. Masks are resized to this before tracing.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct MediaAttributes {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Project {
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Label {
    pub annotations: Annotations,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Annotations {
    #[serde(default)]
    pub objects: Vec<AnnotationObject>,
}

// One annotated instance: a class name plus either inline bounding-box
// geometry or a mask locator, depending on how the project was labeled.
#[derive(Debug, Deserialize, Clone)]
pub struct AnnotationObject {
    pub name: String,
    pub bounding_box: Option<BoundingBox>,
    pub mask: Option<MaskRef>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub width: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MaskRef {
    /// Fetched with a bearer-token `Authorization` header.
    pub url: String,
}

impl ExportRecord {
    /// Annotation objects of this record, in source order.
    ///
    /// With `project_id` set, only that project's labels are considered; an
    /// id absent from the record yields no objects.
    pub fn objects(&self, project_id: Option<&str>) -> Vec<&AnnotationObject> {
        self.projects
            .iter()
            .filter(|(id, _)| project_id.map_or(true, |want| want == id.as_str()))
            .flat_map(|(_, project)| project.labels.iter())
            .flat_map(|label| label.annotations.objects.iter())
            .collect()
    }
}

/// One converted instance: a class id and its normalized polygon,
/// `(u, v)` pairs in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub class_id: usize,
    pub points: Vec<(f64, f64)>,
}

/// Mapping from annotation class name to output class id.
///
/// Either supplied up front from an ordered label list (the segmentation
/// path, immutable for the run) or built incrementally in first-encounter
/// order (the bounding-box path). Always an explicit value passed into the
/// conversion, never shared global state.
#[derive(Debug, Default, Clone)]
pub struct ClassIndex {
    ids: HashMap<String, usize>,
    names: Vec<String>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an ordered name list; ids follow list order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::new();
        for name in names {
            index.get_or_insert(&name.into());
        }
        index
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Resolve `name`, assigning the next id on first encounter.
    pub fn get_or_insert(&mut self, name: &str) -> usize {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = self.names.len();
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    /// Class names in id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// Paths to the output directories for converted images and labels.
pub struct OutputDirs {
    pub images_dir: std::path::PathBuf,
    pub labels_dir: std::path::PathBuf,
}

/// What happened to a single annotation object during conversion.
///
/// Replaces silent catch-and-continue: every skip carries its reason so
/// per-image reports stay inspectable.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectOutcome {
    /// The object produced this many segments (one per disjoint region).
    Converted { segments: usize },
    /// Class name absent from the class index; intentionally excluded.
    SkippedUnknownClass,
    /// The object carries neither usable mask nor bounding-box geometry.
    SkippedNoGeometry,
    /// The mask could not be fetched.
    FetchFailed(String),
    /// The mask bytes could not be decoded.
    DecodeFailed(String),
    /// All contours fell below the area threshold or simplified away.
    Empty,
}

// Struct to hold processing statistics for the whole run
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub images_processed: usize,
    pub images_skipped: usize,
    pub segments_written: usize,
    pub objects_converted: usize,
    pub objects_skipped_unknown: usize,
    pub objects_skipped_no_geometry: usize,
    pub objects_failed: usize,
    pub objects_empty: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&mut self, outcome: &ObjectOutcome) {
        match outcome {
            ObjectOutcome::Converted { segments } => {
                self.objects_converted += 1;
                self.segments_written += segments;
            }
            ObjectOutcome::SkippedUnknownClass => self.objects_skipped_unknown += 1,
            ObjectOutcome::SkippedNoGeometry => self.objects_skipped_no_geometry += 1,
            ObjectOutcome::FetchFailed(_) | ObjectOutcome::DecodeFailed(_) => {
                self.objects_failed += 1;
            }
            ObjectOutcome::Empty => self.objects_empty += 1,
        }
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Images processed: {}", self.images_processed);
        log::info!("Images skipped: {}", self.images_skipped);
        log::info!("Instances written: {}", self.segments_written);
        log::info!("Objects converted: {}", self.objects_converted);
        log::info!(
            "Objects skipped (unrecognized class): {}",
            self.objects_skipped_unknown
        );
        log::info!(
            "Objects skipped (no geometry): {}",
            self.objects_skipped_no_geometry
        );
        log::info!("Objects with empty masks: {}", self.objects_empty);

        if self.objects_failed > 0 {
            log::warn!("Objects failed (fetch or decode): {}", self.objects_failed);
        }
    }
}
