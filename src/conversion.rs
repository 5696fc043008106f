use crate::config::Args;
use crate::contour::extract_contours;
use crate::error::ConvertError;
use crate::fetch::MaskSource;
use crate::mask::decode_mask;
use crate::simplify::simplify_closed;
use crate::types::{AnnotationObject, ClassIndex, ObjectOutcome, Segment};

/// Map pixel coordinates into the unit square, clamped to `[0, 1]`.
///
/// A 1:1, order-preserving transform; out-of-range pixels are clamped, never
/// dropped. Fails before any division when a declared dimension is zero.
pub fn normalize_polygon(
    points: &[(f64, f64)],
    width: u32,
    height: u32,
) -> Result<Vec<(f64, f64)>, ConvertError> {
    if width == 0 || height == 0 {
        return Err(ConvertError::Config(format!(
            "cannot normalize coordinates against a {width}x{height} image"
        )));
    }
    let (w, h) = (f64::from(width), f64::from(height));
    Ok(points
        .iter()
        .map(|&(x, y)| ((x / w).clamp(0.0, 1.0), (y / h).clamp(0.0, 1.0)))
        .collect())
}

/// Run the mask pipeline over one image's annotation objects and collect its
/// ordered segment list.
///
/// Objects whose class name is absent from the index are skipped silently —
/// unrecognized classes are excluded from training data by design. A single
/// object may contribute several segments when its mask holds disjoint
/// regions; all share the object's class id. Segments are emitted in source
/// object order, then contour-trace order within an object. Per-object
/// failures become typed outcomes rather than aborting the image.
pub fn collect_segments(
    objects: &[&AnnotationObject],
    class_index: &ClassIndex,
    mask_source: &dyn MaskSource,
    width: u32,
    height: u32,
    args: &Args,
) -> Result<(Vec<Segment>, Vec<ObjectOutcome>), ConvertError> {
    let mut segments = Vec::new();
    let mut outcomes = Vec::with_capacity(objects.len());

    for object in objects {
        let Some(class_id) = class_index.get(&object.name) else {
            outcomes.push(ObjectOutcome::SkippedUnknownClass);
            continue;
        };
        let Some(mask_ref) = &object.mask else {
            outcomes.push(ObjectOutcome::SkippedNoGeometry);
            continue;
        };

        let bytes = match mask_source.fetch(&mask_ref.url) {
            Ok(bytes) => bytes,
            Err(e) => {
                outcomes.push(ObjectOutcome::FetchFailed(e.to_string()));
                continue;
            }
        };
        let mask = match decode_mask(&bytes, width, height) {
            Ok(mask) => mask,
            Err(e) => {
                outcomes.push(ObjectOutcome::DecodeFailed(e.to_string()));
                continue;
            }
        };

        let mut produced = 0;
        for contour in extract_contours(&mask, args.min_area) {
            let reduced = simplify_closed(&contour, args.epsilon);
            if reduced.len() < 3 {
                // Cannot represent a closed shape; contributes nothing.
                continue;
            }
            let points = normalize_polygon(&reduced, width, height)?;
            segments.push(Segment { class_id, points });
            produced += 1;
        }

        outcomes.push(if produced > 0 {
            ObjectOutcome::Converted { segments: produced }
        } else {
            ObjectOutcome::Empty
        });
    }

    Ok((segments, outcomes))
}

/// Serialize an image's segments into label-file rows: `class_id` followed by
/// the flattened `(u, v)` pairs at fixed 6-decimal precision.
///
/// Upstream filtering guarantees at least 3 points per segment; a violation
/// here is a bug, not bad input, and is rejected rather than silently
/// emitting a malformed row.
pub fn format_segments(segments: &[Segment]) -> Result<String, ConvertError> {
    let mut rows = String::with_capacity(segments.len() * 64);

    for segment in segments {
        if segment.points.len() < 3 {
            return Err(ConvertError::MalformedSegment {
                points: segment.points.len(),
            });
        }
        rows.push_str(&format!("{}", segment.class_id));
        for &(u, v) in &segment.points {
            rows.push_str(&format!(" {u:.6} {v:.6}"));
        }
        rows.push('\n');
    }

    Ok(rows)
}

/// Convert one image's inline bounding boxes into center-normalized rows.
///
/// With an empty label list the class index grows incrementally in
/// first-encounter order; otherwise unknown names are skipped like the
/// polygon path. Normalizes against the decoded image dimensions.
pub fn convert_bbox_objects(
    objects: &[&AnnotationObject],
    class_index: &mut ClassIndex,
    strict: bool,
    width: u32,
    height: u32,
) -> Result<(String, Vec<ObjectOutcome>), ConvertError> {
    if width == 0 || height == 0 {
        return Err(ConvertError::Config(format!(
            "cannot normalize coordinates against a {width}x{height} image"
        )));
    }
    let (w, h) = (f64::from(width), f64::from(height));
    let mut rows = String::with_capacity(objects.len() * 48);
    let mut outcomes = Vec::with_capacity(objects.len());

    for object in objects {
        let Some(bbox) = object.bounding_box else {
            outcomes.push(ObjectOutcome::SkippedNoGeometry);
            continue;
        };
        let class_id = if strict {
            match class_index.get(&object.name) {
                Some(id) => id,
                None => {
                    outcomes.push(ObjectOutcome::SkippedUnknownClass);
                    continue;
                }
            }
        } else {
            class_index.get_or_insert(&object.name)
        };

        let x_center = (bbox.left + bbox.width / 2.0) / w;
        let y_center = (bbox.top + bbox.height / 2.0) / h;
        let box_width = bbox.width / w;
        let box_height = bbox.height / h;
        rows.push_str(&format!(
            "{class_id} {x_center:.6} {y_center:.6} {box_width:.6} {box_height:.6}\n"
        ));
        outcomes.push(ObjectOutcome::Converted { segments: 1 });
    }

    Ok((rows, outcomes))
}
