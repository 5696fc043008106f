use image::GenericImageView;
use log::{error, info, warn};
use reqwest::blocking::Client;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::{Args, Format};
use crate::conversion::{collect_segments, convert_bbox_objects, format_segments};
use crate::error::ConvertError;
use crate::fetch::{fetch_image_bytes, MaskSource};
use crate::io::{create_dataset_yaml, save_image, write_label_file};
use crate::types::{ClassIndex, ExportRecord, ObjectOutcome, OutputDirs, ProcessingStats};
use crate::utils::{create_progress_bar, image_file_name, label_file_name};

/// Read and parse an NDJSON annotation export.
///
/// Any read or parse failure is fatal; callers invoke this before creating
/// output directories so a corrupt export produces no partial output.
pub fn read_export(path: &Path) -> Result<Vec<ExportRecord>, ConvertError> {
    let content = fs::read_to_string(path).map_err(|source| ConvertError::ExportRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| ConvertError::Json {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Drive one sequential pass over the export: for each record, fetch and
/// re-encode the source image, convert its annotation objects, and write the
/// label file. Per-record failures are logged and skipped; the run completes
/// with partial output and a printed summary.
pub fn process_export(
    records: &[ExportRecord],
    args: &Args,
    output_dir: &Path,
    dirs: &OutputDirs,
    mask_source: &dyn MaskSource,
) -> Result<ProcessingStats, ConvertError> {
    let mut class_index = ClassIndex::from_names(args.label_list.iter().cloned());
    let strict = !class_index.is_empty();

    if args.output_format == Format::Polygon {
        if class_index.is_empty() {
            return Err(ConvertError::Config(
                "the polygon format requires an ordered label list".to_string(),
            ));
        }
        // A uniformly zero-sized export is corrupt, not merely sparse.
        let all_invalid = !records.is_empty()
            && records
                .iter()
                .all(|r| r.media_attributes.width == 0 || r.media_attributes.height == 0);
        if all_invalid {
            return Err(ConvertError::Config(
                "every record declares a zero media dimension; export looks corrupt".to_string(),
            ));
        }
    }

    let client = Client::new();
    let mut stats = ProcessingStats::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    let pb = create_progress_bar(records.len() as u64, "Convert");
    for record in records {
        let external_id = record.data_row.external_id.as_str();
        if !seen_ids.insert(external_id) {
            warn!("Duplicate external_id {external_id}; overwriting previous output");
        }

        match process_record(record, args, dirs, &mut class_index, strict, &client, mask_source, &mut stats) {
            Ok(()) => stats.images_processed += 1,
            Err(e) => {
                error!("Skipping {external_id}: {e}");
                stats.images_skipped += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Conversion complete");

    if args.output_format == Format::Bbox {
        info!("Creating dataset.yaml file...");
        create_dataset_yaml(output_dir, &class_index)?;
    }

    stats.print_summary();
    Ok(stats)
}

/// Convert a single export record: save its image and write its label file.
fn process_record(
    record: &ExportRecord,
    args: &Args,
    dirs: &OutputDirs,
    class_index: &mut ClassIndex,
    strict: bool,
    client: &Client,
    mask_source: &dyn MaskSource,
    stats: &mut ProcessingStats,
) -> Result<(), ConvertError> {
    let data_row = &record.data_row;

    let image_bytes = fetch_image_bytes(client, &data_row.row_data)?;
    let image = image::load_from_memory(&image_bytes)?;
    let image_path = dirs.images_dir.join(image_file_name(&data_row.external_id));
    save_image(&image, &image_path)?;

    let label_path = dirs.labels_dir.join(label_file_name(&data_row.external_id));
    let objects = record.objects(args.project_id.as_deref());

    let rows = match args.output_format {
        Format::Polygon => {
            let media = record.media_attributes;
            if media.width == 0 || media.height == 0 {
                return Err(ConvertError::Config(format!(
                    "record declares {}x{} media",
                    media.width, media.height
                )));
            }

            let (segments, outcomes) = collect_segments(
                &objects,
                class_index,
                mask_source,
                media.width,
                media.height,
                args,
            )?;
            tally_outcomes(&outcomes, &data_row.external_id, stats);

            let rows = format_segments(&segments)?;
            info!(
                "Wrote {} with {} instance(s)",
                label_path.display(),
                segments.len()
            );
            rows
        }
        Format::Bbox => {
            // The bounding-box path normalizes against the decoded image,
            // not the declared media resolution.
            let (image_width, image_height) = image.dimensions();
            let (rows, outcomes) =
                convert_bbox_objects(&objects, class_index, strict, image_width, image_height)?;
            tally_outcomes(&outcomes, &data_row.external_id, stats);

            info!(
                "Wrote {} with {} instance(s)",
                label_path.display(),
                rows.lines().count()
            );
            rows
        }
    };

    write_label_file(&label_path, &rows)?;
    Ok(())
}

fn tally_outcomes(outcomes: &[ObjectOutcome], external_id: &str, stats: &mut ProcessingStats) {
    for outcome in outcomes {
        match outcome {
            ObjectOutcome::FetchFailed(reason) => {
                warn!("Could not fetch mask for an object in {external_id}: {reason}");
            }
            ObjectOutcome::DecodeFailed(reason) => {
                warn!("Could not decode mask for an object in {external_id}: {reason}");
            }
            _ => {}
        }
        stats.record_outcome(outcome);
    }
}
