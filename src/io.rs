use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ConvertError;
use crate::types::{ClassIndex, OutputDirs};

/// Set up the `images/` and `labels/` directories under the dataset root.
///
/// Creation is idempotent; existing directories and their files are left in
/// place and individual files are overwritten as the run progresses.
pub fn setup_output_directories(output_dir: &Path) -> std::io::Result<OutputDirs> {
    let images_dir = output_dir.join("images");
    let labels_dir = output_dir.join("labels");
    fs::create_dir_all(&images_dir)?;
    fs::create_dir_all(&labels_dir)?;

    Ok(OutputDirs {
        images_dir,
        labels_dir,
    })
}

/// Re-encode and save a source image into the dataset.
///
/// JPEG targets are written at quality 95; the encoder does not subsample
/// chroma. Other formats are re-encoded by extension.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<(), ConvertError> {
    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));

    if is_jpeg {
        let mut writer = BufWriter::new(File::create(path)?);
        let encoder = JpegEncoder::new_with_quality(&mut writer, 95);
        image.write_with_encoder(encoder)?;
        writer.flush()?;
    } else {
        image.save(path)?;
    }
    Ok(())
}

/// Write one image's label file in a single operation.
///
/// The full content is built beforehand, so a file is never left half
/// written; an existing file is replaced (last write wins). An empty string
/// still produces the file — "no annotated instances" is distinct from a
/// missing label.
pub fn write_label_file(path: &Path, content: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content.as_bytes())?;
    writer.flush()
}

/// Create the dataset.yaml manifest for YOLO training.
pub fn create_dataset_yaml(output_dir: &Path, class_index: &ClassIndex) -> std::io::Result<()> {
    let dataset_yaml_path = output_dir.join("dataset.yaml");
    let mut dataset_yaml = BufWriter::new(File::create(&dataset_yaml_path)?);
    let absolute_path = fs::canonicalize(output_dir)?;

    let mut yaml_content = format!(
        "path: {}\ntrain: images/train\nval: images/val\ntest:\n",
        absolute_path.to_string_lossy()
    );
    yaml_content.push_str(&format!("\nnc: {}\nnames:\n", class_index.len()));
    for (id, name) in class_index.names().iter().enumerate() {
        yaml_content.push_str(&format!("    {id}: {name}\n"));
    }

    dataset_yaml.write_all(yaml_content.as_bytes())
}
