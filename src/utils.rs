use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Output file name for a saved image, derived from the external id.
pub fn image_file_name(external_id: &str) -> String {
    let name = Path::new(external_id)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| external_id.to_string());
    sanitize_filename::sanitize(name)
}

/// Output label file name for an external id: the sanitized stem with `.txt`.
pub fn label_file_name(external_id: &str) -> String {
    let stem = Path::new(external_id)
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| external_id.to_string());
    format!("{}.txt", sanitize_filename::sanitize(stem))
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = format!(
        "{{spinner:.green}} [{label}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})"
    );
    let style = ProgressStyle::with_template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_name_replaces_extension() {
        assert_eq!(label_file_name("frame_001.png"), "frame_001.txt");
        assert_eq!(label_file_name("frame_001"), "frame_001.txt");
    }

    #[test]
    fn image_name_strips_directories() {
        assert_eq!(image_file_name("session/frame_001.png"), "frame_001.png");
    }
}
