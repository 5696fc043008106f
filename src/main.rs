use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use labelbox2yolo::{
    process_export, read_export, setup_output_directories, Args, Format, HttpMaskSource,
};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let export_path = PathBuf::from(&args.export);
    if !export_path.exists() {
        error!("The specified export file does not exist: {}", args.export);
        return;
    }
    if args.output_format == Format::Polygon {
        if args.label_list.is_empty() {
            error!("The polygon format requires an ordered label list");
            return;
        }
        if args.api_key.is_none() {
            error!("The polygon format requires --api_key for mask downloads");
            return;
        }
    }

    info!("Reading annotation export...");
    let records = match read_export(&export_path) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to read export: {e}");
            return;
        }
    };
    info!("Read {} record(s).", records.len());

    let output_dir = args
        .output_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            export_path
                .file_stem()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("dataset"))
        });

    let client = reqwest::blocking::Client::new();
    let mask_source = HttpMaskSource::new(client, args.api_key.clone().unwrap_or_default());

    match setup_output_directories(&output_dir) {
        Ok(output_dirs) => {
            if let Err(e) = process_export(&records, &args, &output_dir, &output_dirs, &mask_source)
            {
                error!("Failed to process export: {e}");
            }
        }
        Err(e) => error!("Failed to set up output directories: {e}"),
    }
}
