//! Folder-level driver: load, normalize, detect, read and report each image.

use image::{DynamicImage, ImageReader};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::TARGET_WIDTH;
use crate::detection::preprocessing::resize_to_width;
use crate::display::{DisplayMode, Viewer, annotate};
use crate::error::BatchError;
use crate::models::PlateReading;
use crate::pipeline::Pipeline;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// What happened to one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Plate(PlateReading),
    NoPlate,
    LoadFailed(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub filename: String,
    pub outcome: FileOutcome,
}

/// Per-file results of one run, in processing order
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn outcome(&self, filename: &str) -> Option<&FileOutcome> {
        self.reports
            .iter()
            .find(|r| r.filename == filename)
            .map(|r| &r.outcome)
    }

    pub fn plates(&self) -> impl Iterator<Item = &PlateReading> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Plate(reading) => Some(reading),
            _ => None,
        })
    }
}

/// png / jpg / jpeg, any case
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

fn load_image(path: &Path) -> anyhow::Result<DynamicImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img)
}

/// Run the plate pipeline on every image directly inside `folder`.
///
/// A missing folder is reported and returned as an error before anything else
/// happens. Every other failure only affects its own file.
pub fn process_folder(folder: &Path, pipeline: &Pipeline, display: &DisplayMode) -> Result<BatchSummary, BatchError> {
    if !folder.exists() {
        println!("Folder not found: {}", folder.display());
        return Err(BatchError::FolderNotFound(folder.to_path_buf()));
    }

    let entries = std::fs::read_dir(folder)?;
    let mut viewer = Viewer::open(display)?;
    let mut summary = BatchSummary::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || !is_image_file(&path) {
            debug!(path = %path.display(), "not an image, skipped");
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        let outcome = process_file(&path, &filename, pipeline, &mut viewer);
        summary.reports.push(FileReport { filename, outcome });
    }

    info!(files = summary.reports.len(), shown = viewer.presented(), "batch finished");
    Ok(summary)
}

fn process_file(path: &Path, filename: &str, pipeline: &Pipeline, viewer: &mut Viewer) -> FileOutcome {
    let image = match load_image(path) {
        Ok(image) => image,
        Err(e) => {
            println!("Cannot load image: {}", filename);
            debug!(error = %e, "decode failed");
            return FileOutcome::LoadFailed(e.to_string());
        }
    };

    let resized = resize_to_width(&image, TARGET_WIDTH);
    debug!(file = filename, width = resized.width(), height = resized.height(), "normalized");

    // keyed on the full name so car.png and car.jpg keep separate dumps
    let results = match pipeline.run_named(filename, resized.clone()) {
        Ok(results) => results,
        Err(e) => {
            println!("{}: Processing failed: {:#}", filename, e);
            return FileOutcome::Failed(format!("{:#}", e));
        }
    };

    let Some((bbox, item)) = results.iter().find_map(|item| item.bbox.map(|b| (b, item))) else {
        println!("{}: No plate detected.", filename);
        return FileOutcome::NoPlate;
    };

    let reading = PlateReading {
        filename: filename.to_string(),
        bbox,
        text: item.get_string("plate_text").unwrap_or_default().to_string(),
    };
    println!("{}: Detected Plate Text: {}", filename, reading.display_text());

    let annotated = annotate(&resized, &bbox);
    if let Err(e) = viewer.present(filename, &annotated) {
        warn!(error = %e, file = filename, "could not present result");
    }

    FileOutcome::Plate(reading)
}
