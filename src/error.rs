use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a whole batch run
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Debug directory is not empty: {}", .0.display())]
    DebugDirNotEmpty(PathBuf),

    #[error("Display unavailable: {0}")]
    Display(String),

    #[error("Failed to save annotated image {}: {source}", path.display())]
    SaveAnnotated {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while setting up or running the OCR engine
#[derive(Error, Debug)]
pub enum OcrError {
    #[error(
        "OCR models not found. Download them with ocrs-cli or pass --models-dir\n\
         Expected locations:\n  - {}\n  - {}",
        detection.display(),
        recognition.display()
    )]
    ModelsNotFound {
        detection: PathBuf,
        recognition: PathBuf,
    },

    #[error("Failed to load OCR model {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("OCR engine error: {0}")]
    Engine(String),
}
