pub mod batch;
pub mod config;
pub mod detection;
pub mod display;
pub mod error;
pub mod models;
pub mod pipeline;

pub use batch::{BatchSummary, FileOutcome, FileReport, process_folder};
pub use config::DetectorConfig;
pub use detection::{build_plate_pipeline, detect_plate};
pub use display::DisplayMode;
pub use error::{BatchError, OcrError};
pub use models::{BoundingBox, Contour, PlateContour, PlateReading};
pub use pipeline::{MetadataValue, Pipeline, PipelineData, PipelineStep};
