mod fixtures;
#[allow(unused_imports)]
pub use fixtures::*;

// Re-export commonly used types from platescan for tests
#[allow(unused_imports)]
pub use platescan::{
    BatchError, BoundingBox, DetectorConfig, DisplayMode, FileOutcome, PlateContour, build_plate_pipeline,
    process_folder,
};
