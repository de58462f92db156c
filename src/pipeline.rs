use anyhow::Result;
use image::DynamicImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::error::BatchError;
use crate::models::BoundingBox;

/// Data that flows through the pipeline
/// Each PipelineData is one image (or a region of it) with associated metadata
#[derive(Clone)]
pub struct PipelineData {
    /// The image data (color, grayscale or binary depending on the step)
    pub image: DynamicImage,

    /// The full-frame image the pipeline started from
    pub original: Arc<DynamicImage>,

    /// Region of the original this item covers (None means full image)
    pub bbox: Option<BoundingBox>,

    /// Properties recorded by earlier steps (e.g. "aspect_ratio", "plate_text")
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Float(f64),
    String(String),
    Int(i64),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            bbox: None,
            metadata: HashMap::new(),
        }
    }

    /// Create PipelineData for a region of an image
    pub fn from_region(image: DynamicImage, original: Arc<DynamicImage>, bbox: BoundingBox) -> Self {
        Self {
            image,
            original,
            bbox: Some(bbox),
            metadata: HashMap::new(),
        }
    }

    /// Same region and metadata, different pixels
    pub fn with_image(&self, image: DynamicImage) -> Self {
        Self {
            image,
            original: self.original.clone(),
            bbox: self.bbox,
            metadata: self.metadata.clone(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
struct DebugConfig {
    /// Root directory for debug outputs
    output_dir: PathBuf,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data.
    /// Steps can filter (many → fewer, including none) or transform (many → many).
    fn process(&self, data: Vec<PipelineData>) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in logs and debug folder names)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    debug: Option<DebugConfig>,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, BatchError> {
        if output_dir.exists() {
            let mut entries = std::fs::read_dir(&output_dir)?;
            if entries.next().is_some() {
                return Err(BatchError::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run the pipeline sequentially on an input image
    pub fn run(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.run_named("image", input)
    }

    /// Run the pipeline, keeping debug outputs under a subfolder called `name`
    pub fn run_named(&self, name: &str, input: DynamicImage) -> Result<Vec<PipelineData>> {
        let debug_dir = self.debug.as_ref().map(|d| d.output_dir.join(name));

        if let Some(dir) = &debug_dir {
            let input_dir = dir.join("00_input");
            std::fs::create_dir_all(&input_dir)?;
            input
                .save(input_dir.join("01.png"))
                .map_err(|e| anyhow::anyhow!("Failed to save debug input: {}", e))?;
        }

        // Start with a single PipelineData containing the full image
        let mut data = vec![PipelineData::from_image(input)];

        for (step_idx, step) in self.steps.iter().enumerate() {
            let step_name = step.name();
            debug!(step = step_name, items = data.len(), "running step");

            data = step.process(data)?;

            if let Some(dir) = &debug_dir {
                save_step_outputs(dir, step_idx, step_name, &data)?;
            }
        }

        Ok(data)
    }
}

fn save_step_outputs(dir: &Path, step_idx: usize, step_name: &str, data: &[PipelineData]) -> Result<()> {
    let step_dir_name = format!("{:02}_{}", step_idx + 1, step_name.to_lowercase().replace(' ', "_"));
    let step_dir = dir.join(&step_dir_name);
    std::fs::create_dir_all(&step_dir)?;

    for (idx, item) in data.iter().enumerate() {
        let output_path = step_dir.join(format!("{:02}.png", idx + 1));
        item.image
            .save(&output_path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
    }

    debug!(count = data.len(), dir = %step_dir_name, "saved debug images");
    Ok(())
}
