use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

use platescan::detection::ocr::{OcrsRecognizer, default_models_dir};
use platescan::{DetectorConfig, DisplayMode, build_plate_pipeline, process_folder};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DisplayArg {
    Window,
    Save,
    Off,
}

#[derive(Parser)]
#[command(name = "platescan")]
#[command(about = "Find license plates in a folder of photos and read their text")]
struct Cli {
    /// Folder of images (defaults to `data` next to the executable)
    #[arg(value_name = "FOLDER")]
    folder: Option<PathBuf>,

    /// How to present detected plates
    #[arg(long, value_enum)]
    display: Option<DisplayArg>,

    /// Where `--display save` writes annotated images
    #[arg(long, value_name = "DIR")]
    annotated_dir: Option<PathBuf>,

    /// Directory holding text-detection.rten and text-recognition.rten
    #[arg(long, value_name = "DIR")]
    models_dir: Option<PathBuf>,

    /// Save every pipeline step's images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Directory containing the running executable
fn install_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Executable has no parent directory: {}", exe.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let base_dir = install_dir()?;
    let folder = args.folder.unwrap_or_else(|| base_dir.join("data"));

    let display = match args.display {
        None => DisplayMode::platform_default(),
        Some(DisplayArg::Window) => DisplayMode::Window,
        Some(DisplayArg::Off) => DisplayMode::Off,
        Some(DisplayArg::Save) => {
            DisplayMode::SaveTo(args.annotated_dir.unwrap_or_else(|| base_dir.join("annotated")))
        }
    };

    let models_dir = args
        .models_dir
        .or_else(default_models_dir)
        .ok_or_else(|| anyhow::anyhow!("Cannot locate OCR models; pass --models-dir"))?;

    let config = DetectorConfig::default();
    let recognizer = Arc::new(OcrsRecognizer::new(models_dir, &config.ocr));
    let mut pipeline = build_plate_pipeline(&config, recognizer);

    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    println!("Looking for images in: {}", folder.display());
    let summary = process_folder(&folder, &pipeline, &display)?;

    if args.verbose {
        println!(
            "\nProcessed {} image(s), {} plate(s) found",
            summary.reports.len(),
            summary.plates().count()
        );
    }

    Ok(())
}
