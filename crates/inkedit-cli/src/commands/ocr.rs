//! Ocr command - extract text regions from an image.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use indicatif::ProgressBar;

use inkedit_core::{regions_from_tokens, OcrEngine, RegionIdGen};

use super::{load_config, print_regions};

/// Arguments for the ocr command.
#[derive(Args)]
pub struct OcrArgs {
    /// Input image file
    #[arg(required = true)]
    input: PathBuf,

    /// Minimum token confidence (0-100) to report a region
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Language code passed to the OCR engine
    #[arg(long)]
    lang: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: super::inspect::OutputFormat,
}

pub fn run(args: OcrArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(lang) = args.lang {
        config.ocr.language = lang;
    }
    let threshold = args
        .min_confidence
        .unwrap_or(config.ocr.confidence_threshold);

    let image = image::open(&args.input)?;

    // The OCR call blocks for its whole duration; at least show a pulse.
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("running OCR...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let engine = OcrEngine::new(config.ocr.clone());
    let tokens = engine.recognize(&image);
    spinner.finish_and_clear();
    let tokens = tokens?;

    let mut ids = RegionIdGen::new();
    let regions = regions_from_tokens(&tokens, threshold, &mut ids);

    match args.format {
        super::inspect::OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&regions)?)
        }
        super::inspect::OutputFormat::Text => print_regions(&regions),
    }
    Ok(())
}
