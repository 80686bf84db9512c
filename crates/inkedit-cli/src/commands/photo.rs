//! Photo-edit command - replace a text region in a photo.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use console::style;
use image::DynamicImage;
use indicatif::ProgressBar;

use inkedit_core::{
    regions_from_tokens, EditOutcome, FontResolution, FontSpec, OcrEngine, PhotoEditor,
    RegionIdGen,
};

use super::{load_config, parse_hex_color, parse_point};

/// Arguments for the photo-edit command.
#[derive(Args)]
pub struct PhotoEditArgs {
    /// Input image file
    #[arg(required = true)]
    input: PathBuf,

    /// Click point as X,Y in image pixels
    #[arg(long)]
    at: String,

    /// Replacement text
    #[arg(long)]
    text: String,

    /// Font family (default: the selected region's family)
    #[arg(long)]
    font: Option<String>,

    /// Font size in pixels (default: the selected region's estimate)
    #[arg(long)]
    size: Option<f32>,

    /// Text color as RRGGBB
    #[arg(long, default_value = "000000")]
    color: String,

    /// Output image file
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(args: PhotoEditArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let point = parse_point(&args.at)?;
    let color = parse_hex_color(&args.color)?;

    let mut editor = PhotoEditor::load(&args.input, &config.photo)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("running OCR...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let engine = OcrEngine::new(config.ocr.clone());
    let tokens = engine.recognize(&DynamicImage::ImageRgba8(editor.image().clone()));
    spinner.finish_and_clear();
    let tokens = tokens?;

    let mut ids = RegionIdGen::new();
    let regions = regions_from_tokens(&tokens, config.ocr.confidence_threshold, &mut ids);
    println!(
        "{} {} text region(s)",
        style("found").green(),
        regions.len()
    );
    editor.set_regions(regions);

    let Some(region) = editor.select_at(point) else {
        anyhow::bail!(
            "no text region at ({}, {}); run `inkedit ocr` to list regions",
            point.x,
            point.y
        );
    };
    println!("{} {:?}", style("selected").green(), region.text);

    let mut font = FontSpec::new(
        args.font.unwrap_or_else(|| region.font.family.clone()),
        args.size.unwrap_or(region.font.size),
    );
    font.color = color;

    match editor.apply_edit(&args.text, &font)? {
        EditOutcome::Applied { font: resolution, .. } => {
            if let FontResolution::Fallback { requested, substituted } = &resolution {
                eprintln!(
                    "{} font {:?} not available, substituted {}",
                    style("note:").yellow(),
                    requested,
                    substituted
                );
            }
        }
        EditOutcome::SkippedEmptyText => {
            println!("replacement text is empty; nothing was changed");
            return Ok(());
        }
    }

    editor.image().save(&args.output)?;
    println!(
        "{} saved {}",
        style("ok").green().bold(),
        args.output.display()
    );
    Ok(())
}
