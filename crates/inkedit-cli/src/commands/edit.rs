//! Edit command - replace the text region under a point in a PDF.

use std::path::PathBuf;

use clap::Args;
use console::style;

use inkedit_core::{EditOutcome, EditSession, FontResolution, FontSpec, PdfDocument};

use super::{parse_hex_color, parse_point};

/// Arguments for the edit command.
#[derive(Args)]
pub struct EditArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Click point as X,Y in page points (top-left origin)
    #[arg(long)]
    at: String,

    /// Replacement text
    #[arg(long)]
    text: String,

    /// Font family (default: the selected region's family)
    #[arg(long)]
    font: Option<String>,

    /// Font size in points (default: the selected region's size)
    #[arg(long)]
    size: Option<f32>,

    /// Text color as RRGGBB
    #[arg(long, default_value = "000000")]
    color: String,

    /// Page number (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Output PDF file
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(args: EditArgs) -> anyhow::Result<()> {
    if args.page == 0 {
        anyhow::bail!("pages are numbered from 1");
    }
    let point = parse_point(&args.at)?;
    let color = parse_hex_color(&args.color)?;

    let mut doc = PdfDocument::load(&args.input)?;
    if args.page > doc.page_count() {
        anyhow::bail!(
            "page {} out of range: document has {} page(s)",
            args.page,
            doc.page_count()
        );
    }

    let mut session = EditSession::new();
    session.load_page(&doc, args.page - 1)?;

    let Some(region) = session.select_at(point) else {
        anyhow::bail!(
            "no text region at ({}, {}); run `inkedit inspect` to list regions",
            point.x,
            point.y
        );
    };
    println!(
        "{} {:?} at ({:.1}, {:.1})",
        style("selected").green(),
        region.text,
        region.bounds.x,
        region.bounds.y
    );

    let mut font = FontSpec::new(
        args.font.unwrap_or_else(|| region.font.family.clone()),
        args.size.unwrap_or(region.font.size),
    );
    font.color = color;

    match session.apply_edit(&mut doc, &args.text, &font)? {
        EditOutcome::Applied { font: resolution, .. } => {
            if let FontResolution::Fallback { requested, substituted } = &resolution {
                eprintln!(
                    "{} font {:?} not available, substituted {:?}",
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

    doc.save(&args.output)?;
    println!(
        "{} saved {}",
        style("ok").green().bold(),
        args.output.display()
    );
    Ok(())
}
