//! Export command - serialize a PDF to PDF, DOCX, or PNG.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use inkedit_core::export::{docx_bytes, pdf_bytes, png_bytes};
use inkedit_core::{render_page, FontResolver, PdfDocument};

use super::load_config;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file; the format is taken from the extension (.pdf, .docx,
    /// .png)
    #[arg(short, long)]
    output: PathBuf,

    /// Zoom percentage for PNG export (50-300)
    #[arg(long, default_value_t = 100)]
    zoom: u32,

    /// Page to rasterize for PNG export (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,
}

pub fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    if !(50..=300).contains(&args.zoom) {
        anyhow::bail!("zoom must be between 50 and 300 percent");
    }
    if args.page == 0 {
        anyhow::bail!("pages are numbered from 1");
    }

    let mut doc = PdfDocument::load(&args.input)?;

    let extension = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let bytes = match extension.as_str() {
        "pdf" => pdf_bytes(&mut doc)?,
        "docx" => docx_bytes(&mut doc)?,
        "png" => {
            if args.page > doc.page_count() {
                anyhow::bail!(
                    "page {} out of range: document has {} page(s)",
                    args.page,
                    doc.page_count()
                );
            }
            let scale = config.pdf.render_scale * args.zoom as f32 / 100.0;
            let image = render_page(&doc, args.page - 1, scale, &FontResolver::new())?;
            png_bytes(&image)?
        }
        other => anyhow::bail!("unsupported export format: {other:?} (use pdf, docx, or png)"),
    };

    fs::write(&args.output, &bytes)?;
    println!(
        "{} wrote {} bytes to {}",
        style("ok").green().bold(),
        bytes.len(),
        args.output.display()
    );
    Ok(())
}
