//! Inspect command - list the editable text regions of a PDF page.

use std::path::PathBuf;

use clap::Args;
use console::style;

use inkedit_core::{PdfDocument, RegionIdGen};

use super::print_regions;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Page number (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON output
    Json,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    if args.page == 0 {
        anyhow::bail!("pages are numbered from 1");
    }

    let doc = PdfDocument::load(&args.input)?;
    if args.page > doc.page_count() {
        anyhow::bail!(
            "page {} out of range: document has {} page(s)",
            args.page,
            doc.page_count()
        );
    }

    let mut ids = RegionIdGen::new();
    let regions = doc.extract_regions(args.page - 1, &mut ids)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&regions)?),
        OutputFormat::Text => {
            println!(
                "{} page {} of {}",
                style(args.input.display()).bold(),
                args.page,
                doc.page_count()
            );
            print_regions(&regions);
        }
    }
    Ok(())
}
