//! CLI application for in-place text editing of PDFs and photos.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{edit, export, inspect, ocr, photo};

/// Edit text in place in PDFs and photos
#[derive(Parser)]
#[command(name = "inkedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the editable text regions of a PDF page
    Inspect(inspect::InspectArgs),

    /// Extract text regions from an image with OCR
    Ocr(ocr::OcrArgs),

    /// Replace the text region under a point in a PDF
    Edit(edit::EditArgs),

    /// Replace a text region in a photo
    PhotoEdit(photo::PhotoEditArgs),

    /// Export a PDF to PDF, DOCX, or PNG
    Export(export::ExportArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Inspect(args) => inspect::run(args),
        Commands::Ocr(args) => ocr::run(args, cli.config.as_deref()),
        Commands::Edit(args) => edit::run(args),
        Commands::PhotoEdit(args) => photo::run(args, cli.config.as_deref()),
        Commands::Export(args) => export::run(args, cli.config.as_deref()),
    }
}
