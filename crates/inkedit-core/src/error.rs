//! Error types for the inkedit-core library.

use thiserror::Error;

/// Main error type for the inkedit library.
#[derive(Error, Debug)]
pub enum InkeditError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Editing error.
    #[error("edit error: {0}")]
    Edit(#[from] EditError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(usize),

    /// Failed to decode or rewrite a page content stream.
    #[error("content stream error: {0}")]
    Content(String),

    /// Failed to serialize the document.
    #[error("failed to save PDF: {0}")]
    Save(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine binary is not installed or not on PATH.
    ///
    /// The message carries remediation text; this is a recoverable,
    /// user-correctable condition rather than a fatal one.
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The OCR engine ran but failed.
    #[error("OCR invocation failed: {0}")]
    Invocation(String),

    /// The engine output could not be parsed.
    #[error("failed to parse OCR output: {0}")]
    Parse(String),

    /// Invalid image input.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors related to edit operations.
#[derive(Error, Debug)]
pub enum EditError {
    /// An edit was requested without an active selection.
    #[error("no text region selected")]
    NoSelection,

    /// The active selection belongs to the other backend.
    #[error("selection belongs to the {0} backend")]
    SelectionMismatch(&'static str),
}

/// Errors related to export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// DOCX encoding failed.
    #[error("failed to encode DOCX: {0}")]
    Docx(String),

    /// Raster encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(String),
}

/// Result type for the inkedit library.
pub type Result<T> = std::result::Result<T, InkeditError>;
