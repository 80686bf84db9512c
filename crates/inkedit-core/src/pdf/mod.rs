//! PDF backend: document lifecycle, span extraction, redact-and-insert.

mod document;
mod extractor;

pub use document::PdfDocument;
pub(crate) use extractor::{ASCENT_EM, LINE_HEIGHT_EM};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;
