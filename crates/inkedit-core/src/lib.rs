//! Core library for in-place text editing of PDFs and photos.
//!
//! This crate provides:
//! - Region extraction (PDF content-stream spans, OCR word tokens)
//! - Pointer hit-testing and selection
//! - Redact-and-replace editing on both backends
//! - Linear undo/redo over whole-document snapshots
//! - Page rasterization and PDF/DOCX/PNG export

pub mod edit;
pub mod error;
pub mod export;
pub mod font;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod render;

pub use error::{EditError, ExportError, InkeditError, OcrError, PdfError, Result};
pub use models::config::{InkeditConfig, OcrConfig, PdfConfig, PhotoConfig};
pub use models::region::{
    FontSpec, Point, Rect, RegionId, RegionIdGen, Rgb, Selection, SelectionSource, TextRegion,
};

pub use edit::{hit_test, EditOutcome, EditSession, HistoryStack, PhotoEditor, Snapshot};
pub use font::{FontResolution, FontResolver, RasterFont};
pub use ocr::{regions_from_tokens, OcrEngine, OcrToken};
pub use pdf::PdfDocument;
pub use render::render_page;
