//! Tesseract invocation and TSV output parsing.
//!
//! The engine is the system `tesseract` binary, called with TSV output so
//! word-level boxes and confidences come back in one pass. The working
//! image is written to a temporary PNG because tesseract reads files, not
//! pipes.

use std::io::Write;
use std::process::Command;

use image::DynamicImage;
use tracing::{debug, info, warn};

use super::OcrToken;
use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::models::region::Rect;

/// Install guidance shown when the tesseract binary cannot be found.
const INSTALL_HELP: &str = "tesseract binary not found. Install it:\n  \
    Windows: https://github.com/UB-Mannheim/tesseract/wiki\n  \
    macOS: brew install tesseract\n  \
    Linux: sudo apt-get install tesseract-ocr";

/// Word-box OCR over the system tesseract binary.
pub struct OcrEngine {
    config: OcrConfig,
}

impl OcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Run OCR on an image and return its word-level tokens.
    pub fn recognize(&self, image: &DynamicImage) -> Result<Vec<OcrToken>, OcrError> {
        let mut scratch = tempfile::Builder::new()
            .prefix("inkedit-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Invocation(format!("temp file: {e}")))?;

        // Tesseract chokes on some palette/alpha variants; normalize to RGB.
        image
            .to_rgb8()
            .write_to(&mut scratch, image::ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        scratch
            .flush()
            .map_err(|e| OcrError::Invocation(format!("temp file: {e}")))?;

        info!(
            "running {} on {}x{} image",
            self.config.command.display(),
            image.width(),
            image.height()
        );

        let output = Command::new(&self.config.command)
            .arg(scratch.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .arg("--psm")
            .arg(self.config.psm.to_string())
            .arg("tsv")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OcrError::EngineUnavailable(INSTALL_HELP.to_string())
                } else {
                    OcrError::Invocation(e.to_string())
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("tesseract exited with {}: {}", output.status, stderr.trim());
            return Err(OcrError::Invocation(stderr.trim().to_string()));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let tokens = parse_tsv(&tsv)?;
        info!("OCR produced {} word tokens", tokens.len());
        Ok(tokens)
    }
}

/// Parse tesseract TSV output into word tokens.
///
/// Word rows are level 5; rows with negative confidence are structural
/// (page/block/line) and carry no text.
pub(crate) fn parse_tsv(tsv: &str) -> Result<Vec<OcrToken>, OcrError> {
    let mut tokens = Vec::new();

    for (index, row) in tsv.lines().enumerate() {
        if index == 0 {
            // header row
            if !row.starts_with("level") {
                return Err(OcrError::Parse("missing TSV header".to_string()));
            }
            continue;
        }

        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() < 12 {
            continue;
        }

        let level: i32 = columns[0].parse().unwrap_or(0);
        if level != 5 {
            continue;
        }

        let confidence: f32 = columns[10].parse().unwrap_or(-1.0);
        let text = columns[11].trim();
        if text.is_empty() || confidence < 0.0 {
            continue;
        }

        let left: f32 = columns[6].parse().unwrap_or(0.0);
        let top: f32 = columns[7].parse().unwrap_or(0.0);
        let width: f32 = columns[8].parse().unwrap_or(0.0);
        let height: f32 = columns[9].parse().unwrap_or(0.0);

        tokens.push(OcrToken {
            text: text.to_string(),
            bounds: Rect::new(left, top, width, height),
            confidence,
        });
    }

    debug!("parsed {} word rows from TSV", tokens.len());
    Ok(tokens)
}
