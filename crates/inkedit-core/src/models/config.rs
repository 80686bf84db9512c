//! Configuration structures for the editing pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the inkedit pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InkeditConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Photo editing configuration.
    pub photo: PhotoConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract executable. Resolved via PATH when not absolute.
    pub command: PathBuf,

    /// Language code passed to the engine.
    pub language: String,

    /// Page segmentation mode. 6 assumes a uniform block of text.
    pub psm: u32,

    /// Minimum token confidence (0-100 scale) for a token to become a
    /// region. Tokens at or below this are discarded.
    pub confidence_threshold: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            psm: 6,
            confidence_threshold: 30.0,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Scale factor for rasterizing pages for display/PNG export.
    pub render_scale: f32,

    /// Family substituted when a requested family cannot be resolved.
    pub fallback_family: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            render_scale: 2.0,
            fallback_family: "Helvetica".to_string(),
        }
    }
}

/// Photo editing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoConfig {
    /// Padding in pixels around the background patch painted under
    /// replacement text.
    pub patch_padding: u32,

    /// Extra directories probed for `<family>.ttf` files, tried after the
    /// platform defaults.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            patch_padding: 5,
            font_dirs: Vec::new(),
        }
    }
}

impl InkeditConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = InkeditConfig::default();
        assert_eq!(config.ocr.confidence_threshold, 30.0);
        assert_eq!(config.ocr.psm, 6);
        assert_eq!(config.pdf.render_scale, 2.0);
        assert_eq!(config.photo.patch_padding, 5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: InkeditConfig =
            serde_json::from_str(r#"{"ocr": {"language": "pol"}}"#).unwrap();
        assert_eq!(config.ocr.language, "pol");
        assert_eq!(config.ocr.confidence_threshold, 30.0);
        assert_eq!(config.pdf.fallback_family, "Helvetica");
    }
}
