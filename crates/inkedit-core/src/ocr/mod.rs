//! OCR adapter: derive text regions from a raster image.

mod engine;

pub use engine::OcrEngine;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::region::{FontSpec, Rect, RegionIdGen, Rgb, TextRegion};

/// Family assigned to OCR regions; the engine does not report font
/// identity.
pub const OCR_DEFAULT_FAMILY: &str = "Arial";

/// Minimum estimated font size for an OCR region.
const MIN_ESTIMATED_SIZE: f32 = 10.0;

/// Fraction of the token box height taken as the font size estimate.
const SIZE_FROM_HEIGHT: f32 = 0.75;

/// One word-level token reported by the OCR engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrToken {
    /// Recognized text.
    pub text: String,

    /// Bounding box in image pixels, top-left origin.
    pub bounds: Rect,

    /// Engine confidence on a 0-100 scale.
    pub confidence: f32,
}

/// Convert OCR tokens into text regions.
///
/// Tokens with empty trimmed text or confidence at or below `threshold`
/// are discarded. Font size is estimated from the box height; family and
/// color are fixed defaults since the engine reports neither.
pub fn regions_from_tokens(
    tokens: &[OcrToken],
    threshold: f32,
    ids: &mut RegionIdGen,
) -> Vec<TextRegion> {
    let regions: Vec<TextRegion> = tokens
        .iter()
        .filter(|token| !token.text.trim().is_empty() && token.confidence > threshold)
        .filter(|token| token.bounds.is_valid())
        .map(|token| TextRegion {
            id: ids.fresh(),
            text: token.text.trim().to_string(),
            bounds: token.bounds,
            font: FontSpec {
                family: OCR_DEFAULT_FAMILY.to_string(),
                size: (SIZE_FROM_HEIGHT * token.bounds.height).max(MIN_ESTIMATED_SIZE),
                color: Rgb::BLACK,
                bold: false,
                italic: false,
            },
            confidence: Some(token.confidence),
        })
        .collect();

    debug!(
        "kept {} of {} OCR tokens above confidence {}",
        regions.len(),
        tokens.len(),
        threshold
    );
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(text: &str, confidence: f32, height: f32) -> OcrToken {
        OcrToken {
            text: text.to_string(),
            bounds: Rect::new(10.0, 20.0, 40.0, height),
            confidence,
        }
    }

    #[test]
    fn test_confidence_filter_is_strict() {
        let tokens = vec![
            token("kept", 31.0, 16.0),
            token("boundary", 30.0, 16.0),
            token("low", 12.0, 16.0),
        ];
        let mut ids = RegionIdGen::new();
        let regions = regions_from_tokens(&tokens, 30.0, &mut ids);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].text, "kept");
        assert_eq!(regions[0].confidence, Some(31.0));
    }

    #[test]
    fn test_empty_and_whitespace_tokens_are_dropped() {
        let tokens = vec![token("", 90.0, 16.0), token("  \t", 90.0, 16.0)];
        let mut ids = RegionIdGen::new();
        assert!(regions_from_tokens(&tokens, 30.0, &mut ids).is_empty());
    }

    #[test]
    fn test_degenerate_boxes_are_dropped() {
        let mut flat = token("word", 90.0, 16.0);
        flat.bounds.width = 0.0;
        let mut ids = RegionIdGen::new();
        assert!(regions_from_tokens(&[flat], 30.0, &mut ids).is_empty());
    }

    #[test]
    fn test_font_size_estimate() {
        let tokens = vec![token("big", 90.0, 40.0), token("tiny", 90.0, 8.0)];
        let mut ids = RegionIdGen::new();
        let regions = regions_from_tokens(&tokens, 30.0, &mut ids);
        assert_eq!(regions[0].font.size, 30.0); // 0.75 * 40
        assert_eq!(regions[1].font.size, 10.0); // clamped at the minimum
        assert_eq!(regions[0].font.family, OCR_DEFAULT_FAMILY);
        assert_eq!(regions[0].font.color, Rgb::BLACK);
    }
}
