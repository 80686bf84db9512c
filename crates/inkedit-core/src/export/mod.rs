//! Export adapters: serialize the edited document to PDF, DOCX, or PNG.
//!
//! Thin shells over the external encoders; no document mutation happens
//! on any export path.

mod docx;

pub use docx::docx_bytes;

use std::io::Cursor;

use image::RgbaImage;

use crate::error::{ExportError, Result};
use crate::pdf::PdfDocument;

/// The edited document as PDF bytes.
pub fn pdf_bytes(doc: &mut PdfDocument) -> Result<Vec<u8>> {
    Ok(doc.to_bytes()?)
}

/// Encode a rendered page or working photo as PNG bytes.
pub fn png_bytes(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, image::ImageFormat::Png)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::{FontSpec, Point};
    use image::Rgba;

    #[test]
    fn test_pdf_bytes_round_trip() {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        doc.insert_text(0, Point::new(72.0, 100.0), "hi", &FontSpec::default())
            .unwrap();
        let bytes = pdf_bytes(&mut doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(PdfDocument::load_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_png_bytes_decode_back() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([1, 2, 3, 255]));
        let bytes = png_bytes(&image).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 16);
    }
}
