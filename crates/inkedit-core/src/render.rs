//! Rasterize a PDF page for display and PNG export.
//!
//! The canvas is the page at `scale` with a white background; each
//! extracted region is drawn through the raster font resolver. Pages are
//! reproduced from the same region model the editor works on, so what is
//! rendered is exactly what is editable.

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::error::Result;
use crate::font::FontResolver;
use crate::models::region::RegionIdGen;
use crate::pdf::PdfDocument;

/// Render `page` at `scale` (1.0 = one pixel per point).
pub fn render_page(
    doc: &PdfDocument,
    page: usize,
    scale: f32,
    resolver: &FontResolver,
) -> Result<RgbaImage> {
    let (width, height) = doc.page_size(page)?;
    let canvas_w = ((width * scale).ceil() as u32).max(1);
    let canvas_h = ((height * scale).ceil() as u32).max(1);
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([255, 255, 255, 255]));

    // Display-only pass; ids from this extraction are never handed to a
    // session.
    let mut ids = RegionIdGen::new();
    let regions = doc.extract_regions(page, &mut ids)?;
    debug!(
        "rendering page {} at {}x{} with {} regions",
        page,
        canvas_w,
        canvas_h,
        regions.len()
    );

    for region in &regions {
        let (font, _) = resolver.resolve(&region.font.family);
        let color = Rgba([
            region.font.color.0,
            region.font.color.1,
            region.font.color.2,
            255,
        ]);
        font.draw(
            &mut canvas,
            (region.bounds.x * scale) as i32,
            (region.bounds.y * scale) as i32,
            region.font.size * scale,
            color,
            &region.text,
        );
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::{FontSpec, Point};

    #[test]
    fn test_render_dimensions_follow_scale() {
        let doc = PdfDocument::blank(612.0, 792.0, 1);
        let resolver = FontResolver::new();
        let img = render_page(&doc, 0, 2.0, &resolver).unwrap();
        assert_eq!(img.dimensions(), (1224, 1584));

        let img = render_page(&doc, 0, 0.5, &resolver).unwrap();
        assert_eq!(img.dimensions(), (306, 396));
    }

    #[test]
    fn test_render_puts_ink_on_the_canvas() {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        doc.insert_text(0, Point::new(100.0, 109.6), "Hello", &FontSpec::new("Arial", 12.0))
            .unwrap();

        let img = render_page(&doc, 0, 1.0, &FontResolver::new()).unwrap();
        let non_white = img.pixels().filter(|p| p.0 != [255, 255, 255, 255]).count();
        assert!(non_white > 0);
    }

    #[test]
    fn test_render_rejects_bad_page() {
        let doc = PdfDocument::blank(612.0, 792.0, 1);
        assert!(render_page(&doc, 5, 1.0, &FontResolver::new()).is_err());
    }
}
