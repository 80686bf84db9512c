//! The working PDF document.
//!
//! Wraps `lopdf::Document` with the operations the edit-replace engine
//! needs: region extraction, area redaction, styled text insertion, and
//! whole-document serialization (which doubles as the history snapshot
//! form).
//!
//! All rectangle and point coordinates at this interface use a top-left
//! origin in page points; conversion to PDF's bottom-left space happens
//! here.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info};

use super::{extractor, Result};
use crate::error::PdfError;
use crate::font::{standard_base_font, FontResolution};
use crate::models::region::{FontSpec, Point, Rect, RegionIdGen, TextRegion};

/// An editable PDF document.
pub struct PdfDocument {
    document: Document,
}

impl PdfDocument {
    /// Load a document from a file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| PdfError::Parse(format!("{}: {e}", path.display())))?;
        Self::load_bytes(&data)
    }

    /// Load a document from memory.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // PDFs encrypted with an empty password are still usable.
        if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");
        }

        if document.get_pages().is_empty() {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} pages", document.get_pages().len());
        Ok(Self { document })
    }

    /// A blank single-content-stream document, used by tests and demos.
    pub fn blank(width: f32, height: f32, pages: usize) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(pages);
        for _ in 0..pages.max(1) {
            let content_id = document.add_object(Stream::new(dictionary! {}, Vec::new()));
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ],
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self { document }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Page dimensions (width, height) in points, from the MediaBox.
    pub fn page_size(&self, page: usize) -> Result<(f32, f32)> {
        let page_id = self.page_id(page)?;
        let media_box = self
            .inherited_entry(page_id, b"MediaBox")
            .ok_or_else(|| PdfError::Content("page has no MediaBox".to_string()))?;

        let values: Vec<f32> = match media_box {
            Object::Array(items) => items.iter().filter_map(number).collect(),
            _ => Vec::new(),
        };
        if values.len() != 4 {
            return Err(PdfError::Content("malformed MediaBox".to_string()));
        }
        Ok((values[2] - values[0], values[3] - values[1]))
    }

    /// Extract the editable text regions of a page, in content-stream
    /// order. Zero-area and whitespace-only spans are filtered out.
    pub fn extract_regions(&self, page: usize, ids: &mut RegionIdGen) -> Result<Vec<TextRegion>> {
        let page_id = self.page_id(page)?;
        let (_, height) = self.page_size(page)?;
        let fonts = self.page_fonts(page_id);

        let spans = extractor::scan_spans(&self.document, page_id, fonts.as_ref(), height)?;
        let regions: Vec<TextRegion> = spans
            .into_iter()
            .filter(|span| span.bounds.is_valid() && !span.text.trim().is_empty())
            .map(|span| TextRegion {
                id: ids.fresh(),
                text: span.text,
                bounds: span.bounds,
                font: FontSpec {
                    family: span.family,
                    size: span.size,
                    color: span.color,
                    bold: span.bold,
                    italic: span.italic,
                },
                confidence: None,
            })
            .collect();

        debug!("extracted {} regions from page {}", regions.len(), page);
        Ok(regions)
    }

    /// Plain text of a page: span texts joined in extraction order.
    pub fn page_text(&self, page: usize) -> Result<String> {
        let page_id = self.page_id(page)?;
        let (_, height) = self.page_size(page)?;
        let fonts = self.page_fonts(page_id);
        let spans = extractor::scan_spans(&self.document, page_id, fonts.as_ref(), height)?;
        Ok(spans
            .iter()
            .map(|span| span.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Whole-document plain text via pdf-extract, which handles font
    /// encodings the span scanner does not interpret.
    pub fn full_text(&mut self) -> Result<String> {
        let bytes = self.to_bytes()?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| PdfError::Content(e.to_string()))
    }

    /// Irreversibly remove all text intersecting `area` and flatten the
    /// rectangle with an opaque white fill.
    pub fn erase_area(&mut self, page: usize, area: Rect) -> Result<()> {
        let page_id = self.page_id(page)?;
        let (_, height) = self.page_size(page)?;
        let fonts = self.page_fonts(page_id);

        let spans = extractor::scan_spans(&self.document, page_id, fonts.as_ref(), height)?;
        let drop_ops: Vec<usize> = spans
            .iter()
            .filter(|span| span.bounds.intersects(&area))
            .map(|span| span.op_index)
            .collect();

        let mut content = extractor::strip_operations(&self.document, page_id, &drop_ops)?;

        let bottom = height - (area.y + area.height);
        content.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "rg",
                vec![Object::Real(1.0), Object::Real(1.0), Object::Real(1.0)],
            ),
            Operation::new(
                "re",
                vec![
                    Object::Real(area.x),
                    Object::Real(bottom),
                    Object::Real(area.width),
                    Object::Real(area.height),
                ],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);

        self.set_page_content(page_id, content)?;
        info!(
            "erased {}x{} area at ({}, {}) on page {}",
            area.width, area.height, area.x, area.y, page
        );
        Ok(())
    }

    /// Insert `text` with its baseline starting at `baseline` (top-left
    /// origin). Unknown families are substituted from the standard-14 set;
    /// the substitution is reported in the returned [`FontResolution`].
    pub fn insert_text(
        &mut self,
        page: usize,
        baseline: Point,
        text: &str,
        font: &FontSpec,
    ) -> Result<FontResolution> {
        let page_id = self.page_id(page)?;
        let (_, height) = self.page_size(page)?;

        let (base_font, matched) = standard_base_font(font);
        let resource = self.ensure_font_resource(page_id, base_font)?;

        let data = self
            .document
            .get_page_content(page_id)
            .map_err(|e| PdfError::Content(e.to_string()))?;
        let mut content =
            Content::decode(&data).map_err(|e| PdfError::Content(e.to_string()))?;

        let color = font.color;
        content.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(resource), Object::Real(font.size)],
            ),
            Operation::new(
                "rg",
                vec![
                    Object::Real(color.0 as f32 / 255.0),
                    Object::Real(color.1 as f32 / 255.0),
                    Object::Real(color.2 as f32 / 255.0),
                ],
            ),
            Operation::new(
                "Td",
                vec![Object::Real(baseline.x), Object::Real(height - baseline.y)],
            ),
            Operation::new(
                "Tj",
                vec![Object::string_literal(extractor::encode_pdf_text(text))],
            ),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]);

        self.set_page_content(page_id, content)?;
        info!(
            "inserted {:?} at ({}, {}) on page {} as {}",
            text, baseline.x, baseline.y, page, base_font
        );

        if matched {
            Ok(FontResolution::Exact {
                family: font.family.clone(),
            })
        } else {
            Ok(FontResolution::Fallback {
                requested: font.family.clone(),
                substituted: base_font.to_string(),
            })
        }
    }

    /// Serialize the whole document to bytes.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        Ok(bytes)
    }

    /// Save the document to a file.
    pub fn save(&mut self, path: &std::path::Path) -> Result<()> {
        self.document
            .save(path)
            .map(|_| ())
            .map_err(|e| PdfError::Save(e.to_string()))
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        self.document
            .get_pages()
            .get(&(page as u32 + 1))
            .copied()
            .ok_or(PdfError::InvalidPage(page))
    }

    /// Look up a page-tree entry, walking up through Parent nodes for
    /// inherited values.
    fn inherited_entry(&self, node_id: ObjectId, key: &[u8]) -> Option<Object> {
        let dict = self.document.get_object(node_id).ok()?.as_dict().ok()?;

        if let Ok(value) = dict.get(key) {
            if let Ok((_, value)) = self.document.dereference(value) {
                return Some(value.clone());
            }
        }

        if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
            return self.inherited_entry(*parent_id, key);
        }
        None
    }

    fn page_fonts(&self, page_id: ObjectId) -> Option<Dictionary> {
        let resources = self.inherited_entry(page_id, b"Resources")?;
        let resources = resources.as_dict().ok()?;
        let fonts = resources.get(b"Font").ok()?;
        let (_, fonts) = self.document.dereference(fonts).ok()?;
        fonts.as_dict().ok().cloned()
    }

    /// Make sure the page's font resources carry `base_font` and return
    /// the resource name to reference it by. Inherited resources are
    /// flattened onto the page on first write.
    fn ensure_font_resource(&mut self, page_id: ObjectId, base_font: &str) -> Result<Vec<u8>> {
        let mut resources: Dictionary = self
            .inherited_entry(page_id, b"Resources")
            .and_then(|obj| obj.as_dict().ok().cloned())
            .unwrap_or_default();

        let mut fonts: Dictionary = match resources.get(b"Font") {
            Ok(obj) => self
                .document
                .dereference(obj)
                .ok()
                .and_then(|(_, obj)| obj.as_dict().ok().cloned())
                .unwrap_or_default(),
            Err(_) => Dictionary::new(),
        };

        // Reuse an existing entry for the same base font.
        for (name, value) in fonts.iter() {
            let base = self
                .document
                .dereference(value)
                .ok()
                .and_then(|(_, obj)| obj.as_dict().ok())
                .and_then(|dict| dict.get(b"BaseFont").ok())
                .and_then(|obj| obj.as_name().ok());
            if base == Some(base_font.as_bytes()) {
                return Ok(name.clone());
            }
        }

        let mut index = fonts.len() + 1;
        let name = loop {
            let candidate = format!("F{index}");
            if !fonts.has(candidate.as_bytes()) {
                break candidate.into_bytes();
            }
            index += 1;
        };

        let font_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
        });
        fonts.set(name.clone(), font_id);
        resources.set("Font", Object::Dictionary(fonts));

        let page = self
            .document
            .get_object_mut(page_id)
            .map_err(|e| PdfError::Content(e.to_string()))?;
        match page {
            Object::Dictionary(dict) => dict.set("Resources", Object::Dictionary(resources)),
            _ => return Err(PdfError::Content("page is not a dictionary".to_string())),
        }

        Ok(name)
    }

    fn set_page_content(&mut self, page_id: ObjectId, content: Content) -> Result<()> {
        let data = content
            .encode()
            .map_err(|e| PdfError::Content(e.to_string()))?;
        self.document
            .change_page_content(page_id, data)
            .map_err(|e| PdfError::Content(e.to_string()))
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::Rgb;
    use pretty_assertions::assert_eq;

    fn doc_with_hello() -> (PdfDocument, RegionIdGen) {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        let font = FontSpec::new("Arial", 12.0);
        // Baseline 0.8em below the intended region top of y=100.
        doc.insert_text(0, Point::new(100.0, 109.6), "Hello", &font)
            .unwrap();
        (doc, RegionIdGen::new())
    }

    #[test]
    fn test_blank_document_shape() {
        let doc = PdfDocument::blank(612.0, 792.0, 3);
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.page_size(1).unwrap(), (612.0, 792.0));
        assert!(matches!(
            doc.page_size(3),
            Err(PdfError::InvalidPage(3))
        ));
    }

    #[test]
    fn test_insert_then_extract_round_trip() {
        let (doc, mut ids) = doc_with_hello();
        let regions = doc.extract_regions(0, &mut ids).unwrap();
        assert_eq!(regions.len(), 1);

        let region = &regions[0];
        assert_eq!(region.text, "Hello");
        assert_eq!(region.font.family, "Helvetica");
        assert_eq!(region.font.size, 12.0);
        assert_eq!(region.font.color, Rgb::BLACK);
        assert_eq!(region.confidence, None);

        // Top of box sits one ascent above the baseline.
        assert!((region.bounds.x - 100.0).abs() < 0.01);
        assert!((region.bounds.y - 100.0).abs() < 0.01);
        assert!(region.bounds.width > 0.0);
        assert!(region.bounds.height > 0.0);
    }

    #[test]
    fn test_extracted_regions_are_non_degenerate() {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        let font = FontSpec::new("Arial", 12.0);
        doc.insert_text(0, Point::new(50.0, 100.0), "first", &font).unwrap();
        doc.insert_text(0, Point::new(50.0, 130.0), "   ", &font).unwrap();
        doc.insert_text(0, Point::new(50.0, 160.0), "second", &font).unwrap();

        let mut ids = RegionIdGen::new();
        let regions = doc.extract_regions(0, &mut ids).unwrap();
        assert_eq!(regions.len(), 2);
        for region in &regions {
            assert!(region.bounds.width > 0.0);
            assert!(region.bounds.height > 0.0);
            assert!(!region.text.trim().is_empty());
        }
    }

    #[test]
    fn test_region_ids_are_not_reused_across_extractions() {
        let (doc, mut ids) = doc_with_hello();
        let first = doc.extract_regions(0, &mut ids).unwrap();
        let second = doc.extract_regions(0, &mut ids).unwrap();
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_erase_area_removes_intersecting_text() {
        let (mut doc, mut ids) = doc_with_hello();
        let regions = doc.extract_regions(0, &mut ids).unwrap();
        doc.erase_area(0, regions[0].bounds).unwrap();

        let after = doc.extract_regions(0, &mut ids).unwrap();
        assert!(after.is_empty());
    }

    #[test]
    fn test_erase_area_keeps_disjoint_text() {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        let font = FontSpec::new("Arial", 12.0);
        doc.insert_text(0, Point::new(50.0, 100.0), "keep", &font).unwrap();
        doc.insert_text(0, Point::new(50.0, 400.0), "drop", &font).unwrap();

        let mut ids = RegionIdGen::new();
        let regions = doc.extract_regions(0, &mut ids).unwrap();
        let target = regions.iter().find(|r| r.text == "drop").unwrap();
        doc.erase_area(0, target.bounds).unwrap();

        let after = doc.extract_regions(0, &mut ids).unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].text, "keep");
    }

    #[test]
    fn test_insert_reports_font_fallback() {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        let font = FontSpec::new("Wingdings", 12.0);
        let resolution = doc
            .insert_text(0, Point::new(10.0, 20.0), "x", &font)
            .unwrap();
        assert_eq!(
            resolution,
            FontResolution::Fallback {
                requested: "Wingdings".to_string(),
                substituted: "Helvetica".to_string(),
            }
        );

        let exact = doc
            .insert_text(0, Point::new(10.0, 40.0), "y", &FontSpec::new("Courier", 12.0))
            .unwrap();
        assert_eq!(exact, FontResolution::Exact { family: "Courier".to_string() });
    }

    #[test]
    fn test_font_resource_reused_for_same_base_font() {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        let page_id = doc.page_id(0).unwrap();
        let first = doc.ensure_font_resource(page_id, "Helvetica").unwrap();
        let again = doc.ensure_font_resource(page_id, "Helvetica").unwrap();
        let other = doc.ensure_font_resource(page_id, "Courier").unwrap();
        assert_eq!(first, again);
        assert_ne!(first, other);
    }

    #[test]
    fn test_serialization_round_trip() {
        let (mut doc, mut ids) = doc_with_hello();
        let bytes = doc.to_bytes().unwrap();
        let reloaded = PdfDocument::load_bytes(&bytes).unwrap();
        let regions = reloaded.extract_regions(0, &mut ids).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].text, "Hello");
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(PdfDocument::load_bytes(b"not a pdf").is_err());
    }

    #[test]
    fn test_page_text_joins_spans_in_extraction_order() {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        let font = FontSpec::new("Arial", 12.0);
        doc.insert_text(0, Point::new(50.0, 100.0), "alpha", &font).unwrap();
        doc.insert_text(0, Point::new(50.0, 130.0), "beta", &font).unwrap();
        assert_eq!(doc.page_text(0).unwrap(), "alpha\nbeta");
    }
}
