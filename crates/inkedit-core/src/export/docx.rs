//! DOCX export: one heading plus the page text per page.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::pdf::PdfDocument;

/// Encode the document as DOCX bytes.
///
/// Page text comes from the span scanner; when it comes back empty for
/// every page (fonts the scanner does not interpret), the whole-document
/// text from pdf-extract is split evenly across pages instead.
pub fn docx_bytes(doc: &mut PdfDocument) -> Result<Vec<u8>> {
    let pages = doc.page_count();
    let mut page_texts: Vec<String> = (0..pages)
        .map(|page| doc.page_text(page).unwrap_or_default())
        .collect();

    if page_texts.iter().all(|text| text.trim().is_empty()) {
        debug!("no spans scanned, falling back to whole-document text");
        page_texts = split_across_pages(&doc.full_text().unwrap_or_default(), pages);
    }

    let mut docx = Docx::new();
    for (index, text) in page_texts.iter().enumerate() {
        let heading = Run::new()
            .add_text(format!("Page {}", index + 1))
            .size(32)
            .bold();
        docx = docx.add_paragraph(Paragraph::new().add_run(heading));

        for line in text.lines() {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Divide full-document text into per-page chunks by line count.
fn split_across_pages(text: &str, pages: usize) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    if pages == 0 {
        return Vec::new();
    }
    let per_page = (lines.len() / pages).max(1);

    (0..pages)
        .map(|page| {
            let start = (page * per_page).min(lines.len());
            let end = if page + 1 == pages {
                lines.len()
            } else {
                ((page + 1) * per_page).min(lines.len())
            };
            lines[start..end].join("\n")
        })
        .collect()
}
