//! The edit-replace engine.
//!
//! Session state is an explicit value passed to each operation together
//! with the working document, so every step here is unit-testable without
//! any UI attached.

mod hit;
mod history;
mod photo;

pub use hit::hit_test;
pub use history::{HistoryStack, Snapshot};
pub use photo::PhotoEditor;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{EditError, Result};
use crate::font::FontResolution;
use crate::models::region::{
    FontSpec, Point, Rect, RegionIdGen, Selection, SelectionSource, TextRegion,
};
use crate::pdf::{PdfDocument, ASCENT_EM, LINE_HEIGHT_EM};

/// Monospace-width heuristic used when the selected region no longer
/// resolves and an erase rectangle has to be synthesized.
const FALLBACK_ADVANCE_EM: f32 = 0.6;

/// Result of an edit-replace call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EditOutcome {
    /// The edit was applied.
    Applied {
        /// How the requested family resolved; fallback is reported, not
        /// silent.
        font: FontResolution,
        /// The rectangle that was blanked.
        erased: Rect,
        /// Baseline anchor the replacement text was placed at.
        baseline: Point,
    },

    /// Empty replacement text: the document and history were left
    /// untouched.
    SkippedEmptyText,
}

/// One page's editing state: extracted regions, the active selection and
/// style, and the undo history.
pub struct EditSession {
    regions: Vec<TextRegion>,
    selection: Option<Selection>,
    style: FontSpec,
    history: HistoryStack,
    page: usize,
    ids: RegionIdGen,
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            selection: None,
            style: FontSpec::default(),
            history: HistoryStack::new(),
            page: 0,
            ids: RegionIdGen::new(),
        }
    }

    /// Extract the regions of `page` into the session.
    ///
    /// Region ids from any earlier extraction are invalidated and the
    /// selection is cleared, as it is on every document or page change.
    pub fn load_page(&mut self, doc: &PdfDocument, page: usize) -> Result<()> {
        self.regions = doc.extract_regions(page, &mut self.ids)?;
        self.selection = None;
        self.page = page;
        debug!("session on page {} with {} regions", page, self.regions.len());
        Ok(())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn regions(&self) -> &[TextRegion] {
        &self.regions
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn style(&self) -> &FontSpec {
        &self.style
    }

    pub fn set_style(&mut self, style: FontSpec) {
        self.style = style;
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Hit-test `point` and make the hit region the active selection,
    /// replacing any previous one. A miss leaves the selection as it was.
    pub fn select_at(&mut self, point: Point) -> Option<&TextRegion> {
        let region = hit_test(&self.regions, point)?.clone();
        debug!("selected region {:?}: {:?}", region.id, region.text);
        self.selection = Some(Selection {
            region: region.id,
            source: SelectionSource::Pdf,
            anchor: region.bounds,
            text: region.text.clone(),
            font: region.font.clone(),
        });
        self.style = region.font;
        self.regions.iter().find(|r| r.id == region.id)
    }

    /// Replace the selected region's text: blank its rectangle, insert
    /// `new_text` at the derived baseline, and re-extract the page.
    ///
    /// A pre-edit snapshot is committed before the document is touched,
    /// and the post-edit state right after, so one `undo` returns to the
    /// document as it was before this call.
    pub fn apply_edit(
        &mut self,
        doc: &mut PdfDocument,
        new_text: &str,
        style: &FontSpec,
    ) -> Result<EditOutcome> {
        if new_text.trim().is_empty() {
            debug!("empty replacement text, edit not committed");
            return Ok(EditOutcome::SkippedEmptyText);
        }

        let selection = self.selection.clone().ok_or(EditError::NoSelection)?;
        if selection.source != SelectionSource::Pdf {
            return Err(EditError::SelectionMismatch(selection.source.name()).into());
        }

        // Baseline state so the first undo has somewhere to go.
        if self.history.is_empty() {
            let bytes = doc.to_bytes()?;
            self.history.commit(Snapshot { page: self.page, bytes });
        }

        // The stored id re-resolves against the current region list; when
        // the page mutated since selection, fall back to a synthesized
        // rectangle at the selection anchor.
        let erased = match self.regions.iter().find(|r| r.id == selection.region) {
            Some(region) => region.bounds,
            None => Rect::new(
                selection.anchor.x,
                selection.anchor.y,
                new_text.chars().count() as f32 * style.size * FALLBACK_ADVANCE_EM,
                style.size * LINE_HEIGHT_EM,
            ),
        };

        doc.erase_area(self.page, erased)?;
        let baseline = Point::new(erased.x, erased.y + style.size * ASCENT_EM);
        let font = doc.insert_text(self.page, baseline, new_text, style)?;

        let bytes = doc.to_bytes()?;
        self.history.commit(Snapshot { page: self.page, bytes });

        self.regions = doc.extract_regions(self.page, &mut self.ids)?;
        self.selection = None;
        self.style = style.clone();

        info!("edit applied on page {}: {:?}", self.page, new_text);
        Ok(EditOutcome::Applied { font, erased, baseline })
    }

    /// Restore the previous snapshot. Returns false when there is none.
    pub fn undo(&mut self, doc: &mut PdfDocument) -> Result<bool> {
        let Some(snapshot) = self.history.undo() else {
            return Ok(false);
        };
        let (page, bytes) = (snapshot.page, snapshot.bytes.clone());
        self.restore(doc, page, &bytes)?;
        info!("undo to page {}", page);
        Ok(true)
    }

    /// Restore the next snapshot. Returns false when there is none.
    pub fn redo(&mut self, doc: &mut PdfDocument) -> Result<bool> {
        let Some(snapshot) = self.history.redo() else {
            return Ok(false);
        };
        let (page, bytes) = (snapshot.page, snapshot.bytes.clone());
        self.restore(doc, page, &bytes)?;
        info!("redo to page {}", page);
        Ok(true)
    }

    fn restore(&mut self, doc: &mut PdfDocument, page: usize, bytes: &[u8]) -> Result<()> {
        *doc = PdfDocument::load_bytes(bytes)?;
        self.page = page;
        self.regions = doc.extract_regions(page, &mut self.ids)?;
        self.selection = None;
        Ok(())
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::Rgb;
    use pretty_assertions::assert_eq;

    fn arial12() -> FontSpec {
        FontSpec::new("Arial", 12.0)
    }

    /// One-page document with "Hello" whose region top-left lands at
    /// (100, 100).
    fn hello_doc() -> (PdfDocument, EditSession) {
        let mut doc = PdfDocument::blank(612.0, 792.0, 1);
        doc.insert_text(0, Point::new(100.0, 109.6), "Hello", &arial12())
            .unwrap();
        let mut session = EditSession::new();
        session.load_page(&doc, 0).unwrap();
        (doc, session)
    }

    #[test]
    fn test_click_selects_the_containing_region() {
        let (_doc, mut session) = hello_doc();
        let hit = session.select_at(Point::new(110.0, 105.0)).unwrap();
        assert_eq!(hit.text, "Hello");

        let selection = session.selection().unwrap();
        assert_eq!(selection.source, SelectionSource::Pdf);
        assert_eq!(selection.text, "Hello");
    }

    #[test]
    fn test_miss_keeps_the_previous_selection() {
        let (_doc, mut session) = hello_doc();
        session.select_at(Point::new(110.0, 105.0)).unwrap();
        assert!(session.select_at(Point::new(500.0, 700.0)).is_none());
        assert!(session.selection().is_some());
    }

    #[test]
    fn test_edit_replaces_text_in_place() {
        let (mut doc, mut session) = hello_doc();
        session.select_at(Point::new(110.0, 105.0)).unwrap();

        let outcome = session
            .apply_edit(&mut doc, "Goodbye", &arial12().with_color(Rgb::BLACK))
            .unwrap();

        let EditOutcome::Applied { baseline, erased, font } = outcome else {
            panic!("edit was not applied");
        };
        assert!((baseline.x - 100.0).abs() < 0.01);
        assert!((baseline.y - 109.6).abs() < 0.01);
        assert!((erased.x - 100.0).abs() < 0.01);
        assert!((erased.y - 100.0).abs() < 0.01);
        assert_eq!(font, FontResolution::Exact { family: "Arial".to_string() });

        let texts: Vec<&str> = session.regions().iter().map(|r| r.text.as_str()).collect();
        assert!(texts.contains(&"Goodbye"));
        assert!(!texts.contains(&"Hello"));

        // The replacement landed back at the original spot.
        let replacement = session
            .regions()
            .iter()
            .find(|r| r.text == "Goodbye")
            .unwrap();
        assert!((replacement.bounds.x - 100.0).abs() < 0.01);
        assert!((replacement.bounds.y - 100.0).abs() < 0.01);

        // Selection does not survive the re-extraction.
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_undo_restores_the_prior_text_and_redo_reapplies() {
        let (mut doc, mut session) = hello_doc();
        session.select_at(Point::new(110.0, 105.0)).unwrap();
        session.apply_edit(&mut doc, "Goodbye", &arial12()).unwrap();

        assert!(session.undo(&mut doc).unwrap());
        let texts: Vec<&str> = session.regions().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello"]);
        let hello = &session.regions()[0];
        assert!((hello.bounds.x - 100.0).abs() < 0.01);
        assert!((hello.bounds.y - 100.0).abs() < 0.01);

        assert!(session.redo(&mut doc).unwrap());
        let texts: Vec<&str> = session.regions().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Goodbye"]);

        // Nothing further either way.
        assert!(session.redo(&mut doc).unwrap() == false);
        assert!(session.undo(&mut doc).unwrap());
        assert!(session.undo(&mut doc).unwrap() == false);
    }

    #[test]
    fn test_empty_replacement_text_is_a_noop() {
        let (mut doc, mut session) = hello_doc();
        session.select_at(Point::new(110.0, 105.0)).unwrap();
        let before = doc.to_bytes().unwrap();

        let outcome = session.apply_edit(&mut doc, "   ", &arial12()).unwrap();
        assert_eq!(outcome, EditOutcome::SkippedEmptyText);
        assert!(session.history().is_empty());
        assert_eq!(doc.to_bytes().unwrap(), before);

        // Selection survives a skipped edit.
        assert!(session.selection().is_some());
    }

    #[test]
    fn test_edit_without_selection_is_an_error() {
        let (mut doc, mut session) = hello_doc();
        let err = session.apply_edit(&mut doc, "text", &arial12()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::InkeditError::Edit(EditError::NoSelection)
        ));
    }

    #[test]
    fn test_stale_selection_synthesizes_an_erase_rect() {
        let (mut doc, mut session) = hello_doc();
        session.select_at(Point::new(110.0, 105.0)).unwrap();

        // Re-extracting invalidates the selected id but keeps the anchor.
        let selection = session.selection.clone();
        session.load_page(&doc, 0).unwrap();
        session.selection = selection;

        let outcome = session.apply_edit(&mut doc, "Hi", &arial12()).unwrap();
        let EditOutcome::Applied { erased, .. } = outcome else {
            panic!("edit was not applied");
        };
        // 2 chars x 12pt x 0.6em wide, 12pt x 1.2em tall, at the anchor.
        assert!((erased.width - 14.4).abs() < 0.01);
        assert!((erased.height - 14.4).abs() < 0.01);
        assert!((erased.x - 100.0).abs() < 0.01);

        let texts: Vec<&str> = session.regions().iter().map(|r| r.text.as_str()).collect();
        assert!(texts.contains(&"Hi"));
        assert!(!texts.contains(&"Hello"));
    }

    #[test]
    fn test_page_change_clears_selection() {
        let mut doc = PdfDocument::blank(612.0, 792.0, 2);
        doc.insert_text(0, Point::new(100.0, 109.6), "Hello", &arial12())
            .unwrap();
        let mut session = EditSession::new();
        session.load_page(&doc, 0).unwrap();
        session.select_at(Point::new(110.0, 105.0)).unwrap();

        session.load_page(&doc, 1).unwrap();
        assert!(session.selection().is_none());
        assert!(session.regions().is_empty());
    }
}
