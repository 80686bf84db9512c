//! Photo backend: paint replacement text over the working raster.
//!
//! Unlike the PDF side there is no redo: undo is an append-only list of
//! whole-image copies, popped one at a time. Region lists are not
//! re-extracted after an edit; the OCR pass that produced them stays
//! authoritative until the caller runs another one.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;
use tracing::{debug, info};

use super::{hit_test, EditOutcome};
use crate::error::{EditError, Result};
use crate::font::FontResolver;
use crate::models::config::PhotoConfig;
use crate::models::region::{
    FontSpec, Point, Rect, Selection, SelectionSource, TextRegion,
};

/// The working photo with its OCR regions and undo list.
pub struct PhotoEditor {
    image: RgbaImage,
    regions: Vec<TextRegion>,
    selection: Option<Selection>,
    undo_stack: Vec<RgbaImage>,
    resolver: FontResolver,
    patch_padding: u32,
}

impl PhotoEditor {
    /// Open an image file as the working photo.
    pub fn load(path: &std::path::Path, config: &PhotoConfig) -> Result<Self> {
        let image = image::open(path)?;
        Ok(Self::from_image(image, config))
    }

    pub fn from_image(image: DynamicImage, config: &PhotoConfig) -> Self {
        let image = image.to_rgba8();
        debug!("working photo {}x{}", image.width(), image.height());
        Self {
            image,
            regions: Vec::new(),
            selection: None,
            undo_stack: Vec::new(),
            resolver: FontResolver::new().with_extra_dirs(config.font_dirs.iter().cloned()),
            patch_padding: config.patch_padding,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn regions(&self) -> &[TextRegion] {
        &self.regions
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Replace the region list (the result of an OCR pass). Clears the
    /// selection, which would otherwise point into the old list.
    pub fn set_regions(&mut self, regions: Vec<TextRegion>) {
        self.regions = regions;
        self.selection = None;
    }

    /// Hit-test `point` and make the hit region the active selection.
    pub fn select_at(&mut self, point: Point) -> Option<&TextRegion> {
        let region = hit_test(&self.regions, point)?.clone();
        debug!("selected photo region {:?}: {:?}", region.id, region.text);
        self.selection = Some(Selection {
            region: region.id,
            source: SelectionSource::Photo,
            anchor: region.bounds,
            text: region.text.clone(),
            font: region.font.clone(),
        });
        self.regions.iter().find(|r| r.id == region.id)
    }

    /// Paint `text` over the selected region.
    ///
    /// Requires an active selection; this is a user-visible error rather
    /// than a silent no-op.
    pub fn apply_edit(&mut self, text: &str, style: &FontSpec) -> Result<EditOutcome> {
        let anchor = {
            let selection = self.selection.as_ref().ok_or(EditError::NoSelection)?;
            Point::new(selection.anchor.x, selection.anchor.y)
        };
        self.apply_edit_at(text, style, Some(anchor))
    }

    /// Paint `text` at an explicit anchor, or centered when none is given.
    pub fn apply_edit_at(
        &mut self,
        text: &str,
        style: &FontSpec,
        anchor: Option<Point>,
    ) -> Result<EditOutcome> {
        if text.trim().is_empty() {
            debug!("empty replacement text, photo edit not committed");
            return Ok(EditOutcome::SkippedEmptyText);
        }

        let anchor = anchor.unwrap_or_else(|| {
            Point::new(
                (self.image.width() / 2) as f32,
                (self.image.height() / 2) as f32,
            )
        });

        let (font, resolution) = self.resolver.resolve(&style.family);
        let (text_w, text_h) = font.measure(text, style.size);

        // Whole-image copy first; this is the undo unit.
        self.undo_stack.push(self.image.clone());

        // Opaque patch under the new text so the original pixels do not
        // show through.
        let patch = Rect::new(anchor.x, anchor.y, text_w as f32, text_h as f32)
            .padded(self.patch_padding as f32);
        if let Some(pixel_rect) = to_pixel_rect(&patch) {
            draw_filled_rect_mut(&mut self.image, pixel_rect, Rgba([255, 255, 255, 255]));
        }

        let color = Rgba([style.color.0, style.color.1, style.color.2, 255]);
        font.draw(
            &mut self.image,
            anchor.x as i32,
            anchor.y as i32,
            style.size,
            color,
            text,
        );

        info!(
            "painted {:?} at ({}, {}) with {}",
            text,
            anchor.x,
            anchor.y,
            resolution.effective()
        );
        Ok(EditOutcome::Applied {
            font: resolution,
            erased: patch,
            baseline: anchor,
        })
    }

    /// Restore the most recent whole-image copy. Returns false when the
    /// undo list is empty. There is no redo on this backend.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.image = previous;
                info!("photo undo, {} steps left", self.undo_stack.len());
                true
            }
            None => false,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}

/// Clamp a float rect to integer pixel space; `None` when nothing of it
/// is drawable.
fn to_pixel_rect(rect: &Rect) -> Option<PixelRect> {
    let width = rect.width.round() as i64;
    let height = rect.height.round() as i64;
    if width <= 0 || height <= 0 {
        return None;
    }
    Some(PixelRect::at(rect.x.round() as i32, rect.y.round() as i32).of_size(width as u32, height as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::{RegionId, Rgb};
    use pretty_assertions::assert_eq;

    const BG: Rgba<u8> = Rgba([40u8, 90, 160, 255]);

    fn editor_with_region() -> PhotoEditor {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(200, 120, BG));
        let mut editor = PhotoEditor::from_image(image, &PhotoConfig::default());
        editor.set_regions(vec![TextRegion {
            id: RegionId(1),
            text: "sign".to_string(),
            bounds: Rect::new(30.0, 40.0, 60.0, 16.0),
            font: FontSpec::new("Arial", 12.0),
            confidence: Some(88.0),
        }]);
        editor
    }

    /// A family no test machine resolves, forcing the bitmap fallback.
    fn unresolvable() -> FontSpec {
        FontSpec::new("DefinitelyMissingFace", 12.0).with_color(Rgb(200, 0, 0))
    }

    #[test]
    fn test_edit_requires_selection() {
        let mut editor = editor_with_region();
        let err = editor.apply_edit("new", &unresolvable()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::InkeditError::Edit(EditError::NoSelection)
        ));
        assert_eq!(editor.undo_depth(), 0);
    }

    #[test]
    fn test_edit_paints_patch_and_text() {
        let mut editor = editor_with_region();
        editor.select_at(Point::new(40.0, 45.0)).unwrap();

        let outcome = editor.apply_edit("new", &unresolvable()).unwrap();
        let EditOutcome::Applied { font, erased, baseline } = outcome else {
            panic!("edit was not applied");
        };
        assert!(font.is_fallback());
        assert_eq!(baseline, Point::new(30.0, 40.0));
        // Patch is the measured text box plus the 5px padding.
        assert_eq!(erased.x, 25.0);
        assert_eq!(erased.y, 35.0);

        // The patch covered the background around the anchor.
        assert_eq!(*editor.image().get_pixel(27, 37), Rgba([255, 255, 255, 255]));
        // And the glyphs put down some ink.
        let inked = editor
            .image()
            .pixels()
            .filter(|p| p.0 == [0, 0, 0, 255])
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn test_undo_restores_previous_pixels_one_step_at_a_time() {
        let mut editor = editor_with_region();
        editor.select_at(Point::new(40.0, 45.0)).unwrap();

        let original = editor.image().clone();
        editor.apply_edit("one", &unresolvable()).unwrap();
        let after_first = editor.image().clone();
        editor.select_at(Point::new(40.0, 45.0)).unwrap();
        editor.apply_edit("two", &unresolvable()).unwrap();
        assert_eq!(editor.undo_depth(), 2);

        assert!(editor.undo());
        assert_eq!(editor.image().as_raw(), after_first.as_raw());
        assert!(editor.undo());
        assert_eq!(editor.image().as_raw(), original.as_raw());
        assert!(!editor.undo());
    }

    #[test]
    fn test_empty_text_pushes_nothing() {
        let mut editor = editor_with_region();
        editor.select_at(Point::new(40.0, 45.0)).unwrap();
        let before = editor.image().clone();

        let outcome = editor.apply_edit("  ", &unresolvable()).unwrap();
        assert_eq!(outcome, EditOutcome::SkippedEmptyText);
        assert_eq!(editor.undo_depth(), 0);
        assert_eq!(editor.image().as_raw(), before.as_raw());
    }

    #[test]
    fn test_edit_at_defaults_to_image_center() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, BG));
        let mut editor = PhotoEditor::from_image(image, &PhotoConfig::default());

        let outcome = editor
            .apply_edit_at("x", &unresolvable(), None)
            .unwrap();
        let EditOutcome::Applied { baseline, .. } = outcome else {
            panic!("edit was not applied");
        };
        assert_eq!(baseline, Point::new(50.0, 50.0));
    }

    #[test]
    fn test_regions_are_not_reextracted_after_edit() {
        let mut editor = editor_with_region();
        editor.select_at(Point::new(40.0, 45.0)).unwrap();
        editor.apply_edit("new", &unresolvable()).unwrap();
        assert_eq!(editor.regions().len(), 1);
        assert_eq!(editor.regions()[0].text, "sign");
    }
}
