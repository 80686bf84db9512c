//! The region model: rectangles of editable text with font metadata.
//!
//! Both the PDF span extractor and the OCR adapter produce [`TextRegion`]s,
//! so hit-testing and the edit-replace engine work over one representation
//! regardless of backend.

use serde::{Deserialize, Serialize};

/// Stable identifier for an extracted region.
///
/// Assigned at extraction time and carried through selection and edit.
/// Ids are invalidated whenever a page is re-extracted; a selection holding
/// an id from a previous extraction will no longer resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u64);

/// Monotonic [`RegionId`] source.
///
/// One generator lives per editing session, so ids from superseded
/// extraction passes are never reused within that session.
#[derive(Debug, Default)]
pub struct RegionIdGen {
    next: u64,
}

impl RegionIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> RegionId {
        let id = RegionId(self.next);
        self.next += 1;
        id
    }
}

/// A 2D point in the source's native coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive-boundary containment test.
    pub fn contains(&self, p: Point) -> bool {
        self.x <= p.x
            && p.x <= self.x + self.width
            && self.y <= p.y
            && p.y <= self.y + self.height
    }

    /// True if the two rectangles share any area or boundary.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && other.x <= self.x + self.width
            && self.y <= other.y + other.height
            && other.y <= self.y + self.height
    }

    /// Rectangle grown by `pad` on every side.
    pub fn padded(&self, pad: f32) -> Rect {
        Rect {
            x: self.x - pad,
            y: self.y - pad,
            width: self.width + 2.0 * pad,
            height: self.height + 2.0 * pad,
        }
    }

    /// Non-degenerate: strictly positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Font description attached to a region or requested for an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Font family name as declared by the source (or requested by the user).
    pub family: String,

    /// Size in the source's units (points for PDF, pixels for images).
    pub size: f32,

    /// Fill color.
    pub color: Rgb,

    /// Style flags derived from the declared font name.
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            color: Rgb::BLACK,
            bold: false,
            italic: false,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec::new("Helvetica", 12.0)
    }
}

/// One rectangle of text found on a page or image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Stable id for this extraction pass.
    pub id: RegionId,

    /// The literal content.
    pub text: String,

    /// Bounding box in the source's native coordinate space.
    pub bounds: Rect,

    /// Declared (PDF) or estimated (OCR) font.
    pub font: FontSpec,

    /// OCR confidence on a 0-100 scale; `None` for PDF-extracted regions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Which backend a selection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionSource {
    Pdf,
    Photo,
}

impl SelectionSource {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionSource::Pdf => "pdf",
            SelectionSource::Photo => "photo",
        }
    }
}

/// The single active selection: a region id plus its bounds at selection
/// time.
///
/// The anchor bounds survive the id being invalidated by a re-extraction,
/// so the edit engine can still synthesize an erase rectangle from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub region: RegionId,
    pub source: SelectionSource,
    pub anchor: Rect,
    /// Text content at selection time.
    pub text: String,
    /// Font at selection time.
    pub font: FontSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_boundary_inclusive() {
        let r = Rect::new(100.0, 100.0, 50.0, 20.0);
        assert!(r.contains(Point::new(100.0, 100.0)));
        assert!(r.contains(Point::new(150.0, 120.0)));
        assert!(r.contains(Point::new(110.0, 105.0)));
        assert!(!r.contains(Point::new(99.9, 100.0)));
        assert!(!r.contains(Point::new(150.1, 100.0)));
        assert!(!r.contains(Point::new(110.0, 120.1)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0))); // shared edge
        assert!(!a.intersects(&Rect::new(10.1, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rect_padded() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0).padded(5.0);
        assert_eq!(r, Rect::new(5.0, 5.0, 30.0, 15.0));
    }

    #[test]
    fn test_degenerate_rect_is_invalid() {
        assert!(!Rect::new(0.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, 10.0, 0.0).is_valid());
        assert!(Rect::new(0.0, 0.0, 0.1, 0.1).is_valid());
    }
}
