//! Font resolution for both backends.
//!
//! The PDF backend maps requested families onto the built-in standard-14
//! set; the photo backend probes platform font directories for TrueType
//! files and rasterizes with `ab_glyph`. Either way, substitution is a
//! reported outcome ([`FontResolution`]), never silent.

mod bitmap;

use std::path::PathBuf;

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use serde::Serialize;
use tracing::debug;

use crate::models::region::FontSpec;

/// Outcome of resolving a requested font family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum FontResolution {
    /// The requested family was available.
    Exact { family: String },

    /// The requested family was unavailable and a substitute was used.
    Fallback { requested: String, substituted: String },
}

impl FontResolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FontResolution::Fallback { .. })
    }

    /// The family actually used.
    pub fn effective(&self) -> &str {
        match self {
            FontResolution::Exact { family } => family,
            FontResolution::Fallback { substituted, .. } => substituted,
        }
    }
}

/// Map a requested family plus style flags onto a standard-14 base font
/// name. Returns the name and whether the family itself matched.
pub(crate) fn standard_base_font(spec: &FontSpec) -> (&'static str, bool) {
    let family = spec.family.to_lowercase();

    let styled = |roman: &'static str,
                  bold: &'static str,
                  italic: &'static str,
                  bold_italic: &'static str| match (spec.bold, spec.italic) {
        (true, true) => bold_italic,
        (true, false) => bold,
        (false, true) => italic,
        (false, false) => roman,
    };

    if family.contains("times") || family.contains("serif") {
        let name = styled("Times-Roman", "Times-Bold", "Times-Italic", "Times-BoldItalic");
        (name, true)
    } else if family.contains("courier") || family.contains("mono") {
        let name = styled(
            "Courier",
            "Courier-Bold",
            "Courier-Oblique",
            "Courier-BoldOblique",
        );
        (name, true)
    } else if family.contains("helvetica") || family.contains("arial") || family.contains("sans") {
        let name = styled(
            "Helvetica",
            "Helvetica-Bold",
            "Helvetica-Oblique",
            "Helvetica-BoldOblique",
        );
        (name, true)
    } else if family.contains("symbol") {
        ("Symbol", true)
    } else if family.contains("zapf") || family.contains("dingbat") {
        ("ZapfDingbats", true)
    } else {
        // Unknown family: substitute the default sans face, keeping the
        // requested weight and slant.
        let name = styled(
            "Helvetica",
            "Helvetica-Bold",
            "Helvetica-Oblique",
            "Helvetica-BoldOblique",
        );
        (name, false)
    }
}

/// A font usable for raster drawing: a loaded TrueType face, or the
/// built-in bitmap face when none could be found.
pub enum RasterFont {
    Outline(FontVec),
    Bitmap,
}

impl RasterFont {
    /// Pixel size of `text` at `size`.
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        match self {
            RasterFont::Outline(font) => {
                let (w, h) = imageproc::drawing::text_size(PxScale::from(size), font, text);
                // Measured height collapses on whitespace-only text; keep
                // the nominal line height so patches stay non-degenerate.
                ((w as u32).max(1), (h as u32).max(size.round() as u32).max(1))
            }
            RasterFont::Bitmap => bitmap::measure(text),
        }
    }

    /// Draw `text` with its top-left corner at (x, y).
    ///
    /// The bitmap face ignores `size` and `color`.
    pub fn draw(&self, image: &mut RgbaImage, x: i32, y: i32, size: f32, color: Rgba<u8>, text: &str) {
        match self {
            RasterFont::Outline(font) => {
                imageproc::drawing::draw_text_mut(image, color, x, y, PxScale::from(size), font, text);
            }
            RasterFont::Bitmap => bitmap::draw(image, x, y, text),
        }
    }
}

/// Resolves font families to TrueType files by probing the platform font
/// directory and any configured extras.
pub struct FontResolver {
    search_dirs: Vec<PathBuf>,
}

impl FontResolver {
    /// Resolver probing the platform default directory.
    pub fn new() -> Self {
        Self {
            search_dirs: vec![platform_font_dir()],
        }
    }

    /// Add extra directories, tried after the platform defaults.
    pub fn with_extra_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.search_dirs.extend(dirs);
        self
    }

    /// Resolve `family` to a raster font.
    ///
    /// Probes `<dir>/<family>.ttf` (and the lowercased variant) in each
    /// search directory; falls back to the built-in bitmap face.
    pub fn resolve(&self, family: &str) -> (RasterFont, FontResolution) {
        for dir in &self.search_dirs {
            for candidate in [
                dir.join(format!("{family}.ttf")),
                dir.join(format!("{}.ttf", family.to_lowercase())),
            ] {
                if !candidate.exists() {
                    continue;
                }
                match std::fs::read(&candidate).ok().and_then(|bytes| FontVec::try_from_vec(bytes).ok()) {
                    Some(font) => {
                        debug!("resolved font {} from {}", family, candidate.display());
                        return (
                            RasterFont::Outline(font),
                            FontResolution::Exact { family: family.to_string() },
                        );
                    }
                    None => {
                        debug!("unreadable font file {}", candidate.display());
                    }
                }
            }
        }

        debug!("font {} not found, using built-in bitmap face", family);
        (
            RasterFont::Bitmap,
            FontResolution::Fallback {
                requested: family.to_string(),
                substituted: "built-in bitmap".to_string(),
            },
        )
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_font_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from("C:/Windows/Fonts")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/Library/Fonts")
    } else {
        PathBuf::from("/usr/share/fonts/truetype")
    }
}
