//! Content-stream text scanning over lopdf.
//!
//! Walks a page's decoded content stream tracking the text matrix, active
//! font and fill color, and emits one raw span per text-showing operator.
//! Coordinates are reported with a top-left origin (flipped using the page
//! height), which is the space the rest of the library works in.
//!
//! Text space is taken as user space: the graphics CTM (`cm`) is not
//! tracked. Glyph widths are estimated from the font size, not per-glyph
//! metrics, so span widths are approximate but consistent with the widths
//! the insert path produces.

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::Result;
use crate::error::PdfError;
use crate::models::region::{Rect, Rgb};

/// Estimated glyph advance as a fraction of the font size.
pub(crate) const GLYPH_ADVANCE_EM: f32 = 0.5;

/// Distance from the top of a span's box down to its baseline, as a
/// fraction of the font size.
pub(crate) const ASCENT_EM: f32 = 0.8;

/// Span box height as a fraction of the font size.
pub(crate) const LINE_HEIGHT_EM: f32 = 1.2;

/// One text-showing operation with its estimated geometry.
#[derive(Debug, Clone)]
pub(crate) struct RawSpan {
    pub text: String,
    /// Top-left-origin bounds in page points.
    pub bounds: Rect,
    pub family: String,
    pub size: f32,
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
    /// Index of the showing operation in the page's operation list.
    pub op_index: usize,
}

/// 2x3 affine matrix in PDF order (a b c d e f).
type Mat = [f32; 6];

const IDENTITY: Mat = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn mat_mul(m: Mat, n: Mat) -> Mat {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translate(tx: f32, ty: f32) -> Mat {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

fn num(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Active text state while walking a content stream.
struct TextState {
    family: String,
    size: f32,
    bold: bool,
    italic: bool,
    leading: f32,
    tm: Mat,
    tlm: Mat,
}

impl TextState {
    fn new() -> Self {
        Self {
            family: "Helvetica".to_string(),
            size: 12.0,
            bold: false,
            italic: false,
            leading: 0.0,
            tm: IDENTITY,
            tlm: IDENTITY,
        }
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.tlm = mat_mul(translate(tx, ty), self.tlm);
        self.tm = self.tlm;
    }
}

/// Decode a PDF string as single-byte text (WinAnsi approximated as
/// Latin-1). Multi-byte CID text is not interpreted.
fn decode_pdf_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Map text to the single-byte form `decode_pdf_string` inverts.
pub(crate) fn encode_pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}

/// Strip a `ABCDEF+` subset prefix from a base font name.
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((prefix, rest)) if prefix.len() == 6 && !rest.is_empty() => rest,
        _ => name,
    }
}

/// Resolve a `Tf` resource name to (family, bold, italic) through the
/// page's font dictionary.
fn resolve_font(doc: &Document, fonts: Option<&Dictionary>, resource: &[u8]) -> (String, bool, bool) {
    let base = fonts
        .and_then(|dict| dict.get(resource).ok())
        .and_then(|obj| doc.dereference(obj).ok())
        .and_then(|(_, obj)| obj.as_dict().ok())
        .and_then(|dict| dict.get(b"BaseFont").ok())
        .and_then(|obj| obj.as_name().ok())
        .map(|name| String::from_utf8_lossy(name).to_string());

    match base {
        Some(name) => {
            let family = strip_subset_prefix(&name).to_string();
            let bold = family.contains("Bold");
            let italic = family.contains("Italic") || family.contains("Oblique");
            (family, bold, italic)
        }
        None => ("Helvetica".to_string(), false, false),
    }
}

/// Walk a page's content stream and return every text-showing operation
/// with its estimated bounds.
pub(crate) fn scan_spans(
    doc: &Document,
    page_id: ObjectId,
    fonts: Option<&Dictionary>,
    page_height: f32,
) -> Result<Vec<RawSpan>> {
    let data = doc
        .get_page_content(page_id)
        .map_err(|e| PdfError::Content(e.to_string()))?;
    let content = Content::decode(&data).map_err(|e| PdfError::Content(e.to_string()))?;

    let mut state = TextState::new();
    let mut color = Rgb::BLACK;
    let mut spans = Vec::new();

    for (op_index, op) in content.operations.iter().enumerate() {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                state.tm = IDENTITY;
                state.tlm = IDENTITY;
            }
            "Tf" => {
                if let (Some(name), Some(size)) = (
                    operands.first().and_then(|o| o.as_name().ok()),
                    operands.get(1).and_then(num),
                ) {
                    let (family, bold, italic) = resolve_font(doc, fonts, name);
                    state.family = family;
                    state.bold = bold;
                    state.italic = italic;
                    state.size = size;
                }
            }
            "TL" => {
                if let Some(l) = operands.first().and_then(num) {
                    state.leading = l;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) =
                    (operands.first().and_then(num), operands.get(1).and_then(num))
                {
                    state.next_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) =
                    (operands.first().and_then(num), operands.get(1).and_then(num))
                {
                    state.leading = -ty;
                    state.next_line(tx, ty);
                }
            }
            "Tm" => {
                let values: Vec<f32> = operands.iter().filter_map(num).collect();
                if values.len() == 6 {
                    state.tlm = [values[0], values[1], values[2], values[3], values[4], values[5]];
                    state.tm = state.tlm;
                }
            }
            "T*" => {
                let leading = state.leading;
                state.next_line(0.0, -leading);
            }
            "Tj" | "'" | "\"" => {
                if op.operator != "Tj" {
                    let leading = state.leading;
                    state.next_line(0.0, -leading);
                }
                // `"` carries (aw, ac, string); Tj and ' carry (string).
                let text = operands
                    .iter()
                    .rev()
                    .find_map(|o| match o {
                        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
                        _ => None,
                    })
                    .unwrap_or_default();
                let advance = show_text(&mut state, &text, color, page_height, op_index, &mut spans);
                state.tm = mat_mul(translate(advance, 0.0), state.tm);
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let mut text = String::new();
                    let mut kerning = 0.0f32;
                    for item in items {
                        match item {
                            Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes)),
                            other => {
                                if let Some(adjust) = num(other) {
                                    kerning -= adjust / 1000.0 * state.size;
                                }
                            }
                        }
                    }
                    let advance =
                        show_text(&mut state, &text, color, page_height, op_index, &mut spans);
                    state.tm = mat_mul(translate(advance + kerning, 0.0), state.tm);
                }
            }
            "rg" => {
                let values: Vec<f32> = operands.iter().filter_map(num).collect();
                if values.len() == 3 {
                    color = Rgb(
                        (values[0] * 255.0).round() as u8,
                        (values[1] * 255.0).round() as u8,
                        (values[2] * 255.0).round() as u8,
                    );
                }
            }
            "g" => {
                if let Some(gray) = operands.first().and_then(num) {
                    let v = (gray * 255.0).round() as u8;
                    color = Rgb(v, v, v);
                }
            }
            "k" => {
                let values: Vec<f32> = operands.iter().filter_map(num).collect();
                if values.len() == 4 {
                    let to_channel = |c: f32| ((1.0 - (c + values[3]).min(1.0)) * 255.0).round() as u8;
                    color = Rgb(to_channel(values[0]), to_channel(values[1]), to_channel(values[2]));
                }
            }
            _ => {}
        }
    }

    trace!("scanned {} spans from page content", spans.len());
    Ok(spans)
}

/// Record a span for shown text and return its estimated advance.
fn show_text(
    state: &mut TextState,
    text: &str,
    color: Rgb,
    page_height: f32,
    op_index: usize,
    spans: &mut Vec<RawSpan>,
) -> f32 {
    // Vertical scale of the text matrix carries the effective size.
    let size = state.size * state.tm[3].abs().max(f32::EPSILON);
    let advance = text.chars().count() as f32 * GLYPH_ADVANCE_EM * size;

    if !text.trim().is_empty() {
        let baseline_td = page_height - state.tm[5];
        spans.push(RawSpan {
            text: text.to_string(),
            bounds: Rect::new(
                state.tm[4],
                baseline_td - ASCENT_EM * size,
                advance,
                LINE_HEIGHT_EM * size,
            ),
            family: state.family.clone(),
            size,
            color,
            bold: state.bold,
            italic: state.italic,
            op_index,
        });
    }
    advance
}

/// Rewrite a page's content, dropping the text-showing operations listed in
/// `drop_ops`. `'` and `"` carry a line advance, so they are replaced with
/// the equivalent `T*` instead of being removed outright.
pub(crate) fn strip_operations(
    doc: &Document,
    page_id: ObjectId,
    drop_ops: &[usize],
) -> Result<Content> {
    let data = doc
        .get_page_content(page_id)
        .map_err(|e| PdfError::Content(e.to_string()))?;
    let content = Content::decode(&data).map_err(|e| PdfError::Content(e.to_string()))?;

    let mut operations = Vec::with_capacity(content.operations.len());
    for (index, op) in content.operations.into_iter().enumerate() {
        if drop_ops.contains(&index) {
            if op.operator == "'" || op.operator == "\"" {
                operations.push(lopdf::content::Operation::new("T*", vec![]));
            }
            continue;
        }
        operations.push(op);
    }

    debug!("dropped {} text operations from page content", drop_ops.len());
    Ok(Content { operations })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mat_mul_translation_composes() {
        let m = mat_mul(translate(10.0, 5.0), translate(1.0, 2.0));
        assert_eq!(m[4], 11.0);
        assert_eq!(m[5], 7.0);
    }

    #[test]
    fn test_strip_subset_prefix() {
        assert_eq!(strip_subset_prefix("ABCDEF+Arial-Bold"), "Arial-Bold");
        assert_eq!(strip_subset_prefix("Helvetica"), "Helvetica");
        // Only a six-character prefix is a subset tag.
        assert_eq!(strip_subset_prefix("AB+Fnt"), "AB+Fnt");
    }

    #[test]
    fn test_pdf_text_round_trip() {
        let encoded = encode_pdf_text("Caf\u{e9} \u{2014}");
        assert_eq!(decode_pdf_string(&encoded), "Caf\u{e9} ?");
    }
}
