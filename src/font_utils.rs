use lopdf::{content::Content, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;

use crate::config::OutlineConfig;
use crate::error::{ExtractionError, Result};

/// Average glyph advance as a fraction of the font size, used to estimate widths.
const AVG_GLYPH_WIDTH: f64 = 0.5;
/// TJ offsets (thousandths of an em) more negative than this read as a word break.
const TJ_SPACE_THRESHOLD: f64 = -250.0;
/// Size assigned to runs from the plain-text fallback, which carries no font data.
const FALLBACK_FONT_SIZE: f64 = 12.0;
const FALLBACK_LINE_HEIGHT: f64 = FALLBACK_FONT_SIZE * 1.2;
const IDENTITY_MATRIX: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// One span of text sharing a font, size and baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// 1-indexed page number
    pub page: usize,
    pub font_size: f64,
    pub font_name: String,
    pub is_bold: bool,
    pub bbox: BBox,
    /// Position in the full extraction order of the document
    pub order_index: usize,
}

impl TextRun {
    pub fn new(text: impl Into<String>, page: usize, font_size: f64, is_bold: bool, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            font_name: String::new(),
            is_bold,
            bbox,
            order_index: 0,
        }
    }
}

/// Vertical extent of a page's MediaBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub bottom: f64,
    pub top: f64,
}

impl PageGeometry {
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        // US Letter
        Self { bottom: 0.0, top: 792.0 }
    }
}

/// Everything the pipeline needs from one PDF.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub runs: Vec<TextRun>,
    /// Indexed by page number minus one
    pub pages: Vec<PageGeometry>,
    pub metadata_title: Option<String>,
}

impl ExtractedDocument {
    pub fn page_geometry(&self, page: usize) -> PageGeometry {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx))
            .copied()
            .unwrap_or_default()
    }
}

/// Extract text runs with their font size, style and position from a PDF.
pub fn collect_runs(bytes: &[u8], config: &OutlineConfig) -> Result<ExtractedDocument> {
    let doc = Document::load_mem(bytes)?;
    let encrypted = doc.trailer.get(b"Encrypt").is_ok();
    let metadata_title = extract_metadata_title(&doc);

    let page_ids = doc.get_pages();
    if page_ids.len() > config.max_pages {
        log::warn!(
            "Document has {} pages, only the first {} are analysed",
            page_ids.len(),
            config.max_pages
        );
    }

    let mut runs = Vec::new();
    let mut pages = Vec::new();
    for (page_idx, (_, &page_id)) in page_ids.iter().enumerate().take(config.max_pages) {
        let current_page = page_idx + 1;
        pages.push(page_geometry(&doc, page_id));

        match extract_page_runs(&doc, page_id, current_page) {
            Ok(page_runs) => runs.extend(page_runs),
            Err(e) => log::warn!("Could not extract text from page {}: {}", current_page, e),
        }
    }

    if runs.is_empty() {
        if encrypted {
            return Err(ExtractionError::Encrypted);
        }
        runs = fallback_runs(bytes, &pages, config.max_pages);
    }

    for (idx, run) in runs.iter_mut().enumerate() {
        run.order_index = idx;
    }

    Ok(ExtractedDocument {
        runs,
        pages,
        metadata_title,
    })
}

#[derive(Debug, Clone)]
struct TextState {
    text_matrix: [f64; 6],
    line_matrix: [f64; 6],
    leading: f64,
    font_size: f64,
    font_name: String,
    is_bold: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            leading: 0.0,
            font_size: 12.0,
            font_name: String::new(),
            is_bold: false,
        }
    }
}

impl TextState {
    fn translate_line(&mut self, tx: f64, ty: f64) {
        let m = self.line_matrix;
        self.line_matrix[4] = tx * m[0] + ty * m[2] + m[4];
        self.line_matrix[5] = tx * m[1] + ty * m[3] + m[5];
        self.text_matrix = self.line_matrix;
    }

    /// Font size after the text matrix's vertical scale.
    fn effective_size(&self) -> f64 {
        let scale = self.text_matrix[2].hypot(self.text_matrix[3]);
        if scale > 0.0 {
            self.font_size.abs() * scale
        } else {
            self.font_size.abs()
        }
    }

    fn advance(&mut self, chars: usize) {
        let width = chars as f64 * self.font_size * AVG_GLYPH_WIDTH;
        self.text_matrix[4] += width * self.text_matrix[0];
        self.text_matrix[5] += width * self.text_matrix[1];
    }
}

/// Accumulates show operations into runs, merging pieces of the same line.
struct RunBuilder {
    page: usize,
    runs: Vec<TextRun>,
}

impl RunBuilder {
    fn new(page: usize) -> Self {
        Self { page, runs: Vec::new() }
    }

    fn show(&mut self, text: String, state: &mut TextState) {
        let chars = text.chars().count();
        let size = state.effective_size();
        let x0 = state.text_matrix[4];
        let y = state.text_matrix[5];
        let x1 = x0 + chars as f64 * size * AVG_GLYPH_WIDTH;
        state.advance(chars);

        if text.is_empty() || size <= 0.0 {
            return;
        }

        if let Some(last) = self.runs.last_mut() {
            let same_line = (last.bbox.y0 - y).abs() < size * 0.2;
            let same_font = (last.font_size - size).abs() < 0.05
                && last.font_name == state.font_name
                && last.is_bold == state.is_bold;
            if same_line && same_font {
                let gap = x0 - last.bbox.x1;
                let needs_space = gap > size * 0.1
                    && !last.text.ends_with(char::is_whitespace)
                    && !text.starts_with(char::is_whitespace);
                if needs_space {
                    last.text.push(' ');
                }
                last.text.push_str(&text);
                last.bbox.x1 = last.bbox.x1.max(x1);
                return;
            }
        }

        self.runs.push(TextRun {
            text,
            page: self.page,
            font_size: size,
            font_name: state.font_name.clone(),
            is_bold: state.is_bold,
            bbox: BBox {
                x0,
                y0: y,
                x1,
                y1: y + size,
            },
            order_index: 0,
        });
    }

    fn finish(self) -> Vec<TextRun> {
        self.runs
            .into_iter()
            .filter(|run| !run.text.trim().is_empty())
            .collect()
    }
}

fn extract_page_runs(doc: &Document, page_id: ObjectId, page: usize) -> Result<Vec<TextRun>> {
    let content_data = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_data)?;
    let fonts = page_base_fonts(doc, page_id);

    let mut state = TextState::default();
    let mut builder = RunBuilder::new(page);

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "Tf" => {
                // "Tf" has operands: font-name, font-size
                if op.operands.len() == 2 {
                    if let Object::Name(name) = &op.operands[0] {
                        let resource = String::from_utf8_lossy(name).to_string();
                        let base_font = fonts.get(name.as_slice()).cloned();
                        state.is_bold = font_is_bold(base_font.as_deref().unwrap_or(&resource));
                        state.font_name = base_font.unwrap_or(resource);
                    }
                    if let Some(size) = number(&op.operands[1]) {
                        state.font_size = size;
                    }
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let mut matrix = IDENTITY_MATRIX;
                    for (slot, operand) in matrix.iter_mut().zip(&op.operands) {
                        if let Some(v) = number(operand) {
                            *slot = v;
                        }
                    }
                    state.text_matrix = matrix;
                    state.line_matrix = matrix;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = number(&op.operands[0]).unwrap_or(0.0);
                    let ty = number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.translate_line(tx, ty);
                }
            }
            "TL" => {
                if let Some(v) = op.operands.first().and_then(number) {
                    state.leading = v;
                }
            }
            "T*" => {
                state.translate_line(0.0, -state.leading);
            }
            "Tj" => {
                if let Some(text) = op.operands.first().and_then(string_operand) {
                    builder.show(text, &mut state);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(text) = op.operands.first().and_then(string_operand) {
                    builder.show(text, &mut state);
                }
            }
            "\"" => {
                state.translate_line(0.0, -state.leading);
                if let Some(text) = op.operands.get(2).and_then(string_operand) {
                    builder.show(text, &mut state);
                }
            }
            "TJ" => {
                // Array of strings and kerning offsets
                if let Some(Object::Array(items)) = op.operands.first() {
                    let mut combined = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => combined.push_str(&decode_pdf_string(bytes)),
                            other => {
                                let is_gap = number(other).is_some_and(|n| n < TJ_SPACE_THRESHOLD);
                                if is_gap && !combined.is_empty() && !combined.ends_with(' ') {
                                    combined.push(' ');
                                }
                            }
                        }
                    }
                    builder.show(combined, &mut state);
                }
            }
            _ => {}
        }
    }

    Ok(builder.finish())
}

/// Plain-text extraction for documents whose content streams yield nothing.
///
/// pdf-extract knows nothing about font sizes, so every line gets the same
/// size and heading detection falls back to numbering and keyword patterns.
fn fallback_runs(bytes: &[u8], pages: &[PageGeometry], max_pages: usize) -> Vec<TextRun> {
    let extracted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));
    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            log::warn!("Fallback text extraction failed: {}", e);
            return Vec::new();
        }
        Err(_) => {
            log::warn!("Fallback text extraction aborted on a malformed document");
            return Vec::new();
        }
    };

    if text.trim().is_empty() {
        return Vec::new();
    }
    log::warn!("Content streams yielded no text runs, using plain-text fallback");

    let page_texts: Vec<&str> = if text.contains('\x0C') {
        text.split('\x0C').collect()
    } else {
        text.split("\n\n\n").collect()
    };

    let mut runs = Vec::new();
    for (page_idx, page_text) in page_texts.iter().enumerate().take(max_pages) {
        let current_page = page_idx + 1;
        let geometry = pages.get(page_idx).copied().unwrap_or_default();
        let lines = page_text.lines().map(str::trim).filter(|l| !l.is_empty());

        for (line_idx, line) in lines.enumerate() {
            let y0 = (geometry.top - (line_idx + 1) as f64 * FALLBACK_LINE_HEIGHT).max(geometry.bottom);
            let width = line.chars().count() as f64 * FALLBACK_FONT_SIZE * AVG_GLYPH_WIDTH;
            runs.push(TextRun::new(
                line,
                current_page,
                FALLBACK_FONT_SIZE,
                false,
                BBox {
                    x0: 0.0,
                    y0,
                    x1: width,
                    y1: y0 + FALLBACK_FONT_SIZE,
                },
            ));
        }
    }
    runs
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Real(r) => Some(*r as f64),
        Object::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn string_operand(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF string: UTF-16BE (with or without BOM), else UTF-8, else Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    let utf16 = if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        Some(&bytes[2..])
    } else if bytes.len() >= 2 && bytes.len() % 2 == 0 && bytes.iter().step_by(2).all(|&b| b == 0) {
        Some(bytes)
    } else {
        None
    };

    let decoded = match utf16 {
        Some(data) => {
            let units: Vec<u16> = data
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        },
    };

    decoded
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}

// Analyze font weight based on font name
fn font_is_bold(font_name: &str) -> bool {
    let font_lower = font_name.to_lowercase();

    font_lower.contains("bold")
        || font_lower.contains("black")
        || font_lower.contains("heavy")
        || font_lower.contains("semibold")
        || font_lower.contains("demi")
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// Look up a page attribute, following `/Parent` for inheritable entries.
fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = page_id;
    for _ in 0..32 {
        let dict = doc.get_dictionary(node).ok()?;
        if let Ok(obj) = dict.get(key) {
            return Some(obj);
        }
        node = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
    None
}

fn page_geometry(doc: &Document, page_id: ObjectId) -> PageGeometry {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox").and_then(|obj| resolve(doc, obj));
    if let Some(Object::Array(values)) = media_box {
        let coords: Vec<f64> = values.iter().filter_map(number).collect();
        if coords.len() >= 4 {
            let geometry = PageGeometry {
                bottom: coords[1].min(coords[3]),
                top: coords[1].max(coords[3]),
            };
            if geometry.height() > 0.0 {
                return geometry;
            }
        }
    }
    PageGeometry::default()
}

/// Map font resource names (`F1`) to their base font names (`Helvetica-Bold`).
fn page_base_fonts(doc: &Document, page_id: ObjectId) -> BTreeMap<Vec<u8>, String> {
    let mut fonts = BTreeMap::new();
    let font_dict = inherited_attribute(doc, page_id, b"Resources")
        .and_then(|obj| resolve_dict(doc, obj))
        .and_then(|resources| resources.get(b"Font").ok())
        .and_then(|obj| resolve_dict(doc, obj));

    if let Some(font_dict) = font_dict {
        for (name, font_obj) in font_dict.iter() {
            let base_font = resolve_dict(doc, font_obj)
                .and_then(|font| font.get(b"BaseFont").ok())
                .and_then(|obj| match obj {
                    Object::Name(base) => Some(String::from_utf8_lossy(base).to_string()),
                    _ => None,
                });
            if let Some(base_font) = base_font {
                // Drop the subset tag in names like "ABCDEF+Arial-Bold"
                let base_font = match base_font.split_once('+') {
                    Some((tag, rest)) if tag.len() == 6 => rest.to_string(),
                    _ => base_font.clone(),
                };
                fonts.insert(name.clone(), base_font);
            }
        }
    }
    fonts
}

fn extract_metadata_title(doc: &Document) -> Option<String> {
    let info = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| resolve_dict(doc, obj))?;
    match resolve(doc, info.get(b"Title").ok()?)? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}
