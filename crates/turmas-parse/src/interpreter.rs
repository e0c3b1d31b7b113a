//! Content stream interpreter.
//!
//! Walks the decoded operators of one page and records two things: every
//! glyph drawn (with an approximate bounding box) and every axis-aligned
//! ruling segment painted. That is all table detection needs; colours,
//! images and font programs are ignored.
//!
//! Glyph widths are not read from the font. Report fonts are proportional
//! sans-serif faces, so a fixed average advance is close enough for the
//! centre-in-cell test used by lattice detection.

use encoding_rs::WINDOWS_1252;
use lopdf::Object;
use lopdf::content::{Content, Operation};

use crate::error::BackendError;
use crate::geometry::{BBox, Ctm, Edge};

/// Advance of a regular glyph, in text-space units per unit of font size.
const GLYPH_ADVANCE: f64 = 0.5;
/// Advance of a space glyph.
const SPACE_ADVANCE: f64 = 0.278;
/// Share of the font size above the baseline.
const ASCENT: f64 = 0.75;
/// Segments thinner than this are treated as straight rules.
const RULE_TOLERANCE: f64 = 1.0;

/// One rendered character in top-left page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub bbox: BBox,
    pub size: f64,
}

/// Everything the interpreter extracted from a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub width: f64,
    pub height: f64,
    pub glyphs: Vec<Glyph>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    ctm: Ctm,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    h_scaling: f64,
    leading: f64,
    rise: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Ctm::identity(),
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

struct Interpreter {
    page_height: f64,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Ctm,
    line_matrix: Ctm,
    // Device-space (PDF origin) segments of the path under construction.
    segments: Vec<((f64, f64), (f64, f64))>,
    current: Option<(f64, f64)>,
    subpath_start: Option<(f64, f64)>,
    out: PageContent,
}

/// Interpret a page's content stream bytes.
///
/// `media_box` is `[llx, lly, urx, ury]` in PDF user space.
pub fn interpret_page(content: &[u8], media_box: [f64; 4]) -> Result<PageContent, BackendError> {
    let content = Content::decode(content)
        .map_err(|e| BackendError::Interpreter(format!("failed to decode content stream: {e}")))?;

    let [llx, lly, urx, ury] = media_box;
    let mut interp = Interpreter {
        page_height: ury,
        state: GraphicsState::default(),
        stack: Vec::new(),
        text_matrix: Ctm::identity(),
        line_matrix: Ctm::identity(),
        segments: Vec::new(),
        current: None,
        subpath_start: None,
        out: PageContent {
            width: urx - llx,
            height: ury - lly,
            ..PageContent::default()
        },
    };

    for op in &content.operations {
        interp.apply(op);
    }
    Ok(interp.out)
}

impl Interpreter {
    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            // --- Graphics state operators ---
            "q" => self.stack.push(self.state),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = get_matrix(operands) {
                    self.state.ctm = m.concat(&self.state.ctm);
                }
            }

            // --- Text state operators ---
            "BT" => {
                self.text_matrix = Ctm::identity();
                self.line_matrix = Ctm::identity();
            }
            "ET" => {}
            "Tf" => {
                if let Some(size) = get_f64(operands, 1) {
                    self.state.font_size = size;
                }
            }
            "Tm" => {
                if let Some(m) = get_matrix(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "Td" => {
                let tx = get_f64(operands, 0).unwrap_or(0.0);
                let ty = get_f64(operands, 1).unwrap_or(0.0);
                self.move_text_position(tx, ty);
            }
            "TD" => {
                let tx = get_f64(operands, 0).unwrap_or(0.0);
                let ty = get_f64(operands, 1).unwrap_or(0.0);
                self.state.leading = -ty;
                self.move_text_position(tx, ty);
            }
            "T*" => self.move_text_position(0.0, -self.state.leading),
            "TL" => {
                if let Some(v) = get_f64(operands, 0) {
                    self.state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = get_f64(operands, 0) {
                    self.state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = get_f64(operands, 0) {
                    self.state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = get_f64(operands, 0) {
                    self.state.h_scaling = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = get_f64(operands, 0) {
                    self.state.rise = v;
                }
            }

            // --- Text rendering operators ---
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show_text(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show_text(bytes),
                            Object::Integer(_) | Object::Real(_) => {
                                let adjust = item.as_float().map(f64::from).unwrap_or(0.0);
                                let tx = -adjust / 1000.0 * self.state.font_size * self.state.h_scaling;
                                self.text_matrix = Ctm::translation(tx, 0.0).concat(&self.text_matrix);
                            }
                            _ => {}
                        }
                    }
                }
            }
            "'" => {
                self.move_text_position(0.0, -self.state.leading);
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show_text(bytes);
                }
            }
            "\"" => {
                if let Some(aw) = get_f64(operands, 0) {
                    self.state.word_spacing = aw;
                }
                if let Some(ac) = get_f64(operands, 1) {
                    self.state.char_spacing = ac;
                }
                self.move_text_position(0.0, -self.state.leading);
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show_text(bytes);
                }
            }

            // --- Path construction operators ---
            "m" => {
                if let (Some(x), Some(y)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    let p = self.state.ctm.transform_point(x, y);
                    self.current = Some(p);
                    self.subpath_start = Some(p);
                }
            }
            "l" => {
                if let (Some(x), Some(y)) = (get_f64(operands, 0), get_f64(operands, 1)) {
                    let p = self.state.ctm.transform_point(x, y);
                    if let Some(from) = self.current {
                        self.segments.push((from, p));
                    }
                    self.current = Some(p);
                }
            }
            "c" | "v" | "y" => {
                let n = operands.len();
                if n >= 2 {
                    if let (Some(x), Some(y)) = (get_f64(operands, n - 2), get_f64(operands, n - 1)) {
                        self.current = Some(self.state.ctm.transform_point(x, y));
                    }
                }
            }
            "h" => self.close_subpath(),
            "re" => {
                if operands.len() >= 4 {
                    let x = get_f64(operands, 0).unwrap_or(0.0);
                    let y = get_f64(operands, 1).unwrap_or(0.0);
                    let w = get_f64(operands, 2).unwrap_or(0.0);
                    let h = get_f64(operands, 3).unwrap_or(0.0);
                    let ctm = self.state.ctm;
                    let corners = [
                        ctm.transform_point(x, y),
                        ctm.transform_point(x + w, y),
                        ctm.transform_point(x + w, y + h),
                        ctm.transform_point(x, y + h),
                    ];
                    for i in 0..4 {
                        self.segments.push((corners[i], corners[(i + 1) % 4]));
                    }
                    self.current = Some(corners[0]);
                    self.subpath_start = Some(corners[0]);
                }
            }

            // --- Path painting operators ---
            "S" | "f" | "F" | "f*" | "B" | "B*" => self.paint(),
            "s" | "b" | "b*" => {
                self.close_subpath();
                self.paint();
            }
            "n" => self.clear_path(),

            _ => {}
        }
    }

    fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Ctm::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn show_text(&mut self, bytes: &[u8]) {
        let (text, _, _) = WINDOWS_1252.decode(bytes);
        let st = self.state;
        for ch in text.chars() {
            let render = self.text_matrix.concat(&st.ctm);
            let (x, y) = render.transform_point(0.0, st.rise);
            let glyph_advance = if ch == ' ' { SPACE_ADVANCE } else { GLYPH_ADVANCE };
            let width = glyph_advance * st.font_size * st.h_scaling * render.horizontal_scale();
            let height = st.font_size * render.vertical_scale();

            if !ch.is_control() {
                let top = self.page_height - (y + height * ASCENT);
                self.out.glyphs.push(Glyph {
                    ch,
                    bbox: BBox::new(x, top, x + width, top + height),
                    size: height,
                });
            }

            let mut advance = glyph_advance * st.font_size + st.char_spacing;
            if ch == ' ' {
                advance += st.word_spacing;
            }
            self.text_matrix = Ctm::translation(advance * st.h_scaling, 0.0).concat(&self.text_matrix);
        }
    }

    fn close_subpath(&mut self) {
        if let (Some(from), Some(start)) = (self.current, self.subpath_start) {
            if from != start {
                self.segments.push((from, start));
            }
            self.current = Some(start);
        }
    }

    fn paint(&mut self) {
        let height = self.page_height;
        let flip = |(x, y): (f64, f64)| (x, height - y);
        for (a, b) in self.segments.drain(..) {
            if let Some(edge) = Edge::from_segment(flip(a), flip(b), RULE_TOLERANCE) {
                self.out.edges.push(edge);
            }
        }
        self.current = None;
        self.subpath_start = None;
    }

    fn clear_path(&mut self) {
        self.segments.clear();
        self.current = None;
        self.subpath_start = None;
    }
}

// --- Operand extraction helpers ---

fn get_f64(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(|o| match o {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    })
}

fn get_matrix(operands: &[Object]) -> Option<Ctm> {
    if operands.len() < 6 {
        return None;
    }
    Some(Ctm::new(
        get_f64(operands, 0)?,
        get_f64(operands, 1)?,
        get_f64(operands, 2)?,
        get_f64(operands, 3)?,
        get_f64(operands, 4)?,
        get_f64(operands, 5)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;

    const LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

    fn text_of(page: &PageContent) -> String {
        page.glyphs.iter().map(|g| g.ch).collect()
    }

    #[test]
    fn test_interpret_simple_text() {
        let page = interpret_page(b"BT /F1 10 Tf 100 700 Td (Hi) Tj ET", LETTER).unwrap();
        assert_eq!(text_of(&page), "Hi");
        let h = &page.glyphs[0];
        assert!((h.bbox.x0 - 100.0).abs() < 1e-9);
        assert!((h.bbox.width() - 5.0).abs() < 1e-9);
        // baseline at y=700 → 92 from the top; ascent 7.5 above it
        assert!((h.bbox.top - 84.5).abs() < 1e-9);
        assert!((page.glyphs[1].bbox.x0 - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpret_td_is_relative_to_line_start() {
        let page = interpret_page(
            b"BT /F1 10 Tf 100 700 Td (AB) Tj 0 -20 Td (C) Tj ET",
            LETTER,
        )
        .unwrap();
        let c = &page.glyphs[2];
        assert!((c.bbox.x0 - 100.0).abs() < 1e-9);
        assert!((c.bbox.top - 104.5).abs() < 1e-9);
    }

    #[test]
    fn test_interpret_tm_and_t_star() {
        let page = interpret_page(
            b"BT /F1 10 Tf 12 TL 1 0 0 1 50 500 Tm (A) Tj T* (B) Tj ET",
            LETTER,
        )
        .unwrap();
        assert!((page.glyphs[1].bbox.x0 - 50.0).abs() < 1e-9);
        let dy = page.glyphs[1].bbox.top - page.glyphs[0].bbox.top;
        assert!((dy - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpret_tj_array_adjusts_position() {
        let page = interpret_page(b"BT /F1 10 Tf 0 700 Td [(A) -1000 (B)] TJ ET", LETTER).unwrap();
        // A advances 5, the -1000 adjustment adds another 10.
        assert!((page.glyphs[1].bbox.x0 - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpret_ctm_scales_text() {
        let page = interpret_page(
            b"q 2 0 0 2 0 0 cm BT /F1 10 Tf 10 10 Td (A) Tj ET Q BT /F1 10 Tf 10 10 Td (B) Tj ET",
            LETTER,
        )
        .unwrap();
        assert!((page.glyphs[0].bbox.x0 - 20.0).abs() < 1e-9);
        assert!((page.glyphs[0].size - 20.0).abs() < 1e-9);
        assert!((page.glyphs[1].bbox.x0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpret_decodes_winansi() {
        let page = interpret_page(b"BT /F1 10 Tf 0 0 Td (1\xbaIV01-EM Jo\xe3o) Tj ET", LETTER).unwrap();
        assert_eq!(text_of(&page), "1ºIV01-EM João");
    }

    #[test]
    fn test_interpret_stroked_lines() {
        let page = interpret_page(b"1 w 100 700 m 300 700 l S 100 700 m 100 600 l S", LETTER).unwrap();
        assert_eq!(page.edges.len(), 2);
        assert_eq!(page.edges[0].orientation, Orientation::Horizontal);
        assert!((page.edges[0].top - 92.0).abs() < 1e-9);
        assert_eq!(page.edges[1].orientation, Orientation::Vertical);
        assert!((page.edges[1].top - 92.0).abs() < 1e-9);
        assert!((page.edges[1].bottom - 192.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpret_rectangle_yields_four_edges() {
        let page = interpret_page(b"100 600 200 100 re f", LETTER).unwrap();
        assert_eq!(page.edges.len(), 4);
        let horizontals = page
            .edges
            .iter()
            .filter(|e| e.orientation == Orientation::Horizontal)
            .count();
        assert_eq!(horizontals, 2);
    }

    #[test]
    fn test_interpret_n_discards_path() {
        let page = interpret_page(b"0 0 m 100 0 l n", LETTER).unwrap();
        assert!(page.edges.is_empty());
    }

    #[test]
    fn test_interpret_diagonals_are_dropped() {
        let page = interpret_page(b"0 0 m 100 100 l S", LETTER).unwrap();
        assert!(page.edges.is_empty());
    }

    #[test]
    fn test_interpret_reports_page_size() {
        let page = interpret_page(b"", [0.0, 0.0, 595.0, 842.0]).unwrap();
        assert_eq!(page.width, 595.0);
        assert_eq!(page.height, 842.0);
    }
}
