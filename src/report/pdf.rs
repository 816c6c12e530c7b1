//! Minimal PDF 1.4 serializer for report pages.
//!
//! Layout code draws on a [`Canvas`] in millimetres with the origin at the
//! top-left corner, matching how report sections are positioned. The canvas
//! converts to PDF user space (points, bottom-left origin) as it emits
//! content stream operators. Text uses the standard Type 1 Helvetica faces
//! with WinAnsi encoding, so no font data is embedded.
//!
//! Output is a pure function of the drawing calls and [`DocumentInfo`].

use super::fonts::{Font, MM_PER_PT};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

/// Page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);
    pub const BLACK: Color = Color(0, 0, 0);

    fn components(&self) -> String {
        format!(
            "{} {} {}",
            unit(self.0),
            unit(self.1),
            unit(self.2)
        )
    }

    /// Non-stroking (fill and text) color operator.
    pub fn fill_op(&self) -> String {
        format!("{} rg", self.components())
    }

    pub fn stroke_op(&self) -> String {
        format!("{} RG", self.components())
    }
}

fn unit(channel: u8) -> String {
    number(f64::from(channel) / 255.0, 3)
}

/// Formats a number for a content stream: fixed precision, trailing zeros
/// trimmed, never `-0`.
fn number(value: f64, decimals: usize) -> String {
    let mut s = format!("{:.*}", decimals, value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text styling for a single draw call.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub font: Font,
    pub size: f64,
    pub color: Color,
    pub align: Align,
}

impl TextStyle {
    pub fn new(font: Font, size: f64, color: Color) -> Self {
        Self {
            font,
            size,
            color,
            align: Align::Left,
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

// Bezier control distance for quarter circles.
const KAPPA: f64 = 0.552_284_749_8;

/// Accumulates content stream operators for one page.
pub struct Canvas {
    size: PageSize,
    ops: String,
}

impl Canvas {
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            ops: String::new(),
        }
    }

    fn x(&self, mm: f64) -> String {
        number(mm / MM_PER_PT, 2)
    }

    fn y(&self, mm: f64) -> String {
        number((self.size.height - mm) / MM_PER_PT, 2)
    }

    fn len(&self, mm: f64) -> String {
        number(mm / MM_PER_PT, 2)
    }

    fn op(&mut self, line: &str) {
        self.ops.push_str(line);
        self.ops.push('\n');
    }

    /// Filled rectangle; `(x, y)` is the top-left corner.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let line = format!(
            "{} {} {} {} {} re f",
            color.fill_op(),
            self.x(x),
            self.y(y + h),
            self.len(w),
            self.len(h)
        );
        self.op(&line);
    }

    /// Filled rectangle with corners of radius `r`.
    pub fn fill_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64, color: Color) {
        let r = r.min(w / 2.0).min(h / 2.0);
        let k = r * KAPPA;
        let (left, right, top, bottom) = (x, x + w, y, y + h);

        let mut path = color.fill_op();
        let _ = write!(path, "\n{} {} m", self.x(left + r), self.y(top));
        let _ = write!(path, "\n{} {} l", self.x(right - r), self.y(top));
        self.curve(&mut path, (right - r + k, top), (right, top + r - k), (right, top + r));
        let _ = write!(path, "\n{} {} l", self.x(right), self.y(bottom - r));
        self.curve(&mut path, (right, bottom - r + k), (right - r + k, bottom), (right - r, bottom));
        let _ = write!(path, "\n{} {} l", self.x(left + r), self.y(bottom));
        self.curve(&mut path, (left + r - k, bottom), (left, bottom - r + k), (left, bottom - r));
        let _ = write!(path, "\n{} {} l", self.x(left), self.y(top + r));
        self.curve(&mut path, (left, top + r - k), (left + r - k, top), (left + r, top));
        path.push_str("\nh f");
        self.op(&path);
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) {
        let k = r * KAPPA;
        let mut path = color.fill_op();
        let _ = write!(path, "\n{} {} m", self.x(cx + r), self.y(cy));
        self.curve(&mut path, (cx + r, cy + k), (cx + k, cy + r), (cx, cy + r));
        self.curve(&mut path, (cx - k, cy + r), (cx - r, cy + k), (cx - r, cy));
        self.curve(&mut path, (cx - r, cy - k), (cx - k, cy - r), (cx, cy - r));
        self.curve(&mut path, (cx + k, cy - r), (cx + r, cy - k), (cx + r, cy));
        path.push_str("\nh f");
        self.op(&path);
    }

    fn curve(&self, path: &mut String, c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) {
        let _ = write!(
            path,
            "\n{} {} {} {} {} {} c",
            self.x(c1.0),
            self.y(c1.1),
            self.x(c2.0),
            self.y(c2.1),
            self.x(end.0),
            self.y(end.1)
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        let line = format!(
            "{} {} w {} {} m {} {} l S",
            color.stroke_op(),
            self.len(width),
            self.x(x1),
            self.y(y1),
            self.x(x2),
            self.y(y2)
        );
        self.op(&line);
    }

    /// Draws one line of text with its baseline at `y`. `x` is the left edge,
    /// centre or right edge depending on the alignment.
    pub fn text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        let width = style.font.text_width(text, style.size);
        let left = match style.align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let line = format!(
            "BT /{} {} Tf {} {} {} Td ({}) Tj ET",
            style.font.resource_name(),
            number(style.size, 2),
            style.color.fill_op(),
            self.x(left),
            self.y(y),
            escape_text(text)
        );
        self.op(&line);
    }

    /// Draws pre-wrapped lines starting at baseline `y`; returns the baseline
    /// of the last line.
    pub fn text_lines(&mut self, x: f64, y: f64, lines: &[String], leading: f64, style: TextStyle) -> f64 {
        let mut baseline = y;
        for (i, line) in lines.iter().enumerate() {
            baseline = y + leading * i as f64;
            self.text(x, baseline, line, style);
        }
        baseline
    }

    pub fn into_content(self) -> String {
        self.ops
    }
}

/// Escapes a string for a PDF literal, mapping to WinAnsi bytes.
///
/// Characters outside Latin-1 become `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

/// Metadata written to the document information dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    pub created: DateTime<Utc>,
}

/// Serializes pages into a complete PDF file.
pub struct PdfWriter {
    size: PageSize,
    pages: Vec<String>,
}

impl PdfWriter {
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            pages: Vec::new(),
        }
    }

    pub fn add_page(&mut self, canvas: Canvas) {
        self.pages.push(canvas.into_content());
    }

    pub fn finish(self, info: &DocumentInfo) -> Vec<u8> {
        // Object layout: 1 catalog, 2 pages tree, 3..=5 fonts, 6 info,
        // then a (page, content) pair per page.
        const FIRST_PAGE_ID: usize = 7;
        let page_ids: Vec<usize> = (0..self.pages.len())
            .map(|i| FIRST_PAGE_ID + 2 * i)
            .collect();

        let mut objects: Vec<String> = Vec::new();
        objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            self.pages.len()
        ));
        for font in Font::ALL {
            objects.push(format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            ));
        }
        objects.push(format!(
            "<< /Title ({}) /Producer ({}) /CreationDate (D:{}Z) >>",
            escape_text(&info.title),
            escape_text(&info.producer),
            info.created.format("%Y%m%d%H%M%S")
        ));

        let font_resources = Font::ALL
            .iter()
            .enumerate()
            .map(|(i, font)| format!("/{} {} 0 R", font.resource_name(), 3 + i))
            .collect::<Vec<_>>()
            .join(" ");
        let media_box = format!(
            "[0 0 {} {}]",
            number(self.size.width / MM_PER_PT, 2),
            number(self.size.height / MM_PER_PT, 2)
        );
        for (content, page_id) in self.pages.iter().zip(&page_ids) {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox {} /Resources << /Font << {} >> >> /Contents {} 0 R >>",
                media_box,
                font_resources,
                page_id + 1
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ));
        }

        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in &offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}
