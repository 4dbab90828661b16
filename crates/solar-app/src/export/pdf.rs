//! PDF export: a text section per rooftop on Letter pages

use printpdf::{BuiltinFont, Mm, PdfDocument};
use solar_types::{BatchResults, Error, ExportFormat, Result, RooftopResult};
use std::path::Path;

use crate::report::result_fields;

const PAGE_WIDTH_PT: f32 = 612.0;
const PAGE_HEIGHT_PT: f32 = 792.0;
const TOP_PT: f32 = 750.0;
const BOTTOM_MARGIN_PT: f32 = 50.0;
const LEFT_PT: f32 = 50.0;
const INDENT_PT: f32 = 60.0;
const LINE_PT: f32 = 15.0;
const HEADING_PT: f32 = 20.0;
const FONT_SIZE: f32 = 12.0;

const MAX_VALUE_CHARS: usize = 100;
const MAX_RECOMMENDATION_CHARS: usize = 80;

/// One positioned line of text, in points from the bottom-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn shorten_recommendation(text: &str) -> String {
    if text.chars().count() > MAX_RECOMMENDATION_CHARS {
        format!("{}...", truncate(text, MAX_RECOMMENDATION_CHARS))
    } else {
        text.to_string()
    }
}

/// Builtin Helvetica only covers WinAnsi
fn pdf_safe(text: &str) -> String {
    text.replace('₹', "INR ").replace('²', "2")
}

struct Cursor {
    pages: Vec<Vec<PdfLine>>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: TOP_PT,
        }
    }

    fn draw(&mut self, x: f32, text: String) {
        if let Some(page) = self.pages.last_mut() {
            page.push(PdfLine {
                x,
                y: self.y,
                text: pdf_safe(&text),
            });
        }
    }

    /// Move down, starting a new page below the bottom margin
    fn advance(&mut self, amount: f32) {
        self.y -= amount;
        if self.y < BOTTOM_MARGIN_PT {
            self.pages.push(Vec::new());
            self.y = TOP_PT;
        }
    }
}

fn layout_result(cursor: &mut Cursor, result: &RooftopResult) {
    cursor.draw(LEFT_PT, format!("Rooftop {} Analysis", result.rooftop_id));
    cursor.advance(HEADING_PT);

    for (key, value) in result_fields(result) {
        cursor.draw(
            LEFT_PT,
            format!("{}: {}", key, truncate(&value, MAX_VALUE_CHARS)),
        );
        cursor.advance(LINE_PT);
    }

    cursor.draw(LEFT_PT, "Recommendations:".to_string());
    cursor.advance(LINE_PT);
    for rec in &result.recommendations {
        cursor.draw(INDENT_PT, format!("- {}", shorten_recommendation(rec)));
        cursor.advance(LINE_PT);
    }
    cursor.advance(HEADING_PT);
}

/// Lines of every page, in drawing order
pub fn layout_pages(results: &BatchResults) -> Vec<Vec<PdfLine>> {
    let mut cursor = Cursor::new();
    for result in &results.results {
        layout_result(&mut cursor, result);
    }

    let mut pages = cursor.pages;
    if pages.len() > 1 && pages.last().is_some_and(|p| p.is_empty()) {
        pages.pop();
    }
    pages
}

fn pt(value: f32) -> Mm {
    Mm(value * 25.4 / 72.0)
}

/// Render batch results to PDF bytes
pub fn render_pdf(results: &BatchResults) -> Result<Vec<u8>> {
    let pdf_err = |e: printpdf::Error| Error::export(ExportFormat::Pdf, e);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Solar Rooftop Analysis",
        pt(PAGE_WIDTH_PT),
        pt(PAGE_HEIGHT_PT),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;

    for (index, lines) in layout_pages(results).into_iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(pt(PAGE_WIDTH_PT), pt(PAGE_HEIGHT_PT), "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);
        for line in lines {
            layer.use_text(line.text, FONT_SIZE, pt(line.x), pt(line.y), &font);
        }
    }

    doc.save_to_bytes().map_err(pdf_err)
}

/// Export batch results to a PDF file
pub fn export_to_pdf(results: &BatchResults, output_path: &Path) -> Result<()> {
    let bytes = render_pdf(results)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}
