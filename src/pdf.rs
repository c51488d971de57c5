//! PDF renderers for the shared document model.
//!
//! Two variants of one [`RenderPdf`] capability exist, selected at
//! construction time rather than through an exception-driven branch:
//!
//! - [`StyledPdfRenderer`] renders the full layout with `genpdf`: serif
//!   family, accent-colored headings, a page frame drawn 1.5 cm from the
//!   page edge, and a centered page-number footer.  It needs the bundled
//!   font files (see [`crate::fonts`]).
//! - [`SimplifiedPdfRenderer`] renders text content and section order only,
//!   using `printpdf` built-in fonts.  It needs no external assets and never
//!   fails for a structurally valid model.
//!
//! [`PdfRenderer::select`] picks the styled variant when fonts are present;
//! [`PdfRenderer::render_with_fallback`] additionally recovers a styled
//! failure by re-rendering through the simplified variant.

use genpdf::elements::{Break, FrameCellDecorator, Image, LinearLayout, PageBreak, Paragraph, TableLayout};
use genpdf::error::Error as GenpdfError;
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position, Scale};
use image::GenericImageView;
use log::{debug, warn};
use printpdf::{BuiltinFont, IndirectFontRef, PdfDocument, PdfDocumentReference, PdfLayerReference};
use thiserror::Error;

use crate::fonts;
use crate::model::{DocumentModel, NewsletterConfig, Record, Section, SectionKind};

const ACCENT_COLOR: Color = Color::Rgb(31, 56, 100);
const FRAME_COLOR: Color = Color::Rgb(31, 56, 100);
const BODY_SIZE_PT: u8 = 12;
const HEADING_SIZE_PT: u8 = 11;

/// Distance between the page edge and the drawn page frame.
const FRAME_OFFSET_MM: f64 = 15.0;
const CONTENT_MARGIN_MM: f64 = 20.0;
const FOOTER_HEIGHT_MM: f64 = 10.0;
const HEADER_SPACING_MM: f64 = 2.0;

const EVENT_IMAGE_WIDTH_MM: f64 = 70.0;
const LOGO_WIDTH_MM: f64 = 60.0;
const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// Failure of a PDF rendering variant.
#[derive(Debug, Error)]
pub enum PdfRenderError {
    /// The styled engine cannot start, typically because fonts are missing.
    #[error("styled PDF engine unavailable: {0}")]
    EngineUnavailable(String),
    /// The styled engine failed while rendering.
    #[error("styled PDF rendering failed: {0}")]
    Styled(#[from] GenpdfError),
    /// The simplified engine failed; this indicates a writer-level problem.
    #[error("simplified PDF rendering failed: {0}")]
    Simplified(String),
}

/// Fidelity level of a produced PDF.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PdfFidelity {
    /// Full layout: fonts, colors, frame, page numbers.
    Styled,
    /// Text content and section order only.
    Simplified,
}

/// Capability shared by both PDF rendering variants.
pub trait RenderPdf {
    /// Renders the model to a PDF byte stream.
    fn render(&self, model: &DocumentModel) -> Result<Vec<u8>, PdfRenderError>;
}

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

// ---------------------------------------------------------------------------
// Styled variant (genpdf)
// ---------------------------------------------------------------------------

/// Full-fidelity renderer backed by `genpdf`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StyledPdfRenderer;

impl RenderPdf for StyledPdfRenderer {
    fn render(&self, model: &DocumentModel) -> Result<Vec<u8>, PdfRenderError> {
        let family = fonts::serif_font_family()
            .map_err(|err| PdfRenderError::EngineUnavailable(err.to_string()))?;

        let mut document = genpdf::Document::new(family);
        document.set_title(model.config().newsletter_title());
        document.set_font_size(BODY_SIZE_PT);
        document.set_paper_size(PaperSize::A4);
        document.set_page_decorator(FramedPageDecorator::new(model.config()));

        for (index, section) in model.sections().iter().enumerate() {
            if index > 0 {
                document.push(PageBreak::new());
            }
            push_section(&mut document, model, section)?;
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        Ok(bytes)
    }
}

fn push_section(
    document: &mut genpdf::Document,
    model: &DocumentModel,
    section: &Section,
) -> Result<(), PdfRenderError> {
    let mut heading = Paragraph::default();
    heading.push_styled(
        section.title().to_string(),
        Style::new()
            .bold()
            .with_font_size(HEADING_SIZE_PT)
            .with_color(ACCENT_COLOR),
    );
    heading.set_alignment(Alignment::Center);
    document.push(heading);
    document.push(Break::new(0.5));

    if section.kind() == SectionKind::Cover {
        if let Some(logo) = model.config().logo() {
            if let Some(element) = image_element(logo, LOGO_WIDTH_MM) {
                document.push(element);
                document.push(Break::new(0.5));
            }
        }
    }

    for line in section.body() {
        document.push(Paragraph::new(line.clone()));
        document.push(Break::new(0.3));
    }

    for record in section.records() {
        push_record(document, record)?;
    }

    Ok(())
}

fn push_record(document: &mut genpdf::Document, record: &Record) -> Result<(), PdfRenderError> {
    let mut table = TableLayout::new(vec![1, 1]);
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut meta = LinearLayout::vertical();
    let mut title = Paragraph::default();
    title.push_styled(record.title().to_string(), Style::new().bold());
    meta.push(title);
    let mut date = Paragraph::default();
    date.push_styled(
        record.formatted_date(),
        Style::new().italic().with_font_size(HEADING_SIZE_PT),
    );
    meta.push(date);
    for detail in record.details() {
        let mut line = Paragraph::default();
        line.push_styled(
            detail.to_string(),
            Style::new().with_font_size(HEADING_SIZE_PT),
        );
        meta.push(line);
    }

    let mut row = table.row();
    row.push_element(meta.padded(Margins::all(1.0)));
    row.push_element(Paragraph::new(record.description().to_string()).padded(Margins::all(1.0)));
    row.push()?;

    document.push(table);
    document.push(Break::new(0.3));

    // Blank slot on decode failure; the record entry is kept either way.
    if let Some(element) = image_element(record.image().bytes(), EVENT_IMAGE_WIDTH_MM) {
        document.push(element);
    }
    document.push(Break::new(1.0));
    Ok(())
}

fn image_element(bytes: &[u8], width_mm: f64) -> Option<Image> {
    let decoded = match image::load_from_memory(bytes) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!("skipping image that cannot be decoded: {err}");
            return None;
        }
    };
    let (width_px, _) = decoded.dimensions();
    let natural_width_mm = MM_PER_INCH * f64::from(width_px) / DEFAULT_IMAGE_DPI;

    let mut element = match Image::from_dynamic_image(decoded) {
        Ok(element) => element,
        Err(err) => {
            warn!("skipping image the PDF writer cannot embed: {err}");
            return None;
        }
    };
    if natural_width_mm > f64::EPSILON {
        let scale = width_mm / natural_width_mm;
        element.set_scale(Scale::new(scale, scale));
    }
    element.set_alignment(Alignment::Center);
    Some(element)
}

/// Page decorator drawing the page frame, issue header and page-number footer.
struct FramedPageDecorator {
    page: usize,
    title: String,
    subtitle: String,
}

impl FramedPageDecorator {
    fn new(config: &NewsletterConfig) -> Self {
        let mut subtitle = config.department_name().to_string();
        if !config.issue_label().is_empty() {
            if !subtitle.is_empty() {
                subtitle.push_str(" · ");
            }
            subtitle.push_str(config.issue_label());
        }
        Self {
            page: 0,
            title: config.newsletter_title().to_string(),
            subtitle,
        }
    }
}

impl PageDecorator for FramedPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, GenpdfError> {
        self.page += 1;

        draw_frame(&mut area);
        area.add_margins(Margins::all(CONTENT_MARGIN_MM));

        let mut header = LinearLayout::vertical();
        let mut title_line = Paragraph::default();
        title_line.push_styled(self.title.clone(), Style::new().bold().with_font_size(9));
        title_line.set_alignment(Alignment::Center);
        header.push(title_line);
        if !self.subtitle.is_empty() {
            let mut subtitle_line = Paragraph::default();
            subtitle_line.push_styled(self.subtitle.clone(), Style::new().with_font_size(8));
            subtitle_line.set_alignment(Alignment::Center);
            header.push(subtitle_line);
        }
        let result = header.render(context, area.clone(), style)?;
        area.add_offset(Position::new(
            0,
            result.size.height + mm_from_f64(HEADER_SPACING_MM),
        ));

        let available = area.size().height;
        let footer_height = mm_from_f64(FOOTER_HEIGHT_MM);
        if footer_height < available {
            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer_height));
            let mut page_line = Paragraph::default();
            page_line.push_styled(format!("Page {}", self.page), Style::new().with_font_size(9));
            page_line.set_alignment(Alignment::Center);
            page_line.render(context, footer_area, style)?;
            area.set_height(available - footer_height);
        }

        Ok(area)
    }
}

fn draw_frame(area: &mut genpdf::render::Area<'_>) {
    let offset = mm_from_f64(FRAME_OFFSET_MM);
    let size = area.size();
    let (left, top) = (offset, offset);
    let (right, bottom) = (size.width - offset, size.height - offset);
    area.draw_line(
        vec![
            Position::new(left, top),
            Position::new(right, top),
            Position::new(right, bottom),
            Position::new(left, bottom),
            Position::new(left, top),
        ],
        Style::new().with_color(FRAME_COLOR),
    );
}

// ---------------------------------------------------------------------------
// Simplified variant (printpdf built-in fonts)
// ---------------------------------------------------------------------------

const SIMPLE_PAGE_WIDTH_MM: f64 = 210.0;
const SIMPLE_PAGE_HEIGHT_MM: f64 = 297.0;
const SIMPLE_MARGIN_MM: f64 = 20.0;
const SIMPLE_WRAP_CHARS: usize = 90;
const PT_TO_MM: f64 = 0.352_78;

/// Text-only renderer backed by `printpdf` built-in fonts.
///
/// Preserves all text content and the section order; drops the frame and
/// styling fidelity.  Must not fail for a structurally valid model.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimplifiedPdfRenderer;

impl RenderPdf for SimplifiedPdfRenderer {
    fn render(&self, model: &DocumentModel) -> Result<Vec<u8>, PdfRenderError> {
        let (doc, page, layer) = PdfDocument::new(
            model.config().newsletter_title(),
            printpdf::Mm(SIMPLE_PAGE_WIDTH_MM),
            printpdf::Mm(SIMPLE_PAGE_HEIGHT_MM),
            "content",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::TimesRoman)
            .map_err(|err| PdfRenderError::Simplified(err.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::TimesBold)
            .map_err(|err| PdfRenderError::Simplified(err.to_string()))?;

        let mut cursor = TextCursor {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: SIMPLE_PAGE_HEIGHT_MM - SIMPLE_MARGIN_MM,
        };

        for (index, section) in model.sections().iter().enumerate() {
            if index > 0 {
                cursor.new_page();
            }
            cursor.line(section.title(), &bold, 14.0);
            cursor.gap(2.0);
            for body_line in section.body() {
                cursor.wrapped(body_line, &regular, 11.0);
            }
            for record in section.records() {
                cursor.line(record.title(), &bold, 12.0);
                cursor.line(&record.formatted_date(), &regular, 10.0);
                for detail in record.details() {
                    cursor.line(detail, &regular, 10.0);
                }
                cursor.wrapped(record.description(), &regular, 11.0);
                cursor.gap(4.0);
            }
        }

        let mut buffer = Vec::new();
        {
            let mut writer = std::io::BufWriter::new(std::io::Cursor::new(&mut buffer));
            doc.save(&mut writer)
                .map_err(|err| PdfRenderError::Simplified(err.to_string()))?;
        }
        Ok(buffer)
    }
}

struct TextCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f64,
}

impl TextCursor<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            printpdf::Mm(SIMPLE_PAGE_WIDTH_MM),
            printpdf::Mm(SIMPLE_PAGE_HEIGHT_MM),
            "content",
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = SIMPLE_PAGE_HEIGHT_MM - SIMPLE_MARGIN_MM;
    }

    fn line(&mut self, text: &str, font: &IndirectFontRef, size_pt: f64) {
        let advance = size_pt * PT_TO_MM * 1.4;
        if self.y - advance < SIMPLE_MARGIN_MM {
            self.new_page();
        }
        self.layer.use_text(
            text,
            size_pt,
            printpdf::Mm(SIMPLE_MARGIN_MM),
            printpdf::Mm(self.y),
            font,
        );
        self.y -= advance;
    }

    fn wrapped(&mut self, text: &str, font: &IndirectFontRef, size_pt: f64) {
        for chunk in wrap(text, SIMPLE_WRAP_CHARS) {
            self.line(&chunk, font, size_pt);
        }
    }

    fn gap(&mut self, millimetres: f64) {
        self.y -= millimetres;
    }
}

fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ---------------------------------------------------------------------------
// Variant selection
// ---------------------------------------------------------------------------

enum Engine {
    Styled(StyledPdfRenderer),
    Simplified(SimplifiedPdfRenderer),
}

/// A PDF renderer with its variant fixed at construction time.
pub struct PdfRenderer {
    engine: Engine,
}

impl PdfRenderer {
    /// Creates a renderer using the styled variant.
    pub fn styled() -> Self {
        Self {
            engine: Engine::Styled(StyledPdfRenderer),
        }
    }

    /// Creates a renderer using the simplified variant.
    pub fn simplified() -> Self {
        Self {
            engine: Engine::Simplified(SimplifiedPdfRenderer),
        }
    }

    /// Picks the styled variant when the bundled fonts are available.
    pub fn select() -> Self {
        if fonts::fonts_available() {
            Self::styled()
        } else {
            debug!("serif fonts unavailable, selecting simplified PDF renderer");
            Self::simplified()
        }
    }

    /// Returns the fidelity of the selected variant.
    pub fn fidelity(&self) -> PdfFidelity {
        match self.engine {
            Engine::Styled(_) => PdfFidelity::Styled,
            Engine::Simplified(_) => PdfFidelity::Simplified,
        }
    }

    /// Renders with the selected variant only.
    pub fn render(&self, model: &DocumentModel) -> Result<Vec<u8>, PdfRenderError> {
        match &self.engine {
            Engine::Styled(renderer) => renderer.render(model),
            Engine::Simplified(renderer) => renderer.render(model),
        }
    }

    /// Renders with the selected variant, recovering styled failures through
    /// the simplified variant.  Only a simplified failure is surfaced.
    pub fn render_with_fallback(
        &self,
        model: &DocumentModel,
    ) -> Result<(Vec<u8>, PdfFidelity), PdfRenderError> {
        match &self.engine {
            Engine::Simplified(renderer) => {
                Ok((renderer.render(model)?, PdfFidelity::Simplified))
            }
            Engine::Styled(renderer) => match renderer.render(model) {
                Ok(bytes) => Ok((bytes, PdfFidelity::Styled)),
                Err(err) => {
                    warn!("styled PDF rendering failed ({err}), falling back to simplified renderer");
                    Ok((
                        SimplifiedPdfRenderer.render(model)?,
                        PdfFidelity::Simplified,
                    ))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewsletterConfig, TemplateKind};
    use crate::sections;

    fn empty_enhanced_model() -> DocumentModel {
        sections::assemble(
            Vec::new(),
            TemplateKind::Enhanced,
            &NewsletterConfig::new("Orbit", "Department of CS")
                .with_vision("Be excellent.")
                .with_contact(vec!["editor@example.edu".to_string()]),
        )
    }

    #[test]
    fn simplified_renderer_never_fails_for_valid_model() {
        let bytes = SimplifiedPdfRenderer
            .render(&empty_enhanced_model())
            .expect("simplified render succeeds");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn fidelity_matches_construction() {
        assert_eq!(PdfRenderer::styled().fidelity(), PdfFidelity::Styled);
        assert_eq!(PdfRenderer::simplified().fidelity(), PdfFidelity::Simplified);
    }

    #[test]
    fn fallback_recovers_when_styled_engine_is_unavailable() {
        if fonts::fonts_available() {
            // With fonts installed the styled path succeeds; nothing to recover.
            return;
        }
        let (bytes, fidelity) = PdfRenderer::styled()
            .render_with_fallback(&empty_enhanced_model())
            .expect("fallback produces a PDF");
        assert_eq!(fidelity, PdfFidelity::Simplified);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_splits_on_word_boundaries() {
        let lines = wrap("alpha beta gamma delta", 11);
        assert_eq!(lines, ["alpha beta", "gamma delta"]);
    }
}
