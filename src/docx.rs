//! Word-processor document renderer.
//!
//! Walks the shared [`DocumentModel`] and emits a DOCX byte stream via
//! [`docx-rs`][docx_rs].  Styling is fixed: Times New Roman, 12pt body and
//! 11pt headings with a dark-blue accent, page geometry offset 1.5 cm from
//! the page edge, and a centered page-number footer.  A record whose image
//! bytes cannot be decoded keeps its table row with a blank image slot; one
//! bad asset never aborts the document.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, Footer, PageMargin, PageNum, Paragraph, Pic, Run, RunFonts,
    Table, TableCell, TableRow,
};
use image::GenericImageView;
use log::warn;
use thiserror::Error;

use crate::model::{DocumentModel, Record, Section, SectionKind};

const BODY_FONT: &str = "Times New Roman";
/// Run sizes are in half-points: 24 is 12pt body, 22 is 11pt headings/meta.
const BODY_SIZE: usize = 24;
const HEADING_SIZE: usize = 22;
const ACCENT_COLOR: &str = "1F3864";
/// 1.5 cm expressed in twips.
const PAGE_MARGIN_TWIPS: i32 = 850;
const EMU_PER_MM: u32 = 36_000;
const EVENT_IMAGE_WIDTH_MM: u32 = 45;
const LOGO_WIDTH_MM: u32 = 60;

/// Unrecoverable failure of the underlying DOCX writer.
#[derive(Debug, Error)]
pub enum DocxRenderError {
    #[error("word document writer failed: {0}")]
    Writer(String),
}

/// Stateless renderer mapping a [`DocumentModel`] to DOCX bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    /// Creates a new renderer.
    pub fn new() -> Self {
        Self
    }

    /// Renders the model to a DOCX byte stream.
    ///
    /// Output preserves the section order of the model exactly and is
    /// byte-identical across repeated calls with the same model.
    pub fn render(&self, model: &DocumentModel) -> Result<Vec<u8>, DocxRenderError> {
        let mut docx = Docx::new()
            .default_fonts(RunFonts::new().ascii(BODY_FONT))
            .default_size(BODY_SIZE)
            .page_margin(page_margin())
            .footer(Footer::new().add_paragraph(
                Paragraph::new()
                    .align(AlignmentType::Center)
                    .add_page_num(PageNum::new()),
            ));

        // Image relationship ids are numbered per render so repeated renders
        // of the same model stay byte-identical.
        let mut images = 0usize;
        for (index, section) in model.sections().iter().enumerate() {
            docx = append_section(docx, model, section, index == 0, &mut images);
        }

        let mut cursor = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut cursor)
            .map_err(|err| DocxRenderError::Writer(err.to_string()))?;
        Ok(cursor.into_inner())
    }
}

fn page_margin() -> PageMargin {
    PageMargin::new()
        .top(PAGE_MARGIN_TWIPS)
        .bottom(PAGE_MARGIN_TWIPS)
        .left(PAGE_MARGIN_TWIPS)
        .right(PAGE_MARGIN_TWIPS)
}

fn append_section(
    mut docx: Docx,
    model: &DocumentModel,
    section: &Section,
    first: bool,
    images: &mut usize,
) -> Docx {
    if !first {
        docx = docx.add_paragraph(
            Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
        );
    }

    docx = docx.add_paragraph(heading_paragraph(section.title()));

    if section.kind() == SectionKind::Cover {
        if let Some(logo) = model.config().logo() {
            if let Some(run) = image_run(logo, LOGO_WIDTH_MM, images) {
                docx = docx
                    .add_paragraph(Paragraph::new().align(AlignmentType::Center).add_run(run));
            }
        }
    }

    for line in section.body() {
        docx = docx.add_paragraph(body_paragraph(line));
    }

    if section.kind().is_event_group() && !section.records().is_empty() {
        docx = docx.add_table(event_table(section.records(), images));
    }

    docx
}

fn heading_paragraph(title: &str) -> Paragraph {
    Paragraph::new().align(AlignmentType::Center).add_run(
        Run::new()
            .add_text(title)
            .bold()
            .size(HEADING_SIZE)
            .color(ACCENT_COLOR),
    )
}

fn body_paragraph(line: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(line).size(BODY_SIZE))
}

fn event_table(records: &[Record], images: &mut usize) -> Table {
    let rows = records
        .iter()
        .map(|record| event_row(record, images))
        .collect();
    Table::new(rows).set_grid(vec![3000, 4200, 3000])
}

fn event_row(record: &Record, images: &mut usize) -> TableRow {
    let mut title_cell = TableCell::new()
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(record.title()).bold().size(BODY_SIZE)),
        )
        .add_paragraph(Paragraph::new().add_run(
            Run::new()
                .add_text(record.formatted_date())
                .italic()
                .size(HEADING_SIZE),
        ));
    for detail in record.details() {
        title_cell = title_cell
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(detail).size(HEADING_SIZE)));
    }

    let description_cell = TableCell::new().add_paragraph(body_paragraph(record.description()));

    // Blank slot when the bytes cannot be embedded; the row is kept either way.
    let image_cell = match image_run(record.image().bytes(), EVENT_IMAGE_WIDTH_MM, images) {
        Some(run) => TableCell::new()
            .add_paragraph(Paragraph::new().align(AlignmentType::Center).add_run(run)),
        None => TableCell::new().add_paragraph(Paragraph::new()),
    };

    TableRow::new(vec![title_cell, description_cell, image_cell])
}

fn image_run(bytes: &[u8], width_mm: u32, images: &mut usize) -> Option<Run> {
    match image::load_from_memory(bytes) {
        Ok(decoded) => {
            let (width_px, height_px) = decoded.dimensions();
            let width_emu = width_mm * EMU_PER_MM;
            let height_emu =
                (u64::from(width_emu) * u64::from(height_px) / u64::from(width_px.max(1))) as u32;
            *images += 1;
            // Explicit relationship id; the library default draws from a
            // process-global counter and differs across renders.
            Some(Run::new().add_image(
                Pic::new(bytes)
                    .id(format!("rIdImage{}", *images))
                    .size(width_emu, height_emu),
            ))
        }
        Err(err) => {
            warn!("skipping image that cannot be embedded: {err}");
            None
        }
    }
}
