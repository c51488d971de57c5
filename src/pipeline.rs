//! End-to-end generation pipeline.
//!
//! [`generate`] runs the whole chain for one newsletter issue: validate the
//! raw table rows, resolve images against the store, assemble the section
//! sequence for the chosen template, then render the same document model
//! through the DOCX writer and the PDF renderer pair.  Both artifacts always
//! come from one model instance, so their section order and text content
//! cannot drift apart.

use log::debug;
use thiserror::Error;

use crate::assets::ImageStore;
use crate::docx::{DocxRenderError, DocxRenderer};
use crate::model::{NewsletterConfig, TemplateKind};
use crate::pdf::{PdfFidelity, PdfRenderError, PdfRenderer};
use crate::schema::{self, InputError, RawRow};
use crate::sections;

/// Failure of any stage of the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Docx(#[from] DocxRenderError),
    #[error(transparent)]
    Pdf(#[from] PdfRenderError),
}

/// Both output artifacts of one generation run.
#[derive(Clone, Debug)]
pub struct GeneratedNewsletter {
    docx: Vec<u8>,
    pdf: Vec<u8>,
    pdf_fidelity: PdfFidelity,
}

impl GeneratedNewsletter {
    /// Returns the DOCX byte stream.
    pub fn docx(&self) -> &[u8] {
        &self.docx
    }

    /// Returns the PDF byte stream.
    pub fn pdf(&self) -> &[u8] {
        &self.pdf
    }

    /// Returns which PDF variant produced the bytes.
    pub fn pdf_fidelity(&self) -> PdfFidelity {
        self.pdf_fidelity
    }

    /// Consumes the result, yielding `(docx, pdf)` byte streams.
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.docx, self.pdf)
    }
}

/// Generates the DOCX and PDF artifacts for one newsletter issue.
///
/// Validation is all-or-nothing: a single bad row fails the run with an
/// [`InputError`] naming every problem, and no partial output is produced.
/// PDF rendering uses the styled variant when fonts are available and falls
/// back to the simplified variant otherwise; the chosen fidelity is reported
/// on the result.
pub fn generate(
    rows: &[RawRow],
    store: &ImageStore,
    template: TemplateKind,
    config: &NewsletterConfig,
) -> Result<GeneratedNewsletter, GenerateError> {
    let parsed = schema::validate_rows(rows)?;
    debug!("validated {} row(s)", parsed.len());

    let records = parsed
        .into_iter()
        .map(|row| row.into_record(store))
        .collect();
    let model = sections::assemble(records, template, config);
    debug!(
        "assembled {:?} model with {} section(s)",
        template,
        model.sections().len()
    );

    let docx = DocxRenderer::new().render(&model)?;
    let (pdf, pdf_fidelity) = PdfRenderer::select().render_with_fallback(&model)?;
    debug!(
        "rendered {} DOCX byte(s) and {} PDF byte(s) ({:?})",
        docx.len(),
        pdf.len(),
        pdf_fidelity
    );

    Ok(GeneratedNewsletter {
        docx,
        pdf,
        pdf_fidelity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<RawRow> {
        vec![RawRow {
            event_title: "Tech Fest".to_string(),
            event_description: "Annual technical festival.".to_string(),
            event_date: "2025-03-15".to_string(),
            department: "CS".to_string(),
            image_reference: "1".to_string(),
            ..RawRow::default()
        }]
    }

    fn config() -> NewsletterConfig {
        NewsletterConfig::new("Orbit", "Department of CS")
            .with_contact(vec!["editor@example.edu".to_string()])
    }

    #[test]
    fn produces_both_artifacts() {
        let result = generate(
            &sample_rows(),
            &ImageStore::new(),
            TemplateKind::Basic,
            &config(),
        )
        .expect("generation succeeds");
        assert!(result.docx().starts_with(b"PK"));
        assert!(result.pdf().starts_with(b"%PDF"));
    }

    #[test]
    fn invalid_rows_fail_before_rendering() {
        let mut rows = sample_rows();
        rows[0].event_date = "someday".to_string();
        let err = generate(&rows, &ImageStore::new(), TemplateKind::Basic, &config())
            .expect_err("generation must fail");
        assert!(matches!(err, GenerateError::Input(_)));
    }
}
