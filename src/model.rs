//! Data structures describing the logical content of one newsletter issue.
//!
//! The types in this module form the shared intermediate representation
//! consumed by both renderers.  They intentionally avoid referencing either
//! rendering crate so a model can be assembled, inspected in tests, and handed
//! to the DOCX and PDF backends without pulling in their dependencies.

use chrono::NaiveDate;

use crate::assets;

/// Document structure variant selected by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TemplateKind {
    /// Event listing only, one section per department.
    #[default]
    Basic,
    /// Full magazine structure with static sections around the event groups.
    Enhanced,
}

/// Image attached to a record.
///
/// A record always carries a displayable image: either the bytes resolved from
/// the upload store or the fixed placeholder marker.  The placeholder variant
/// defers to [`crate::assets::placeholder_png`] so every consumer sees the
/// same bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordImage {
    /// Image bytes resolved from the upload store.
    Resolved(Vec<u8>),
    /// No matching upload; render the fixed placeholder instead.
    Placeholder,
}

impl RecordImage {
    /// Returns the displayable image bytes for this record.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Resolved(bytes) => bytes,
            Self::Placeholder => assets::placeholder_png(),
        }
    }

    /// Returns whether the record fell back to the placeholder image.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// One normalized event entry.
///
/// Invariants are enforced at the schema boundary ([`crate::schema`]): title
/// and department are non-empty and the date has already been parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    title: String,
    description: String,
    date: NaiveDate,
    department: String,
    details: Vec<String>,
    image: RecordImage,
}

impl Record {
    /// Creates a new record from already-validated fields.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        department: impl Into<String>,
        image: RecordImage,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            date,
            department: department.into(),
            details: Vec::new(),
            image,
        }
    }

    /// Attaches optional detail lines (speaker, location, coordinators).
    pub fn with_details(mut self, details: impl Into<Vec<String>>) -> Self {
        self.details = details.into();
        self
    }

    /// Returns the event title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the event description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the event date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the date formatted for display, e.g. `15 March 2025`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%d %B %Y").to_string()
    }

    /// Returns the owning department name.
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Returns the optional detail lines rendered underneath the title.
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Returns the attached image.
    pub fn image(&self) -> &RecordImage {
        &self.image
    }
}

/// Kind discriminator for the logical blocks of the output document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Cover,
    VisionMission,
    Objectives,
    Outcomes,
    TableOfContents,
    EventGroup,
    Contact,
}

impl SectionKind {
    /// Returns whether sections of this kind carry event records.
    pub fn is_event_group(self) -> bool {
        matches!(self, Self::EventGroup)
    }
}

/// One logical block of the output document.
///
/// Static sections carry free-form body lines; event groups carry the ordered
/// records of one department.  Ordering of the section sequence is fixed by
/// the template kind, cover first and contact last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    kind: SectionKind,
    title: String,
    body: Vec<String>,
    records: Vec<Record>,
}

impl Section {
    /// Creates a static section with the given body lines.
    pub fn text(kind: SectionKind, title: impl Into<String>, body: Vec<String>) -> Self {
        debug_assert!(!kind.is_event_group());
        Self {
            kind,
            title: title.into(),
            body,
            records: Vec::new(),
        }
    }

    /// Creates an event group section holding one department's records.
    pub fn event_group(title: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            kind: SectionKind::EventGroup,
            title: title.into(),
            body: Vec::new(),
            records,
        }
    }

    /// Returns the section kind.
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Returns the section title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the static body lines (empty for event groups).
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Returns the records of an event group (empty for static sections).
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// Static configuration supplied by the collaborator for one issue.
///
/// All values are free-form strings owned by the generation run; nothing here
/// is process-wide state.
#[derive(Clone, Debug, Default)]
pub struct NewsletterConfig {
    newsletter_title: String,
    department_name: String,
    issue_label: String,
    logo: Option<Vec<u8>>,
    vision: String,
    mission: String,
    objectives: Vec<String>,
    outcomes: Vec<String>,
    contact: Vec<String>,
}

impl NewsletterConfig {
    /// Creates a configuration with the two required display names.
    pub fn new(newsletter_title: impl Into<String>, department_name: impl Into<String>) -> Self {
        Self {
            newsletter_title: newsletter_title.into(),
            department_name: department_name.into(),
            ..Self::default()
        }
    }

    /// Sets the issue label shown in page headers, e.g. `August 2025 · Vol 2`.
    pub fn with_issue_label(mut self, issue_label: impl Into<String>) -> Self {
        self.issue_label = issue_label.into();
        self
    }

    /// Sets the logo image bytes shown on the cover.
    pub fn with_logo(mut self, logo: impl Into<Option<Vec<u8>>>) -> Self {
        self.logo = logo.into();
        self
    }

    /// Sets the vision statement.
    pub fn with_vision(mut self, vision: impl Into<String>) -> Self {
        self.vision = vision.into();
        self
    }

    /// Sets the mission statement.
    pub fn with_mission(mut self, mission: impl Into<String>) -> Self {
        self.mission = mission.into();
        self
    }

    /// Sets the program objective lines.
    pub fn with_objectives(mut self, objectives: impl Into<Vec<String>>) -> Self {
        self.objectives = objectives.into();
        self
    }

    /// Sets the program outcome lines.
    pub fn with_outcomes(mut self, outcomes: impl Into<Vec<String>>) -> Self {
        self.outcomes = outcomes.into();
        self
    }

    /// Sets the contact info lines.
    pub fn with_contact(mut self, contact: impl Into<Vec<String>>) -> Self {
        self.contact = contact.into();
        self
    }

    /// Returns the newsletter title.
    pub fn newsletter_title(&self) -> &str {
        &self.newsletter_title
    }

    /// Returns the department name.
    pub fn department_name(&self) -> &str {
        &self.department_name
    }

    /// Returns the issue label.
    pub fn issue_label(&self) -> &str {
        &self.issue_label
    }

    /// Returns the logo image bytes, if configured.
    pub fn logo(&self) -> Option<&[u8]> {
        self.logo.as_deref()
    }

    /// Returns the vision statement.
    pub fn vision(&self) -> &str {
        &self.vision
    }

    /// Returns the mission statement.
    pub fn mission(&self) -> &str {
        &self.mission
    }

    /// Returns the program objective lines.
    pub fn objectives(&self) -> &[String] {
        &self.objectives
    }

    /// Returns the program outcome lines.
    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    /// Returns the contact info lines.
    pub fn contact(&self) -> &[String] {
        &self.contact
    }
}

/// The full ordered section sequence plus issue metadata.
///
/// Owned exclusively by one generation run and consumed read-only by both
/// renderers; nothing is shared between runs.
#[derive(Clone, Debug)]
pub struct DocumentModel {
    config: NewsletterConfig,
    sections: Vec<Section>,
}

impl DocumentModel {
    /// Creates a model from an assembled section sequence.
    pub fn new(config: NewsletterConfig, sections: Vec<Section>) -> Self {
        Self { config, sections }
    }

    /// Returns the issue configuration.
    pub fn config(&self) -> &NewsletterConfig {
        &self.config
    }

    /// Returns the ordered section sequence.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the total number of records across all event groups.
    pub fn record_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.records().len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn placeholder_image_yields_fixed_bytes() {
        let image = RecordImage::Placeholder;
        assert!(image.is_placeholder());
        assert_eq!(image.bytes(), assets::placeholder_png());
    }

    #[test]
    fn formatted_date_uses_long_form() {
        let record = Record::new(
            "Tech Fest",
            "Annual festival",
            date(2025, 3, 15),
            "CS",
            RecordImage::Placeholder,
        );
        assert_eq!(record.formatted_date(), "15 March 2025");
    }

    #[test]
    fn record_count_sums_event_groups() {
        let record = Record::new(
            "Tech Fest",
            "Annual festival",
            date(2025, 3, 15),
            "CS",
            RecordImage::Placeholder,
        );
        let model = DocumentModel::new(
            NewsletterConfig::new("Orbit", "CS"),
            vec![
                Section::text(SectionKind::Cover, "Orbit", Vec::new()),
                Section::event_group("CS", vec![record.clone(), record]),
            ],
        );
        assert_eq!(model.record_count(), 2);
    }
}
