//! Section assembly: grouping records and ordering the document blocks.
//!
//! [`build_sections`] turns validated records into the full ordered section
//! sequence for the chosen template kind.  The ordering is deterministic:
//! departments appear in the order they are first seen in the source table,
//! and the static sections of the enhanced template wrap the event groups in
//! a fixed order with the cover first and the contact section last.

use log::debug;

use crate::model::{DocumentModel, NewsletterConfig, Record, Section, SectionKind, TemplateKind};

/// Groups records by department, preserving first-seen order.
pub fn group_by_department(records: Vec<Record>) -> Vec<(String, Vec<Record>)> {
    let mut groups: Vec<(String, Vec<Record>)> = Vec::new();
    for record in records {
        match groups
            .iter_mut()
            .find(|(department, _)| department == record.department())
        {
            Some((_, members)) => members.push(record),
            None => groups.push((record.department().to_string(), vec![record])),
        }
    }
    groups
}

/// Produces the ordered section sequence for the chosen template kind.
///
/// Basic yields one event group per department and nothing else; an empty
/// record set yields an empty sequence.  Enhanced interleaves the static
/// sections around the event groups and still emits them when no records
/// were supplied.
pub fn build_sections(
    records: Vec<Record>,
    template: TemplateKind,
    config: &NewsletterConfig,
) -> Vec<Section> {
    let groups = group_by_department(records);
    debug!(
        "assembling {:?} template from {} department group(s)",
        template,
        groups.len()
    );

    let event_groups = groups
        .into_iter()
        .map(|(department, members)| Section::event_group(department, members));

    match template {
        TemplateKind::Basic => event_groups.collect(),
        TemplateKind::Enhanced => {
            let event_groups: Vec<Section> = event_groups.collect();
            let mut sections = vec![
                cover_section(config),
                vision_mission_section(config),
                objectives_section(config),
                outcomes_section(config),
                contents_section(&event_groups),
            ];
            sections.extend(event_groups);
            sections.push(contact_section(config));
            sections
        }
    }
}

/// Assembles the complete document model for one generation run.
pub fn assemble(
    records: Vec<Record>,
    template: TemplateKind,
    config: &NewsletterConfig,
) -> DocumentModel {
    let sections = build_sections(records, template, config);
    DocumentModel::new(config.clone(), sections)
}

fn cover_section(config: &NewsletterConfig) -> Section {
    let mut body = vec![config.department_name().to_string()];
    if !config.issue_label().is_empty() {
        body.push(config.issue_label().to_string());
    }
    Section::text(SectionKind::Cover, config.newsletter_title(), body)
}

fn vision_mission_section(config: &NewsletterConfig) -> Section {
    let mut body = Vec::new();
    if !config.vision().is_empty() {
        body.push(format!("Vision: {}", config.vision()));
    }
    if !config.mission().is_empty() {
        body.push(format!("Mission: {}", config.mission()));
    }
    Section::text(SectionKind::VisionMission, "Vision & Mission", body)
}

fn objectives_section(config: &NewsletterConfig) -> Section {
    Section::text(
        SectionKind::Objectives,
        "Program Objectives",
        config.objectives().to_vec(),
    )
}

fn outcomes_section(config: &NewsletterConfig) -> Section {
    Section::text(
        SectionKind::Outcomes,
        "Program Outcomes",
        config.outcomes().to_vec(),
    )
}

fn contents_section(event_groups: &[Section]) -> Section {
    let body = event_groups
        .iter()
        .enumerate()
        .map(|(index, section)| format!("{}. {}", index + 1, section.title()))
        .collect();
    Section::text(SectionKind::TableOfContents, "Contents", body)
}

fn contact_section(config: &NewsletterConfig) -> Section {
    Section::text(SectionKind::Contact, "Contact", config.contact().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordImage;
    use chrono::NaiveDate;

    fn record(title: &str, department: &str) -> Record {
        Record::new(
            title,
            "description",
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            department,
            RecordImage::Placeholder,
        )
    }

    fn config() -> NewsletterConfig {
        NewsletterConfig::new("Orbit", "Department of CS")
            .with_vision("Be excellent.")
            .with_mission("Teach well.")
            .with_objectives(vec!["PEO1: solve problems".to_string()])
            .with_outcomes(vec!["PSO1: build systems".to_string()])
            .with_contact(vec!["editor@example.edu".to_string()])
    }

    const ENHANCED_STATIC_KINDS: &[SectionKind] = &[
        SectionKind::Cover,
        SectionKind::VisionMission,
        SectionKind::Objectives,
        SectionKind::Outcomes,
        SectionKind::TableOfContents,
        SectionKind::Contact,
    ];

    #[test]
    fn departments_keep_first_seen_order() {
        let records = vec![
            record("a", "Mech"),
            record("b", "CS"),
            record("c", "Mech"),
            record("d", "Civil"),
        ];
        let groups = group_by_department(records);
        let names: Vec<&str> = groups.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Mech", "CS", "Civil"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn basic_template_emits_event_groups_only() {
        let sections = build_sections(
            vec![record("a", "CS"), record("b", "ECE")],
            TemplateKind::Basic,
            &config(),
        );
        assert_eq!(sections.len(), 2);
        assert!(sections
            .iter()
            .all(|section| section.kind().is_event_group()));
        assert_eq!(sections[0].title(), "CS");
        assert_eq!(sections[1].title(), "ECE");
    }

    #[test]
    fn basic_template_with_no_records_is_empty() {
        let sections = build_sections(Vec::new(), TemplateKind::Basic, &config());
        assert!(sections.is_empty());
    }

    #[test]
    fn enhanced_template_with_no_records_keeps_static_sections() {
        let sections = build_sections(Vec::new(), TemplateKind::Enhanced, &config());
        let kinds: Vec<SectionKind> = sections.iter().map(Section::kind).collect();
        assert_eq!(kinds, ENHANCED_STATIC_KINDS);
    }

    #[test]
    fn enhanced_template_wraps_event_groups_in_fixed_order() {
        let sections = build_sections(
            vec![record("a", "CS"), record("b", "ECE")],
            TemplateKind::Enhanced,
            &config(),
        );

        assert_eq!(sections.first().unwrap().kind(), SectionKind::Cover);
        assert_eq!(sections.last().unwrap().kind(), SectionKind::Contact);

        let kinds: Vec<SectionKind> = sections.iter().map(Section::kind).collect();
        assert_eq!(
            kinds,
            [
                SectionKind::Cover,
                SectionKind::VisionMission,
                SectionKind::Objectives,
                SectionKind::Outcomes,
                SectionKind::TableOfContents,
                SectionKind::EventGroup,
                SectionKind::EventGroup,
                SectionKind::Contact,
            ]
        );
    }

    #[test]
    fn contents_section_lists_departments_in_order() {
        let sections = build_sections(
            vec![record("a", "Mech"), record("b", "CS")],
            TemplateKind::Enhanced,
            &config(),
        );
        let contents = sections
            .iter()
            .find(|section| section.kind() == SectionKind::TableOfContents)
            .expect("contents section present");
        assert_eq!(contents.body(), ["1. Mech", "2. CS"]);
    }

    #[test]
    fn no_record_is_lost_during_assembly() {
        let records: Vec<Record> = (0..7)
            .map(|index| record(&format!("event {index}"), ["CS", "ECE", "Civil"][index % 3]))
            .collect();
        let total = records.len();
        let model = assemble(records, TemplateKind::Enhanced, &config());
        assert_eq!(model.record_count(), total);
    }

    #[test]
    fn assembly_is_deterministic() {
        let records = || vec![record("a", "CS"), record("b", "ECE"), record("c", "CS")];
        let first = build_sections(records(), TemplateKind::Enhanced, &config());
        let second = build_sections(records(), TemplateKind::Enhanced, &config());
        assert_eq!(first, second);
    }
}
