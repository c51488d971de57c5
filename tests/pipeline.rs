use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use newsletter_press::assets::{self, ImageStore};
use newsletter_press::model::{NewsletterConfig, SectionKind, TemplateKind};
use newsletter_press::pipeline::{self, GenerateError};
use newsletter_press::schema::{self, RawRow};
use newsletter_press::sections;

fn tiny_png() -> Vec<u8> {
    let pixels = ImageBuffer::from_pixel(4, 4, Rgb([200u8, 40, 40]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("encode test png");
    bytes
}

fn event_row(title: &str, department: &str, image_reference: &str) -> RawRow {
    RawRow {
        event_title: title.to_string(),
        event_description: format!("{title} description."),
        event_date: "2025-03-15".to_string(),
        department: department.to_string(),
        image_reference: image_reference.to_string(),
        ..RawRow::default()
    }
}

fn config() -> NewsletterConfig {
    NewsletterConfig::new("Orbit", "Department of Computer Science")
        .with_contact(vec!["editor@example.edu".to_string()])
}

#[test]
fn resolves_images_and_builds_one_group_per_department() {
    let png = tiny_png();
    let store = ImageStore::from_files([("1.png", png.clone())]);
    let rows = vec![event_row("Tech Fest", "CS", "1")];

    let parsed = schema::validate_rows(&rows).expect("rows are valid");
    let records: Vec<_> = parsed
        .into_iter()
        .map(|row| row.into_record(&store))
        .collect();
    let model = sections::assemble(records, TemplateKind::Basic, &config());

    assert_eq!(model.sections().len(), 1);
    let group = &model.sections()[0];
    assert_eq!(group.kind(), SectionKind::EventGroup);
    assert_eq!(group.title(), "CS");
    assert_eq!(group.records()[0].image().bytes(), png.as_slice());
    assert!(!group.records()[0].image().is_placeholder());

    let result = pipeline::generate(&rows, &store, TemplateKind::Basic, &config())
        .expect("generation succeeds");
    assert!(result.docx().starts_with(b"PK"));
    assert!(result.pdf().starts_with(b"%PDF"));
}

#[test]
fn missing_image_falls_back_to_the_placeholder() {
    let store = ImageStore::new();
    let rows = vec![event_row("Tech Fest", "CS", "1")];

    let parsed = schema::validate_rows(&rows).expect("rows are valid");
    let record = parsed
        .into_iter()
        .next()
        .unwrap()
        .into_record(&store);

    assert!(record.image().is_placeholder());
    assert_eq!(record.image().bytes(), assets::placeholder_png());

    // The placeholder keeps the run alive end to end.
    pipeline::generate(&rows, &store, TemplateKind::Enhanced, &config())
        .expect("generation succeeds with placeholder art");
}

#[test]
fn bad_rows_fail_the_whole_run_with_every_problem_listed() {
    let rows = vec![
        event_row("Tech Fest", "CS", "1"),
        RawRow {
            event_title: String::new(),
            event_date: "sometime in March".to_string(),
            department: "CS".to_string(),
            ..RawRow::default()
        },
    ];

    let err = pipeline::generate(&rows, &ImageStore::new(), TemplateKind::Basic, &config())
        .expect_err("invalid rows must fail the run");
    let GenerateError::Input(input) = err else {
        panic!("expected an input error, got: {err}");
    };
    assert_eq!(input.0.len(), 2);
    let message = input.to_string();
    assert!(message.contains("event_title"));
    assert!(message.contains("sometime in March"));
}

#[test]
fn both_artifacts_come_from_the_same_assembly() {
    let rows = vec![
        event_row("Tech Fest", "CS", "1"),
        event_row("Robotics Expo", "ECE", "2"),
        event_row("Hackathon", "CS", "3"),
    ];
    let store = ImageStore::from_files([("1.png", tiny_png())]);

    let first = pipeline::generate(&rows, &store, TemplateKind::Enhanced, &config())
        .expect("generation succeeds");
    let second = pipeline::generate(&rows, &store, TemplateKind::Enhanced, &config())
        .expect("generation succeeds");

    assert_eq!(first.docx(), second.docx(), "DOCX output must be stable");
    assert_eq!(first.pdf_fidelity(), second.pdf_fidelity());
}
