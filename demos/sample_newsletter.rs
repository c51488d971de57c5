use std::error::Error;
use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use newsletter_press::assets::ImageStore;
use newsletter_press::model::{NewsletterConfig, TemplateKind};
use newsletter_press::pipeline;
use newsletter_press::schema::RawRow;

fn main() -> Result<(), Box<dyn Error>> {
    let store = ImageStore::from_files([
        ("1.png", gradient_image(240, 150, [78, 102, 148], [228, 188, 152])?),
        ("2.png", gradient_image(220, 160, [60, 92, 180], [200, 220, 255])?),
    ]);

    let rows = vec![
        RawRow {
            event_title: "Tech Fest 2025".to_string(),
            event_description:
                "Two-day technical festival with coding contests, project demos and an alumni panel."
                    .to_string(),
            event_date: "2025-03-15".to_string(),
            department: "Computer Science".to_string(),
            image_reference: "1".to_string(),
            guest_speaker: Some("Dr. Meena Rao".to_string()),
            location: Some("Main Auditorium".to_string()),
            coordinators: Some("Prof. Iyer, Prof. Das".to_string()),
        },
        RawRow {
            event_title: "Robotics Expo".to_string(),
            event_description: "Student-built robots on display, judged by industry mentors."
                .to_string(),
            event_date: "04/02/2025".to_string(),
            department: "Electronics".to_string(),
            image_reference: "2".to_string(),
            ..RawRow::default()
        },
        RawRow {
            event_title: "Open Source Day".to_string(),
            event_description: "First-contribution sprint against curated beginner issues."
                .to_string(),
            event_date: "2025-04-18".to_string(),
            department: "Computer Science".to_string(),
            // No matching file in the store; the placeholder art is used.
            image_reference: "missing".to_string(),
            ..RawRow::default()
        },
    ];

    let config = NewsletterConfig::new("Orbit", "Department of Computer Science")
        .with_issue_label("Vol. 7, 2025")
        .with_vision("Be a center of excellence in computing education and research.")
        .with_mission("Prepare students for research careers and industry practice.")
        .with_objectives(vec![
            "Apply computing fundamentals to real problems.".to_string(),
            "Work effectively in multidisciplinary teams.".to_string(),
        ])
        .with_outcomes(vec![
            "Design, implement and evaluate software systems.".to_string(),
        ])
        .with_contact(vec![
            "editor@example.edu".to_string(),
            "https://cs.example.edu/newsletter".to_string(),
        ]);

    let result = pipeline::generate(&rows, &store, TemplateKind::Enhanced, &config)?;
    std::fs::write("newsletter.docx", result.docx())?;
    std::fs::write("newsletter.pdf", result.pdf())?;
    println!(
        "Generated newsletter.docx ({} bytes) and newsletter.pdf ({} bytes, {:?} fidelity)",
        result.docx().len(),
        result.pdf().len(),
        result.pdf_fidelity()
    );
    Ok(())
}

/// Renders a diagonal gradient between two anchor colours as PNG bytes.
fn gradient_image(
    width: u32,
    height: u32,
    start: [u8; 3],
    end: [u8; 3],
) -> Result<Vec<u8>, image::ImageError> {
    let width_f = (width.saturating_sub(1)) as f32;
    let height_f = (height.saturating_sub(1)) as f32;
    let buffer = ImageBuffer::from_fn(width, height, |x, y| {
        let xf = if width_f > 0.0 { x as f32 / width_f } else { 0.0 };
        let yf = if height_f > 0.0 { y as f32 / height_f } else { 0.0 };
        let mix = (0.65 * xf + 0.35 * yf).clamp(0.0, 1.0);
        let mut channels = [0u8; 3];
        for (index, channel) in channels.iter_mut().enumerate() {
            let from = start[index] as f32;
            let to = end[index] as f32;
            *channel = (from + (to - from) * mix).round().clamp(0.0, 255.0) as u8;
        }
        Rgb(channels)
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}
