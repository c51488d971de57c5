//! Validation boundary between loosely-typed tabular input and the model.
//!
//! All "duck-typed" handling of the uploaded event table is isolated here:
//! [`validate_rows`] checks every row against the recognized field set and
//! either produces strongly-typed [`ParsedRow`] values or an [`InputError`]
//! naming each offending row and field.  No partial output is produced; the
//! section builder only ever sees fully validated rows.

use chrono::NaiveDate;
use thiserror::Error;

use crate::assets::ImageStore;
use crate::model::Record;

/// One raw row of the uploaded event table, as supplied by the collaborator.
///
/// Required fields may still be empty or malformed at this point; that is
/// exactly what [`validate_rows`] checks.
#[derive(Clone, Debug, Default)]
pub struct RawRow {
    pub event_title: String,
    pub event_description: String,
    /// Accepted as `YYYY-MM-DD` or `MM/DD/YYYY`.
    pub event_date: String,
    pub department: String,
    pub image_reference: String,
    pub guest_speaker: Option<String>,
    pub location: Option<String>,
    pub coordinators: Option<String>,
}

/// A single validation problem, tied to its zero-based row index.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row {row}: required field `{field}` is missing or empty")]
    MissingField { row: usize, field: &'static str },
    #[error("row {row}: unparseable `event_date` value `{value}` (expected YYYY-MM-DD or MM/DD/YYYY)")]
    InvalidDate { row: usize, value: String },
}

/// Validation failure for the supplied row set, listing every invalid field.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{} invalid input row(s): {}", .0.len(), describe(.0))]
pub struct InputError(pub Vec<RowError>);

fn describe(errors: &[RowError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One fully validated row, ready to have its image attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRow {
    title: String,
    description: String,
    date: NaiveDate,
    department: String,
    image_reference: String,
    details: Vec<String>,
}

impl ParsedRow {
    /// Returns the event title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the parsed event date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the department the row belongs to.
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Returns the raw image reference token.
    pub fn image_reference(&self) -> &str {
        &self.image_reference
    }

    /// Builds a [`Record`] by resolving the image reference against `store`.
    pub fn into_record(self, store: &ImageStore) -> Record {
        let image = store.resolve(&self.image_reference);
        Record::new(
            self.title,
            self.description,
            self.date,
            self.department,
            image,
        )
        .with_details(self.details)
    }
}

/// Validates every row, collecting all problems before reporting.
///
/// Returns the parsed rows in input order, or an [`InputError`] listing every
/// missing field and unparseable date across the whole table.
pub fn validate_rows(rows: &[RawRow]) -> Result<Vec<ParsedRow>, InputError> {
    let mut parsed = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match validate_row(index, row) {
            Ok(row) => parsed.push(row),
            Err(mut row_errors) => errors.append(&mut row_errors),
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(InputError(errors))
    }
}

fn validate_row(index: usize, row: &RawRow) -> Result<ParsedRow, Vec<RowError>> {
    let mut errors = Vec::new();

    let title = row.event_title.trim();
    if title.is_empty() {
        errors.push(RowError::MissingField {
            row: index,
            field: "event_title",
        });
    }

    let department = row.department.trim();
    if department.is_empty() {
        errors.push(RowError::MissingField {
            row: index,
            field: "department",
        });
    }

    let date_value = row.event_date.trim();
    let date = if date_value.is_empty() {
        errors.push(RowError::MissingField {
            row: index,
            field: "event_date",
        });
        None
    } else {
        match parse_date(date_value) {
            Some(date) => Some(date),
            None => {
                errors.push(RowError::InvalidDate {
                    row: index,
                    value: date_value.to_string(),
                });
                None
            }
        }
    };

    // A missing date always comes with an error entry, so this cannot drop
    // a clean row.
    let (Some(date), true) = (date, errors.is_empty()) else {
        return Err(errors);
    };

    Ok(ParsedRow {
        title: title.to_string(),
        description: row.event_description.trim().to_string(),
        date,
        department: department.to_string(),
        image_reference: row.image_reference.trim().to_string(),
        details: detail_lines(row),
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
}

fn detail_lines(row: &RawRow) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(speaker) = non_empty(row.guest_speaker.as_deref()) {
        details.push(format!("Guest Speaker: {speaker}"));
    }
    if let Some(location) = non_empty(row.location.as_deref()) {
        details.push(format!("Location: {location}"));
    }
    if let Some(coordinators) = non_empty(row.coordinators.as_deref()) {
        details.push(format!("Coordinators: {coordinators}"));
    }
    details
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> RawRow {
        RawRow {
            event_title: "Tech Fest".to_string(),
            event_description: "Annual technical festival.".to_string(),
            event_date: "2025-03-15".to_string(),
            department: "CS".to_string(),
            image_reference: "1".to_string(),
            ..RawRow::default()
        }
    }

    #[test]
    fn accepts_iso_dates() {
        let parsed = validate_rows(&[sample_row()]).expect("row is valid");
        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed[0].date(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
    }

    #[test]
    fn accepts_us_slash_dates() {
        let mut row = sample_row();
        row.event_date = "03/15/2025".to_string();
        let parsed = validate_rows(&[row]).expect("row is valid");
        assert_eq!(
            parsed[0].date(),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
    }

    #[test]
    fn rejects_unparseable_date() {
        let mut row = sample_row();
        row.event_date = "not-a-date".to_string();
        let err = validate_rows(&[row]).unwrap_err();
        assert_eq!(
            err.0,
            vec![RowError::InvalidDate {
                row: 0,
                value: "not-a-date".to_string(),
            }]
        );
    }

    #[test]
    fn collects_all_problems_across_rows() {
        let mut first = sample_row();
        first.event_title = "  ".to_string();
        let mut second = sample_row();
        second.department = String::new();
        second.event_date = "tomorrow".to_string();

        let err = validate_rows(&[first, second]).unwrap_err();
        assert_eq!(err.0.len(), 3);
        assert!(err.to_string().contains("row 0"));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn detail_lines_skip_blank_optionals() {
        let mut row = sample_row();
        row.guest_speaker = Some("Dr. Rao".to_string());
        row.location = Some("   ".to_string());
        row.coordinators = Some("Prof. Iyer".to_string());

        let parsed = validate_rows(&[row]).expect("row is valid");
        let record = parsed[0].clone().into_record(&ImageStore::new());
        assert_eq!(
            record.details(),
            ["Guest Speaker: Dr. Rao", "Coordinators: Prof. Iyer"]
        );
    }

    #[test]
    fn into_record_attaches_store_bytes() {
        let store = ImageStore::from_files([("1.png", vec![7u8, 8])]);
        let parsed = validate_rows(&[sample_row()]).expect("row is valid");
        let record = parsed.into_iter().next().unwrap().into_record(&store);
        assert_eq!(record.image().bytes(), [7, 8]);
    }
}
