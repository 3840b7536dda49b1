//! Student roster parsing.
//!
//! The roster header is fixed. Cells are whitespace-trimmed, so text pasted
//! with indentation still parses; rows whose cells are all blank are
//! skipped. Quoted cells are kept byte for byte, including blank lines and
//! `\r\n` inside them.

use coursecraft_error::{Error, ErrorKind, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Required header cells, in the order the sample roster uses.
pub const ROSTER_COLUMNS: [&str; 6] = [
    "Academic Goals",
    "Major",
    "Hobbies",
    "Computer Skills",
    "Interest in Languages",
    "GPA",
];

/// One student, as read from one roster row.
///
/// Values are the trimmed cell text, kept verbatim so they can be quoted
/// back to the model unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub academic_goals: String,
    pub major: String,
    pub hobbies: String,
    pub computer_skills: String,
    pub language_interest: String,
    /// Guaranteed to parse as a finite number
    pub gpa: String,
}

impl StudentProfile {
    pub fn gpa_value(&self) -> Option<f64> {
        finite_number(&self.gpa)
    }
}

fn finite_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Positions of the required columns within the header
struct ColumnMap([usize; 6]);

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let mut positions = [0usize; 6];
        for (slot, name) in positions.iter_mut().zip(ROSTER_COLUMNS) {
            *slot = header
                .iter()
                .position(|cell| cell == name)
                .ok_or_else(|| {
                    Error::missing_column(name)
                        .with_operation("roster::parse")
                        .with_context("header", header.iter().collect::<Vec<_>>().join(", "))
                })?;
        }
        Ok(Self(positions))
    }

    fn profile(&self, record: &StringRecord, row: usize) -> Result<StudentProfile> {
        let cell = |i: usize| record.get(self.0[i]).unwrap_or_default().to_string();

        let profile = StudentProfile {
            academic_goals: cell(0),
            major: cell(1),
            hobbies: cell(2),
            computer_skills: cell(3),
            language_interest: cell(4),
            gpa: cell(5),
        };

        if finite_number(&profile.gpa).is_none() {
            return Err(Error::parse_failed(format!("GPA '{}' is not a number", profile.gpa))
                .with_operation("roster::parse")
                .with_context("row", row.to_string())
                .with_context("column", "GPA"));
        }

        Ok(profile)
    }
}

/// Parse roster CSV text into profiles, in input order.
///
/// Any problem aborts the whole roster: a missing column is
/// `MissingColumn`, a short/long row or a GPA that is not a finite number
/// is `ParseFailed`. Row numbers count data rows only.
pub fn parse_roster(text: &str) -> Result<Vec<StudentProfile>> {
    // whitespace-only lines ahead of the header
    let start = match text.find(|c: char| !c.is_whitespace()) {
        Some(first) => text[..first].rfind('\n').map_or(0, |newline| newline + 1),
        None => {
            return Err(Error::parse_failed("student data is empty").with_operation("roster::parse"));
        }
    };

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text[start..].as_bytes());

    let header = reader
        .headers()
        .map_err(|e| csv_error("failed to read header", e))?
        .clone();
    let columns = ColumnMap::from_header(&header)?;

    let mut profiles = Vec::new();
    let mut row = 0;
    for record in reader.records() {
        let record = record.map_err(|e| {
            csv_error(&format!("failed to parse row {}", row + 1), e)
                .with_context("row", (row + 1).to_string())
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        row += 1;
        if record.len() != header.len() {
            return Err(Error::parse_failed(format!(
                "row {} has {} fields, the header has {}",
                row,
                record.len(),
                header.len()
            ))
            .with_operation("roster::parse")
            .with_context("row", row.to_string()));
        }
        profiles.push(columns.profile(&record, row)?);
    }

    debug!(students = profiles.len(), "roster parsed");
    Ok(profiles)
}

fn csv_error(what: &str, err: csv::Error) -> Error {
    Error::new(ErrorKind::ParseFailed, format!("{}: {}", what, err))
        .with_operation("roster::parse")
        .set_source(err)
}
